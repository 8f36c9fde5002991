use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Get the XDG config directory for rbpick
///
/// Returns `$XDG_CONFIG_HOME/rbpick` or `~/.config/rbpick` if not set
pub fn config_dir() -> Result<PathBuf> {
    let base = match env::var("XDG_CONFIG_HOME") {
        Ok(value) if !value.trim().is_empty() => PathBuf::from(value),
        _ => directories::BaseDirs::new()
            .context("Failed to get home directory")?
            .home_dir()
            .join(".config"),
    };

    Ok(base.join("rbpick"))
}

/// Expand `~` and environment variables in a configured path.
pub fn expand_path(value: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(value)
        .with_context(|| format!("Failed to expand path {value:?}"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}
