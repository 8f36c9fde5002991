use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::declaration::{DeclarationParser, DEFAULT_ENGINE};
use crate::lockfile::{LockfileHeader, LockfilePattern, DEFAULT_MARKER};
use crate::policy::{RubyPolicy, DEFAULT_HEAD_VERSIONS};
use crate::resolver::Resolver;
use crate::util::xdg;

const CONFIG_FILE: &str = "config.toml";

/// Settings read from `config.toml`; every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine assumed for bare versions such as `3.2`.
    pub default_engine: String,
    /// Line introducing the version section of the lockfile.
    pub lockfile_marker: String,
    pub lockfile_pattern: LockfilePattern,
    /// Build names that never match by prefix.
    pub head_versions: Vec<String>,
    pub catalog: Option<String>,
    pub platform: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_engine: DEFAULT_ENGINE.to_string(),
            lockfile_marker: DEFAULT_MARKER.to_string(),
            lockfile_pattern: LockfilePattern::default(),
            head_versions: DEFAULT_HEAD_VERSIONS
                .iter()
                .map(|name| name.to_string())
                .collect(),
            catalog: None,
            platform: None,
        }
    }
}

impl Config {
    /// Location used when no `--config` is given.
    pub fn default_path() -> Result<PathBuf> {
        Ok(xdg::config_dir()?.join(CONFIG_FILE))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file {:?}", path))?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.default_engine.trim().is_empty() {
            bail!("default_engine must not be empty");
        }
        if self.lockfile_marker.trim().is_empty() {
            bail!("lockfile_marker must not be empty");
        }
        Ok(())
    }

    /// Configured catalog path with `~` and variables expanded.
    pub fn catalog_path(&self) -> Result<Option<PathBuf>> {
        self.catalog.as_deref().map(xdg::expand_path).transpose()
    }

    pub fn resolver(&self) -> Resolver<RubyPolicy> {
        let header = LockfileHeader::new(self.lockfile_marker.clone(), self.lockfile_pattern);
        Resolver::new(
            DeclarationParser::new(self.default_engine.clone(), header),
            RubyPolicy::new(self.head_versions.clone()),
        )
    }
}
