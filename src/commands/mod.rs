use crate::catalog::CatalogFile;
use crate::cli::{CatalogArgs, Cli, Commands};
use crate::platform::{current_platform, normalize_platform};
use crate::Config;
use anyhow::{Context, Result};
use std::path::PathBuf;

mod check;
mod detect;
mod list;
mod resolve;

pub fn execute(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = Config::load(&config_path)?;

    match cli.command {
        Commands::Resolve {
            declaration,
            catalog,
        } => resolve::execute(&config, &declaration, &catalog),

        Commands::Detect { declaration } => detect::execute(&config, &declaration),

        Commands::List { engine, catalog } => list::execute(&config, engine.as_deref(), &catalog),

        Commands::Check { catalog } => check::execute(&config, catalog),
    }
}

/// Catalog path from the command line, falling back to the config file.
fn catalog_path(config: &Config, explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => config.catalog_path()?.context(
            "No catalog configured; pass --catalog, set RBPICK_CATALOG, or set `catalog` in config.toml",
        ),
    }
}

fn load_catalog(config: &Config, args: &CatalogArgs) -> Result<CatalogFile> {
    let path = catalog_path(config, args.catalog.clone())?;
    CatalogFile::load(&path)
}

fn platform(config: &Config, args: &CatalogArgs) -> String {
    args.platform
        .as_deref()
        .or(config.platform.as_deref())
        .map(normalize_platform)
        .unwrap_or_else(current_platform)
}
