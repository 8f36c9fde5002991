use super::{load_catalog, platform};
use crate::catalog::{CatalogFile, CatalogSource};
use crate::cli::CatalogArgs;
use crate::error::ResolveError;
use crate::policy::VersionPolicy;
use crate::{ui, Config};
use anyhow::Result;

pub fn execute(config: &Config, engine: Option<&str>, args: &CatalogArgs) -> Result<()> {
    let catalog = load_catalog(config, args)?;
    let platform = platform(config, args);

    match engine {
        Some(engine) => list_versions(config, &catalog, &platform, engine),
        None => list_engines(&catalog, &platform),
    }
}

fn list_versions(
    config: &Config,
    catalog: &CatalogFile,
    platform: &str,
    engine: &str,
) -> Result<()> {
    let versions = catalog
        .versions(platform, engine)
        .ok_or_else(|| ResolveError::UnknownEngine {
            engine: engine.to_string(),
            platform: platform.to_string(),
        })?;

    let resolver = config.resolver();
    let policy = resolver.policy();
    for version in versions.iter().rev() {
        if policy.is_head(version) {
            println!("{version} (head)");
        } else if policy.is_stable(version) {
            println!("{version}");
        } else {
            println!("{version} (prerelease)");
        }
    }

    Ok(())
}

fn list_engines(catalog: &CatalogFile, platform: &str) -> Result<()> {
    let engines = catalog.engines(platform);
    if engines.is_empty() {
        ui::warn(format!("No engines available on {platform}."));
    }
    for engine in engines {
        println!("{engine}");
    }
    Ok(())
}
