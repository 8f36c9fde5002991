use super::{load_catalog, platform};
use crate::cli::{CatalogArgs, DeclarationArgs};
use crate::Config;
use anyhow::Result;
use tracing::info;

pub fn execute(config: &Config, declaration: &DeclarationArgs, args: &CatalogArgs) -> Result<()> {
    let catalog = load_catalog(config, args)?;
    let platform = platform(config, args);

    let resolution = config
        .resolver()
        .resolve(&declaration.request(), &catalog, &platform)?;

    info!(
        requested = %resolution.requested,
        platform = %resolution.platform,
        "resolved {}",
        resolution.identifier()
    );
    println!("{resolution}");

    Ok(())
}
