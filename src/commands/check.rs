use super::catalog_path;
use crate::catalog::{validate_catalog, CatalogFile};
use crate::{ui, Config};
use anyhow::Result;
use std::path::PathBuf;

pub fn execute(config: &Config, catalog: Option<PathBuf>) -> Result<()> {
    let path = catalog_path(config, catalog)?;
    let catalog = CatalogFile::load(&path)?;
    let issues = validate_catalog(&path, &catalog);

    if issues.is_empty() {
        if catalog.platforms.is_empty() {
            ui::info(format!("{} lists no platforms.", path.display()));
        } else {
            ui::success(
                "Check",
                format!(
                    "Validated {} platform(s) without issues.",
                    catalog.platforms.len()
                ),
            );
        }
        Ok(())
    } else {
        for issue in &issues {
            let location = match &issue.engine {
                Some(engine) => format!(
                    "{} [{}] ({engine})",
                    issue.source.display(),
                    issue.platform
                ),
                None => format!("{} [{}]", issue.source.display(), issue.platform),
            };
            ui::error(format!("{location}: {}", issue.message));
        }
        anyhow::bail!("Catalog validation failed ({} issue(s)).", issues.len());
    }
}
