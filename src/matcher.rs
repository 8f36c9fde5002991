//! Matching a requested engine version against the catalog of builds.
//!
//! An exact entry always wins. Otherwise the catalog is searched newest
//! first, preferring stable releases, then any non-head release whose name
//! starts with the requested prefix. Head builds only ever match exactly.

use crate::catalog::CatalogSource;
use crate::error::ResolveError;
use crate::policy::VersionPolicy;
use tracing::debug;

/// Pick the catalog entry satisfying `requested`.
///
/// `catalog` is ordered oldest to newest; an empty `requested` selects the
/// newest stable version.
pub fn resolve<'a>(
    catalog: &'a [String],
    engine: &str,
    requested: &str,
    platform: &str,
    policy: &dyn VersionPolicy,
) -> Result<&'a str, ResolveError> {
    if let Some(exact) = catalog.iter().find(|version| *version == requested) {
        debug!(engine, version = %exact, "exact catalog match");
        return Ok(exact.as_str());
    }

    let newest_first = || catalog.iter().rev().map(String::as_str);

    let stable = newest_first()
        .find(|version| policy.is_stable(version) && version.starts_with(requested));
    if let Some(version) = stable {
        debug!(engine, requested, version, "matched stable prefix");
        return Ok(version);
    }

    let prerelease = newest_first()
        .find(|version| !policy.is_head(version) && version.starts_with(requested));
    if let Some(version) = prerelease {
        debug!(engine, requested, version, "matched non-stable prefix");
        return Ok(version);
    }

    Err(ResolveError::UnknownVersion {
        engine: engine.to_string(),
        requested: requested.to_string(),
        platform: platform.to_string(),
        available: catalog.to_vec(),
    })
}

/// Look up the catalog for `engine` on `platform` and resolve against it.
pub fn resolve_from_source<'a>(
    source: &'a dyn CatalogSource,
    platform: &str,
    engine: &str,
    requested: &str,
    policy: &dyn VersionPolicy,
) -> Result<&'a str, ResolveError> {
    let catalog = source
        .versions(platform, engine)
        .ok_or_else(|| ResolveError::UnknownEngine {
            engine: engine.to_string(),
            platform: platform.to_string(),
        })?;

    resolve(catalog, engine, requested, platform, policy)
}
