use crate::platform::normalize_platform;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Platform key whose engines are available on every platform.
pub const ANY_PLATFORM: &str = "*";

/// Supplies the versions that can actually be installed.
pub trait CatalogSource {
    /// Versions of `engine` built for `platform`, oldest first.
    ///
    /// `None` means the engine is not supported on the platform at all.
    fn versions(&self, platform: &str, engine: &str) -> Option<&[String]>;
}

/// Catalog stored as TOML:
///
/// ```toml
/// [platforms."ubuntu-22.04"]
/// ruby = ["3.1.4", "3.2.2", "head"]
///
/// [platforms."*"]
/// jruby = ["9.3.13.0", "9.4.5.0"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub platforms: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl CatalogFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {:?}", path))?;

        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut catalog: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse catalog file {:?}", path))?;
        catalog.normalize();
        Ok(catalog)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let mut catalog: Self = toml::from_str(contents).context("Failed to parse catalog")?;
        catalog.normalize();
        Ok(catalog)
    }

    fn normalize(&mut self) {
        self.platforms = std::mem::take(&mut self.platforms)
            .into_iter()
            .map(|(platform, engines)| (normalize_platform(&platform), engines))
            .collect();
    }

    /// Engines available for `platform`, including platform-independent ones.
    pub fn engines(&self, platform: &str) -> Vec<&str> {
        let platform = normalize_platform(platform);
        let mut engines: Vec<&str> = [platform.as_str(), ANY_PLATFORM]
            .iter()
            .filter_map(|key| self.platforms.get(*key))
            .flat_map(|engines| engines.keys().map(String::as_str))
            .collect();
        engines.sort_unstable();
        engines.dedup();
        engines
    }
}

impl CatalogSource for CatalogFile {
    fn versions(&self, platform: &str, engine: &str) -> Option<&[String]> {
        let platform = normalize_platform(platform);
        let found = self
            .platforms
            .get(&platform)
            .and_then(|engines| engines.get(engine))
            .or_else(|| {
                self.platforms
                    .get(ANY_PLATFORM)
                    .and_then(|engines| engines.get(engine))
            });
        debug!(%platform, engine, found = found.is_some(), "catalog lookup");
        found.map(Vec::as_slice)
    }
}

/// A problem found while validating a catalog file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogIssue {
    pub source: PathBuf,
    pub platform: String,
    pub engine: Option<String>,
    pub message: String,
}

impl CatalogIssue {
    fn new(
        source: &Path,
        platform: &str,
        engine: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.to_path_buf(),
            platform: platform.to_string(),
            engine: engine.map(str::to_string),
            message: message.into(),
        }
    }
}

pub fn validate_catalog(source: &Path, catalog: &CatalogFile) -> Vec<CatalogIssue> {
    let mut issues = Vec::new();

    for (platform, engines) in &catalog.platforms {
        if engines.is_empty() {
            issues.push(CatalogIssue::new(
                source,
                platform,
                None,
                "platform lists no engines",
            ));
        }

        for (engine, versions) in engines {
            if engine.trim().is_empty() {
                issues.push(CatalogIssue::new(source, platform, None, "empty engine name"));
            }
            if versions.is_empty() {
                issues.push(CatalogIssue::new(
                    source,
                    platform,
                    Some(engine.as_str()),
                    "engine lists no versions",
                ));
            }

            let mut seen = HashSet::new();
            for version in versions {
                if version.trim().is_empty() {
                    issues.push(CatalogIssue::new(
                        source,
                        platform,
                        Some(engine.as_str()),
                        "empty version string",
                    ));
                } else if !seen.insert(version.as_str()) {
                    issues.push(CatalogIssue::new(
                        source,
                        platform,
                        Some(engine.as_str()),
                        format!("duplicate version '{version}'"),
                    ));
                }
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CATALOG: &str = r#"
[platforms."Ubuntu-22.04"]
ruby = ["3.1.4", "3.2.2", "head"]

[platforms."macos-14"]
ruby = ["3.2.2"]

[platforms."*"]
ruby = ["2.7.8"]
jruby = ["9.3.13.0", "9.4.5.0"]
"#;

    #[test]
    fn platform_specific_versions_win() {
        let catalog = CatalogFile::parse(CATALOG).unwrap();
        let versions = catalog.versions("ubuntu-22.04", "ruby").unwrap();
        assert_eq!(versions, ["3.1.4", "3.2.2", "head"]);
    }

    #[test]
    fn wildcard_platform_is_fallback() {
        let catalog = CatalogFile::parse(CATALOG).unwrap();
        assert_eq!(
            catalog.versions("ubuntu-22.04", "jruby").unwrap(),
            ["9.3.13.0", "9.4.5.0"]
        );
        assert_eq!(catalog.versions("windows-2022", "ruby").unwrap(), ["2.7.8"]);
    }

    #[test]
    fn unknown_engine_is_none() {
        let catalog = CatalogFile::parse(CATALOG).unwrap();
        assert!(catalog.versions("macos-14", "truffleruby").is_none());
    }

    #[test]
    fn engines_merge_platform_and_wildcard() {
        let catalog = CatalogFile::parse(CATALOG).unwrap();
        assert_eq!(catalog.engines("macos-14"), vec!["jruby", "ruby"]);
    }

    #[test]
    fn load_empty_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.toml");
        fs::write(&path, "\n").unwrap();
        assert!(CatalogFile::load(&path).unwrap().platforms.is_empty());
    }

    #[test]
    fn load_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        assert!(CatalogFile::load(&temp.path().join("catalog.toml")).is_err());
    }

    #[test]
    fn validate_clean_catalog() {
        let catalog = CatalogFile::parse(CATALOG).unwrap();
        assert!(validate_catalog(Path::new("catalog.toml"), &catalog).is_empty());
    }

    #[test]
    fn validate_reports_problems() {
        let catalog = CatalogFile::parse(
            r#"
[platforms.linux]
ruby = ["3.2.2", "3.2.2", ""]
jruby = []

[platforms.empty]
"#,
        )
        .unwrap();

        let issues = validate_catalog(Path::new("catalog.toml"), &catalog);
        let messages: Vec<_> = issues.iter().map(|issue| issue.message.as_str()).collect();
        assert_eq!(issues.len(), 4);
        assert!(messages.contains(&"platform lists no engines"));
        assert!(messages.contains(&"engine lists no versions"));
        assert!(messages.contains(&"duplicate version '3.2.2'"));
        assert!(messages.contains(&"empty version string"));
    }
}
