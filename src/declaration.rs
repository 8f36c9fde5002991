use crate::error::ResolveError;
use crate::lockfile::LockfileHeader;
use crate::policy::VersionPolicy;
use crate::source::DeclarationSource;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::info;

pub const DEFAULT_ENGINE: &str = "ruby";

/// An engine plus a possibly partial version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSpec {
    pub engine: String,
    /// Empty means "latest stable", otherwise a full version or a prefix.
    pub version_prefix: String,
}

impl VersionSpec {
    pub fn new(engine: impl Into<String>, version_prefix: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            version_prefix: version_prefix.into(),
        }
    }

    pub fn is_latest(&self) -> bool {
        self.version_prefix.is_empty()
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_latest() {
            write!(f, "{}", self.engine)
        } else {
            write!(f, "{}-{}", self.engine, self.version_prefix)
        }
    }
}

/// Turns a declaration source into a [`VersionSpec`].
#[derive(Debug, Clone)]
pub struct DeclarationParser {
    default_engine: String,
    header: LockfileHeader,
}

impl Default for DeclarationParser {
    fn default() -> Self {
        Self::new(DEFAULT_ENGINE, LockfileHeader::default())
    }
}

impl DeclarationParser {
    pub fn new(default_engine: impl Into<String>, header: LockfileHeader) -> Self {
        Self {
            default_engine: default_engine.into(),
            header,
        }
    }

    pub fn parse(
        &self,
        source: &DeclarationSource,
        policy: &dyn VersionPolicy,
    ) -> Result<VersionSpec, ResolveError> {
        info!("Using ruby version from {source}");

        match source {
            DeclarationSource::Lockfile(path) => {
                let version = self.header.read(path)?;
                Ok(VersionSpec::new(self.default_engine.clone(), version))
            }
            DeclarationSource::RubyVersionFile(path) => {
                let raw = read_ruby_version(path)?;
                self.classify(&raw, policy).ok_or_else(|| {
                    ResolveError::malformed(path, format!("invalid version '{raw}'"))
                })
            }
            DeclarationSource::ToolVersionsFile(path) => {
                let raw = read_tool_versions(path, &self.default_engine)?;
                self.classify(&raw, policy).ok_or_else(|| {
                    ResolveError::malformed(path, format!("invalid version '{raw}'"))
                })
            }
            DeclarationSource::Explicit(raw) => self.classify(raw, policy).ok_or_else(|| {
                ResolveError::Configuration(format!("invalid ruby version '{raw}'"))
            }),
        }
    }

    /// Split a raw declaration into engine and version.
    ///
    /// - `3.2`, `head` -> default engine, unchanged
    /// - `jruby` -> `jruby`, latest
    /// - `graal-21.1.0-java11` -> `graal`, `21.1.0-java11`
    ///
    /// Returns `None` when the engine part would be empty.
    pub fn classify(&self, raw: &str, policy: &dyn VersionPolicy) -> Option<VersionSpec> {
        if raw.starts_with(|c: char| c.is_ascii_digit()) || policy.is_head(raw) {
            return Some(VersionSpec::new(self.default_engine.clone(), raw));
        }

        let (engine, version) = raw.split_once('-').unwrap_or((raw, ""));
        if engine.is_empty() {
            return None;
        }
        Some(VersionSpec::new(engine, version))
    }
}

/// Contents of a `.ruby-version` file with surrounding whitespace removed.
pub fn read_ruby_version(path: &Path) -> Result<String, ResolveError> {
    let contents = fs::read_to_string(path).map_err(|err| ResolveError::io(path, err))?;
    Ok(contents.trim_start_matches('\u{feff}').trim().to_string())
}

/// Version declared for `engine` in a `.tool-versions` file.
pub fn read_tool_versions(path: &Path, engine: &str) -> Result<String, ResolveError> {
    let contents = fs::read_to_string(path).map_err(|err| ResolveError::io(path, err))?;
    tool_versions_entry(&contents, engine).ok_or_else(|| {
        ResolveError::malformed(path, format!("no '{engine}' entry with a version"))
    })
}

/// First version token on the first line whose tool name is exactly `engine`.
pub fn tool_versions_entry(contents: &str, engine: &str) -> Option<String> {
    let line = contents
        .trim_start_matches('\u{feff}')
        .lines()
        .find(|line| line.split_whitespace().next() == Some(engine))?;

    line.split_whitespace()
        .nth(1)
        .filter(|token| !token.starts_with('#'))
        .map(str::to_string)
}
