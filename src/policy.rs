use regex::Regex;
use std::sync::LazyLock;

/// Version names that denote development builds and only ever match exactly.
pub const DEFAULT_HEAD_VERSIONS: &[&str] = &["head", "debug", "mingw", "mswin", "ucrt"];

static STABLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)*$").expect("STABLE_REGEX must compile"));

/// Classification of catalog entries used while prefix matching.
pub trait VersionPolicy {
    /// A released, production-quality build.
    fn is_stable(&self, version: &str) -> bool;

    /// An in-development or nightly build.
    fn is_head(&self, version: &str) -> bool;
}

/// Conventions used by Ruby build catalogs: numeric dotted versions are
/// stable, a fixed set of names are head builds, everything else (previews,
/// release candidates) sits in between.
#[derive(Debug, Clone)]
pub struct RubyPolicy {
    head_versions: Vec<String>,
}

impl RubyPolicy {
    pub fn new(head_versions: Vec<String>) -> Self {
        Self { head_versions }
    }
}

impl Default for RubyPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_HEAD_VERSIONS
                .iter()
                .map(|name| name.to_string())
                .collect(),
        )
    }
}

impl VersionPolicy for RubyPolicy {
    fn is_stable(&self, version: &str) -> bool {
        STABLE_REGEX.is_match(version)
    }

    fn is_head(&self, version: &str) -> bool {
        self.head_versions.iter().any(|name| name == version)
    }
}
