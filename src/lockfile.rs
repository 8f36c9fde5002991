use crate::error::ResolveError;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// Header line that introduces the engine version section of a `Gemfile.lock`.
pub const DEFAULT_MARKER: &str = "RUBY VERSION";

/// How the version is pulled out of the line following the marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockfilePattern {
    /// `[0-9]+\.[0-9]+\.[0-9]+`
    #[default]
    Strict,
    /// `[0-9].[0-9].[0-9]`, where the separators may be any character.
    Legacy,
}

static STRICT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]+\.[0-9]+\.[0-9]+").expect("STRICT_REGEX must compile")
});

static LEGACY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9].[0-9].[0-9]").expect("LEGACY_REGEX must compile"));

impl LockfilePattern {
    fn regex(self) -> &'static Regex {
        match self {
            Self::Strict => &*STRICT_REGEX,
            Self::Legacy => &*LEGACY_REGEX,
        }
    }
}

/// Reads the engine version recorded in a lock-file header section.
#[derive(Debug, Clone)]
pub struct LockfileHeader {
    marker: String,
    pattern: LockfilePattern,
}

impl Default for LockfileHeader {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER, LockfilePattern::default())
    }
}

impl LockfileHeader {
    pub fn new(marker: impl Into<String>, pattern: LockfilePattern) -> Self {
        Self {
            marker: marker.into(),
            pattern,
        }
    }

    /// Load the lock-file at `path` and extract its version.
    pub fn read(&self, path: &Path) -> Result<String, ResolveError> {
        let contents = fs::read_to_string(path).map_err(|err| ResolveError::io(path, err))?;
        self.extract(&contents).ok_or_else(|| {
            ResolveError::malformed(
                path,
                format!("expected a '{}' line followed by a version", self.marker),
            )
        })
    }

    /// Extract the version from lock-file contents.
    ///
    /// Returns `None` when the marker is absent, is the last line, or the
    /// following line does not start with a digit.
    pub fn extract(&self, contents: &str) -> Option<String> {
        let mut lines = contents.trim_start_matches('\u{feff}').lines();
        lines.find(|line| line.trim() == self.marker)?;

        let next = lines.next()?.trim();
        if !next.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }

        self.pattern
            .regex()
            .find(next)
            .map(|found| found.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const LOCKFILE: &str = "GEM\n  remote: https://rubygems.org/\n  specs:\n    rake (13.0.6)\n\nRUBY VERSION\n   3.1.2p20\n\nBUNDLED WITH\n   2.3.7\n";

    #[test]
    fn extracts_version_after_marker() {
        let header = LockfileHeader::default();
        assert_eq!(header.extract(LOCKFILE).as_deref(), Some("3.1.2"));
    }

    #[test]
    fn accepts_crlf_line_endings() {
        let header = LockfileHeader::default();
        let contents = LOCKFILE.replace('\n', "\r\n");
        assert_eq!(header.extract(&contents).as_deref(), Some("3.1.2"));
    }

    #[test]
    fn missing_marker_yields_nothing() {
        let header = LockfileHeader::default();
        assert_eq!(header.extract("GEM\n  specs:\n\nBUNDLED WITH\n   2.3.7\n"), None);
    }

    #[test]
    fn marker_on_last_line_yields_nothing() {
        let header = LockfileHeader::default();
        assert_eq!(header.extract("GEM\nRUBY VERSION"), None);
    }

    #[test]
    fn marker_is_case_sensitive() {
        let header = LockfileHeader::default();
        assert_eq!(header.extract("ruby version\n   3.1.2\n"), None);
    }

    #[test]
    fn non_numeric_version_line_is_rejected() {
        let header = LockfileHeader::default();
        assert_eq!(header.extract("RUBY VERSION\n   ruby 3.1.2p20\n"), None);
    }

    #[test]
    fn strict_pattern_keeps_multi_digit_components() {
        let header = LockfileHeader::default();
        assert_eq!(
            header.extract("RUBY VERSION\n   3.10.12\n").as_deref(),
            Some("3.10.12")
        );
    }

    #[test]
    fn legacy_pattern_matches_any_separator() {
        let header = LockfileHeader::new(DEFAULT_MARKER, LockfilePattern::Legacy);
        assert_eq!(
            header.extract("RUBY VERSION\n   3-1-2\n").as_deref(),
            Some("3-1-2")
        );
        // Single-digit components only.
        assert_eq!(header.extract("RUBY VERSION\n   3.10.12\n"), None);
    }

    #[test]
    fn non_ascii_digits_are_not_versions() {
        let header = LockfileHeader::default();
        assert_eq!(header.extract("RUBY VERSION\n   3.\u{661}.2\n"), None);
        let legacy = LockfileHeader::new(DEFAULT_MARKER, LockfilePattern::Legacy);
        assert_eq!(legacy.extract("RUBY VERSION\n   3.\u{661}.2\n"), None);
    }

    #[test]
    fn byte_order_mark_before_marker() {
        let header = LockfileHeader::default();
        assert_eq!(
            header
                .extract("\u{feff}RUBY VERSION\n   3.2.2p53\n")
                .as_deref(),
            Some("3.2.2")
        );
    }

    #[test]
    fn custom_marker() {
        let header = LockfileHeader::new("ENGINE", LockfilePattern::Strict);
        assert_eq!(header.extract("ENGINE\n2.7.8\n").as_deref(), Some("2.7.8"));
    }

    #[test]
    fn read_reports_malformed_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Gemfile.lock");
        fs::write(&path, "GEM\n").unwrap();

        let err = LockfileHeader::default().read(&path).unwrap_err();
        assert!(matches!(err, ResolveError::MalformedDeclaration { .. }));
    }

    #[test]
    fn read_reports_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = LockfileHeader::default()
            .read(&temp.path().join("Gemfile.lock"))
            .unwrap_err();
        assert!(matches!(err, ResolveError::FileNotFound(_)));
    }
}
