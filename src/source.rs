use crate::error::ResolveError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Sentinel meaning "take the version from the project files".
pub const DEFAULT_SELECTOR: &str = "default";
pub const RUBY_VERSION_FILE: &str = ".ruby-version";
pub const TOOL_VERSIONS_FILE: &str = ".tool-versions";
pub const DEFAULT_LOCKFILE: &str = "Gemfile.lock";

/// The primary version indicator as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    Default,
    RubyVersionFile,
    ToolVersionsFile,
    Explicit(String),
}

impl FromStr for VersionSelector {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value {
            DEFAULT_SELECTOR => Self::Default,
            RUBY_VERSION_FILE => Self::RubyVersionFile,
            TOOL_VERSIONS_FILE => Self::ToolVersionsFile,
            other => Self::Explicit(other.to_string()),
        })
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "{DEFAULT_SELECTOR}"),
            Self::RubyVersionFile => write!(f, "{RUBY_VERSION_FILE}"),
            Self::ToolVersionsFile => write!(f, "{TOOL_VERSIONS_FILE}"),
            Self::Explicit(value) => write!(f, "{value}"),
        }
    }
}

/// Everything needed to pick exactly one declaration source.
#[derive(Debug, Clone)]
pub struct SourceRequest {
    pub selector: VersionSelector,
    /// Lock-file to read the header from when the selector is `default`.
    pub lockfile: Option<PathBuf>,
    /// Directory that relative file names are resolved against.
    pub dir: PathBuf,
}

impl SourceRequest {
    pub fn new(selector: VersionSelector, dir: impl Into<PathBuf>) -> Self {
        Self {
            selector,
            lockfile: None,
            dir: dir.into(),
        }
    }

    pub fn with_lockfile(mut self, lockfile: Option<PathBuf>) -> Self {
        self.lockfile = lockfile;
        self
    }

    fn in_dir(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.dir.join(path)
        }
    }
}

/// The single origin consulted for one resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationSource {
    Explicit(String),
    Lockfile(PathBuf),
    RubyVersionFile(PathBuf),
    ToolVersionsFile(PathBuf),
}

impl fmt::Display for DeclarationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(value) => write!(f, "explicit input '{value}'"),
            Self::Lockfile(path) => write!(f, "lockfile {}", path.display()),
            Self::RubyVersionFile(path) | Self::ToolVersionsFile(path) => {
                write!(f, "{}", path.display())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelectorKind {
    Default,
    NamedFile,
    Explicit,
}

impl From<&VersionSelector> for SelectorKind {
    fn from(selector: &VersionSelector) -> Self {
        match selector {
            VersionSelector::Default => Self::Default,
            VersionSelector::RubyVersionFile | VersionSelector::ToolVersionsFile => Self::NamedFile,
            VersionSelector::Explicit(_) => Self::Explicit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    UseSelector,
    /// Selector wins over a configured lock-file; the lock-file is ignored.
    SelectorOverridesLockfile,
    UseLockfile,
    AutoDetect,
}

/// Precedence: explicit input > lock-file > auto-detection.
const PRECEDENCE: &[(SelectorKind, bool, Rule)] = &[
    (SelectorKind::Explicit, false, Rule::UseSelector),
    (SelectorKind::Explicit, true, Rule::SelectorOverridesLockfile),
    (SelectorKind::NamedFile, false, Rule::UseSelector),
    (SelectorKind::NamedFile, true, Rule::SelectorOverridesLockfile),
    (SelectorKind::Default, true, Rule::UseLockfile),
    (SelectorKind::Default, false, Rule::AutoDetect),
];

fn rule_for(kind: SelectorKind, has_lockfile: bool) -> Rule {
    PRECEDENCE
        .iter()
        .find(|(k, lockfile, _)| *k == kind && *lockfile == has_lockfile)
        .map(|(_, _, rule)| *rule)
        .unwrap_or(Rule::AutoDetect)
}

/// Pick the declaration source for a request.
pub fn select_source(request: &SourceRequest) -> Result<DeclarationSource, ResolveError> {
    let rule = rule_for((&request.selector).into(), request.lockfile.is_some());
    debug!(selector = %request.selector, ?rule, "selecting declaration source");

    match rule {
        Rule::SelectorOverridesLockfile => {
            if let Some(lockfile) = &request.lockfile {
                warn!(
                    selector = %request.selector,
                    lockfile = %lockfile.display(),
                    "both a ruby version and a lockfile were given; ignoring the lockfile"
                );
            }
            Ok(from_selector(request))
        }
        Rule::UseSelector => Ok(from_selector(request)),
        Rule::UseLockfile => match &request.lockfile {
            Some(lockfile) => Ok(DeclarationSource::Lockfile(request.in_dir(lockfile))),
            None => Err(ResolveError::Configuration(
                "no lockfile configured".to_string(),
            )),
        },
        Rule::AutoDetect => auto_detect(&request.dir),
    }
}

fn from_selector(request: &SourceRequest) -> DeclarationSource {
    match &request.selector {
        VersionSelector::RubyVersionFile => {
            DeclarationSource::RubyVersionFile(request.dir.join(RUBY_VERSION_FILE))
        }
        VersionSelector::ToolVersionsFile => {
            DeclarationSource::ToolVersionsFile(request.dir.join(TOOL_VERSIONS_FILE))
        }
        VersionSelector::Explicit(value) => DeclarationSource::Explicit(value.clone()),
        VersionSelector::Default => unreachable!("default selector never maps to itself"),
    }
}

fn auto_detect(dir: &Path) -> Result<DeclarationSource, ResolveError> {
    let ruby_version = dir.join(RUBY_VERSION_FILE);
    if ruby_version.is_file() {
        return Ok(DeclarationSource::RubyVersionFile(ruby_version));
    }

    let tool_versions = dir.join(TOOL_VERSIONS_FILE);
    if tool_versions.is_file() {
        return Ok(DeclarationSource::ToolVersionsFile(tool_versions));
    }

    Err(ResolveError::Configuration(format!(
        "a ruby version needs to be specified if no {RUBY_VERSION_FILE} or {TOOL_VERSIONS_FILE} file exists in {}",
        dir.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    #[rstest]
    #[case("default", VersionSelector::Default)]
    #[case(".ruby-version", VersionSelector::RubyVersionFile)]
    #[case(".tool-versions", VersionSelector::ToolVersionsFile)]
    #[case("3.2", VersionSelector::Explicit("3.2".to_string()))]
    #[case("jruby", VersionSelector::Explicit("jruby".to_string()))]
    fn parse_selector(#[case] input: &str, #[case] expected: VersionSelector) {
        assert_eq!(input.parse::<VersionSelector>().unwrap(), expected);
    }

    #[test]
    fn every_combination_has_a_rule() {
        for kind in [
            SelectorKind::Default,
            SelectorKind::NamedFile,
            SelectorKind::Explicit,
        ] {
            for lockfile in [false, true] {
                assert!(PRECEDENCE
                    .iter()
                    .any(|(k, l, _)| *k == kind && *l == lockfile));
            }
        }
    }

    #[test]
    fn explicit_wins_over_lockfile() {
        let temp = TempDir::new().unwrap();
        let request =
            SourceRequest::new(VersionSelector::Explicit("3.1".to_string()), temp.path())
                .with_lockfile(Some(PathBuf::from("Gemfile.lock")));

        let source = select_source(&request).unwrap();
        assert_eq!(source, DeclarationSource::Explicit("3.1".to_string()));
    }

    #[test]
    fn named_file_wins_over_lockfile() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Gemfile.lock"), "RUBY VERSION\n   3.1.4\n").unwrap();
        let request = SourceRequest::new(VersionSelector::RubyVersionFile, temp.path())
            .with_lockfile(Some(PathBuf::from("Gemfile.lock")));

        assert_eq!(
            rule_for(SelectorKind::NamedFile, true),
            Rule::SelectorOverridesLockfile
        );
        let source = select_source(&request).unwrap();
        assert_eq!(
            source,
            DeclarationSource::RubyVersionFile(temp.path().join(".ruby-version"))
        );
    }

    #[test]
    fn default_with_lockfile_reads_lockfile_relative_to_dir() {
        let temp = TempDir::new().unwrap();
        let request = SourceRequest::new(VersionSelector::Default, temp.path())
            .with_lockfile(Some(PathBuf::from("Gemfile.lock")));

        let source = select_source(&request).unwrap();
        assert_eq!(
            source,
            DeclarationSource::Lockfile(temp.path().join("Gemfile.lock"))
        );
    }

    #[test]
    fn auto_detect_prefers_ruby_version() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".ruby-version"), "3.2.2\n").unwrap();
        fs::write(temp.path().join(".tool-versions"), "ruby 3.1.0\n").unwrap();

        let request = SourceRequest::new(VersionSelector::Default, temp.path());
        let source = select_source(&request).unwrap();
        assert_eq!(
            source,
            DeclarationSource::RubyVersionFile(temp.path().join(".ruby-version"))
        );
    }

    #[test]
    fn auto_detect_falls_back_to_tool_versions() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".tool-versions"), "ruby 3.1.0\n").unwrap();

        let request = SourceRequest::new(VersionSelector::Default, temp.path());
        let source = select_source(&request).unwrap();
        assert_eq!(
            source,
            DeclarationSource::ToolVersionsFile(temp.path().join(".tool-versions"))
        );
    }

    #[test]
    fn auto_detect_without_files_is_a_configuration_error() {
        let temp = TempDir::new().unwrap();
        let request = SourceRequest::new(VersionSelector::Default, temp.path());
        let err = select_source(&request).unwrap_err();
        assert!(matches!(err, ResolveError::Configuration(_)));
        assert!(err.to_string().contains("needs to be specified"));
    }

    #[test]
    fn named_file_is_not_probed_during_selection() {
        let temp = TempDir::new().unwrap();
        let request = SourceRequest::new(VersionSelector::ToolVersionsFile, temp.path());
        let source = select_source(&request).unwrap();
        assert_eq!(
            source,
            DeclarationSource::ToolVersionsFile(temp.path().join(".tool-versions"))
        );
    }
}
