use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a resolution attempt.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No declaration source could be determined.
    #[error("{0}")]
    Configuration(String),

    /// An explicitly selected declaration file does not exist.
    #[error("version file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file exists but holds no recognizable version declaration.
    #[error("no version found in {}: {reason}", path.display())]
    MalformedDeclaration { path: PathBuf, reason: String },

    /// The catalog has no entry at all for the engine on this platform.
    #[error("unknown engine {engine} on {platform}")]
    UnknownEngine { engine: String, platform: String },

    /// The catalog exists but no entry satisfies exact or prefix matching.
    #[error(
        "unknown version {requested} for {engine} on {platform}\n\
         available versions for {engine} on {platform}: {}",
        available.join(", ")
    )]
    UnknownVersion {
        engine: String,
        requested: String,
        platform: String,
        available: Vec<String>,
    },
}

impl ResolveError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound(path)
        } else {
            Self::Io { path, source }
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedDeclaration {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_version_lists_catalog() {
        let err = ResolveError::UnknownVersion {
            engine: "ruby".to_string(),
            requested: "9.9".to_string(),
            platform: "linux-x86_64".to_string(),
            available: vec!["3.2.2".to_string(), "3.3.0".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("unknown version 9.9 for ruby on linux-x86_64"));
        assert!(message.contains("3.2.2, 3.3.0"));
    }

    #[test]
    fn missing_file_maps_to_not_found() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ResolveError::io("/tmp/.ruby-version", source);
        assert!(matches!(err, ResolveError::FileNotFound(_)));
    }
}
