use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for git-ship operations
#[derive(Error, Debug)]
pub enum GitShipError {
    #[error("Commit parse error: {reason} (raw entry: {fragment})")]
    CommitParse { fragment: String, reason: String },

    #[error("No :code: style marker found in commit subject '{subject}'")]
    NoMarker { subject: String },

    #[error("Cannot read '{}' while building manifest: {source}", path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Version parsing error: '{input}' is not a semantic version ({reason})")]
    VersionParse { input: String, reason: String },

    #[error("Invalid exclusion pattern '{pattern}': {reason}")]
    Exclusion { pattern: String, reason: String },

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Git command failed: {0}")]
    GitCommand(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in git-ship
pub type Result<T> = std::result::Result<T, GitShipError>;

impl GitShipError {
    /// Create a commit parse error carrying the offending log fragment
    pub fn commit_parse(fragment: impl Into<String>, reason: impl Into<String>) -> Self {
        GitShipError::CommitParse {
            fragment: fragment.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing-marker error for a subject
    pub fn no_marker(subject: impl Into<String>) -> Self {
        GitShipError::NoMarker {
            subject: subject.into(),
        }
    }

    /// Create a manifest read error for a path
    pub fn manifest_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GitShipError::ManifestRead {
            path: path.into(),
            source,
        }
    }

    /// Create a version parse error with the rejected input
    pub fn version_parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        GitShipError::VersionParse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitShipError::Config(msg.into())
    }

    /// Create a git subprocess error with context
    pub fn git_command(msg: impl Into<String>) -> Self {
        GitShipError::GitCommand(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GitShipError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GitShipError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_commit_parse_carries_fragment() {
        let err = GitShipError::commit_parse(r#"{"hash":"abc""#, "EOF while parsing");
        let msg = err.to_string();
        assert!(msg.contains(r#"{"hash":"abc""#));
        assert!(msg.contains("EOF while parsing"));
    }

    #[test]
    fn test_no_marker_is_diagnosable() {
        let err = GitShipError::no_marker("I have no emoji");
        let msg = err.to_string();
        assert!(msg.contains(":code:"));
        assert!(msg.contains("I have no emoji"));
    }

    #[test]
    fn test_manifest_read_carries_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = GitShipError::manifest_read("site/index.html", io_err);
        let msg = err.to_string();
        assert!(msg.contains("site/index.html"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_version_parse_carries_input() {
        let err = GitShipError::version_parse("1.2", "unexpected end of input");
        assert!(err.to_string().starts_with("Version parsing error"));
        assert!(err.to_string().contains("'1.2'"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (GitShipError::config("x"), "Configuration error"),
            (GitShipError::git_command("x"), "Git command failed"),
            (GitShipError::no_marker("x"), "No :code: style marker"),
            (GitShipError::version_parse("x", "y"), "Version parsing error"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
