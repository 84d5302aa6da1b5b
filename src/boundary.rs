use std::fmt;
use std::path::PathBuf;

/// Non-fatal conditions met while assembling a release or building a manifest.
/// These are reported to the user but never stop the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No release marker was found; the first commit stands in for the previous release
    FirstRelease { first_commit: String },
    /// A release marker commit carries no tag decoration
    UntaggedRelease { commit_id: String, subject: String },
    /// A commit without a marker was filed under Miscellaneous
    UnmarkedCommit { commit_id: String, subject: String },
    /// A file could not be read and was left out of the manifest
    SkippedUnreadable { path: PathBuf, reason: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::FirstRelease { first_commit } => {
                let short_hash = first_commit.get(..7).unwrap_or(first_commit);
                write!(
                    f,
                    "No previous release found; comparing against first commit {}",
                    short_hash
                )
            }
            BoundaryWarning::UntaggedRelease { commit_id, subject } => {
                write!(
                    f,
                    "Release commit {} ('{}') has no tag; using its hash as the previous release",
                    commit_id, subject
                )
            }
            BoundaryWarning::UnmarkedCommit { commit_id, subject } => {
                write!(
                    f,
                    "Commit {} ('{}') has no :code: marker; filed under Miscellaneous",
                    commit_id, subject
                )
            }
            BoundaryWarning::SkippedUnreadable { path, reason } => {
                write!(f, "Skipped unreadable file '{}': {}", path.display(), reason)
            }
        }
    }
}
