use crate::error::{GitShipError, Result};
use crate::gitmoji;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":[A-Za-z0-9_+\-]+:").expect("marker pattern is valid"));

/// Changelog category a commit falls under
///
/// Declaration order is the order sections appear in a changelog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CommitLabel {
    #[serde(rename = "Breaking Changes")]
    BreakingChanges,
    Added,
    Security,
    Fixed,
    Removed,
    Deprecated,
    Changed,
    Miscellaneous,
    /// Marks a release boundary; never a changelog bucket
    Release,
}

impl CommitLabel {
    /// Every label that owns a bucket in a release's change set
    pub const UNRELEASED: [CommitLabel; 8] = [
        CommitLabel::BreakingChanges,
        CommitLabel::Added,
        CommitLabel::Security,
        CommitLabel::Fixed,
        CommitLabel::Removed,
        CommitLabel::Deprecated,
        CommitLabel::Changed,
        CommitLabel::Miscellaneous,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommitLabel::BreakingChanges => "Breaking Changes",
            CommitLabel::Added => "Added",
            CommitLabel::Security => "Security",
            CommitLabel::Fixed => "Fixed",
            CommitLabel::Removed => "Removed",
            CommitLabel::Deprecated => "Deprecated",
            CommitLabel::Changed => "Changed",
            CommitLabel::Miscellaneous => "Miscellaneous",
            CommitLabel::Release => "Release",
        }
    }

    /// Whether this label ends assembly instead of filling a bucket
    pub fn is_release(&self) -> bool {
        matches!(self, CommitLabel::Release)
    }
}

impl fmt::Display for CommitLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Return the first `:code:` shaped token in a subject
pub fn extract_marker(subject: &str) -> Option<&str> {
    MARKER.find(subject).map(|m| m.as_str())
}

/// Classify a commit subject by its first marker code
///
/// Unknown codes fall back to [`CommitLabel::Miscellaneous`]; a subject with
/// no marker at all is an error.
pub fn classify(subject: &str) -> Result<CommitLabel> {
    let code = extract_marker(subject).ok_or_else(|| GitShipError::no_marker(subject))?;
    Ok(gitmoji::lookup_code(code).unwrap_or(CommitLabel::Miscellaneous))
}

/// Remove every marker token from a subject, for display
pub fn strip_markers(subject: &str) -> String {
    let stripped = MARKER.replace_all(subject, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
