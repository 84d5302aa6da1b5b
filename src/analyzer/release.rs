use crate::boundary::BoundaryWarning;
use crate::domain::commit::{parse_log, sort_recent_first};
use crate::domain::tag::{previous_version_from_ref, tag_for, tag_from_ref};
use crate::domain::{classify, Commit, CommitLabel, ReleaseType, Version};
use crate::error::{GitShipError, Result};
use crate::git::History;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Commits filed under one label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeGroup {
    pub label: CommitLabel,
    pub commits: Vec<Commit>,
}

/// Every unreleased label mapped to its commits
///
/// All eight buckets exist from construction on, empty or not, and iterate
/// in changelog order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ChangeSet {
    groups: BTreeMap<CommitLabel, ChangeGroup>,
}

impl ChangeSet {
    pub fn new() -> Self {
        let groups = CommitLabel::UNRELEASED
            .iter()
            .map(|&label| {
                (
                    label,
                    ChangeGroup {
                        label,
                        commits: Vec::new(),
                    },
                )
            })
            .collect();
        ChangeSet { groups }
    }

    /// Bucket for a label; `None` only for [`CommitLabel::Release`]
    pub fn get(&self, label: CommitLabel) -> Option<&ChangeGroup> {
        self.groups.get(&label)
    }

    /// Commits under a label, empty for [`CommitLabel::Release`]
    pub fn commits(&self, label: CommitLabel) -> &[Commit] {
        self.groups
            .get(&label)
            .map(|group| group.commits.as_slice())
            .unwrap_or(&[])
    }

    fn push(&mut self, label: CommitLabel, commit: Commit) {
        if let Some(group) = self.groups.get_mut(&label) {
            group.commits.push(commit);
        }
    }

    /// Buckets in changelog order
    pub fn iter(&self) -> impl Iterator<Item = &ChangeGroup> {
        self.groups.values()
    }

    /// Number of buckets (always eight)
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True when no bucket holds a commit
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(|group| group.commits.is_empty())
    }

    /// Total commits across all buckets
    pub fn commit_count(&self) -> usize {
        self.groups.values().map(|group| group.commits.len()).sum()
    }

    /// Smallest release type that covers these changes
    ///
    /// Breaking changes call for a major release, additions for a minor one,
    /// anything else for a patch.
    pub fn suggested_release_type(&self) -> ReleaseType {
        if !self.commits(CommitLabel::BreakingChanges).is_empty() {
            ReleaseType::Major
        } else if !self.commits(CommitLabel::Added).is_empty() {
            ReleaseType::Minor
        } else {
            ReleaseType::Patch
        }
    }
}

impl Default for ChangeSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Categorized description of one upcoming release
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub owner: String,
    pub name: String,
    pub version: String,
    pub tag: String,
    pub previous: String,
    pub previous_tag: String,
    pub changes: ChangeSet,
    #[serde(skip)]
    pub warnings: Vec<BoundaryWarning>,
}

impl Release {
    /// Same release under a different target version
    pub fn retarget(mut self, version: &Version) -> Self {
        self.version = version.to_string();
        self.tag = version.tag();
        self
    }
}

/// What to do with a commit whose subject has no marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmarkedPolicy {
    /// Abort assembly with the classification error
    #[default]
    Fail,
    /// File the commit under Miscellaneous and record a warning
    Miscellaneous,
}

/// Buckets commits into a release, stopping at the previous release marker
pub struct ReleaseAssembler<H: History> {
    history: H,
    owner: String,
    name: String,
    unmarked: UnmarkedPolicy,
}

impl<H: History> ReleaseAssembler<H> {
    /// Create an assembler that asks `history` for the first commit when no
    /// previous release exists
    pub fn new(history: H) -> Self {
        ReleaseAssembler {
            history,
            owner: String::new(),
            name: String::new(),
            unmarked: UnmarkedPolicy::default(),
        }
    }

    /// Stamp the repository owner and name on assembled releases
    pub fn with_repository(mut self, owner: impl Into<String>, name: impl Into<String>) -> Self {
        self.owner = owner.into();
        self.name = name.into();
        self
    }

    pub fn with_unmarked_policy(mut self, policy: UnmarkedPolicy) -> Self {
        self.unmarked = policy;
        self
    }

    /// Assemble a release from commits sorted most recent first
    ///
    /// # Arguments
    /// * `target_version` - Version being released, e.g. "1.1.0"
    /// * `commits` - Commits, newest first
    ///
    /// # Returns
    /// * `Ok(Release)` - Buckets hold every commit newer than the release marker
    /// * `Err` - If the target version is invalid, a commit lacks a marker under
    ///   [`UnmarkedPolicy::Fail`], or the first commit cannot be fetched
    pub fn assemble(&self, target_version: &str, commits: &[Commit]) -> Result<Release> {
        let version = Version::parse(target_version)?.to_string();
        let mut release = Release {
            owner: self.owner.clone(),
            name: self.name.clone(),
            tag: tag_for(&version),
            version,
            previous: String::new(),
            previous_tag: String::new(),
            changes: ChangeSet::new(),
            warnings: Vec::new(),
        };

        let mut boundary_found = false;
        for commit in commits {
            let label = self.label_for(commit, &mut release.warnings)?;

            if label.is_release() {
                self.close_at(commit, &mut release);
                boundary_found = true;
                break;
            }

            debug!(id = %commit.id, %label, "bucketed commit");
            release.changes.push(label, commit.clone());
        }

        if !boundary_found {
            // No previous tag to point at; the hash doubles as the tag.
            let first_commit = self.history.first_commit()?;
            release.previous = first_commit.clone();
            release.previous_tag = first_commit.clone();
            release
                .warnings
                .push(BoundaryWarning::FirstRelease { first_commit });
        }

        info!(
            version = %release.version,
            previous = %release.previous,
            commits = release.changes.commit_count(),
            "assembled release"
        );
        Ok(release)
    }

    /// Read, parse, sort and assemble the repository's log in one go
    pub fn assemble_from_history(&self, target_version: &str, range: Option<&str>) -> Result<Release> {
        let commits = self.commits(range)?;
        self.assemble(target_version, &commits)
    }

    /// Load the repository's commits, newest first
    pub fn commits(&self, range: Option<&str>) -> Result<Vec<Commit>> {
        let mut commits = parse_log(&self.history.log_text(range)?)?;
        sort_recent_first(&mut commits);
        Ok(commits)
    }

    fn label_for(&self, commit: &Commit, warnings: &mut Vec<BoundaryWarning>) -> Result<CommitLabel> {
        match classify(&commit.subject) {
            Ok(label) => Ok(label),
            Err(GitShipError::NoMarker { .. }) if self.unmarked == UnmarkedPolicy::Miscellaneous => {
                warn!(id = %commit.id, subject = %commit.subject, "commit has no marker");
                warnings.push(BoundaryWarning::UnmarkedCommit {
                    commit_id: commit.id.clone(),
                    subject: commit.subject.clone(),
                });
                Ok(CommitLabel::Miscellaneous)
            }
            Err(e) => Err(e),
        }
    }

    fn close_at(&self, commit: &Commit, release: &mut Release) {
        match (tag_from_ref(&commit.r#ref), previous_version_from_ref(&commit.r#ref)) {
            (Some(tag), Some(previous)) => {
                release.previous = previous;
                release.previous_tag = tag.to_string();
            }
            _ => {
                warn!(id = %commit.id, "release commit has no tag");
                release.previous = commit.hash.clone();
                release.previous_tag = commit.hash.clone();
                release.warnings.push(BoundaryWarning::UntaggedRelease {
                    commit_id: commit.id.clone(),
                    subject: commit.subject.clone(),
                });
            }
        }
    }
}

/// Version to release when none is given explicitly
///
/// Bumps the previous release by the change set's suggested release type,
/// or starts at 0.1.0 when there is no parseable previous version.
pub fn next_version(previous: &str, changes: &ChangeSet) -> Version {
    match Version::parse(previous) {
        Ok(version) => version.increment(changes.suggested_release_type()),
        Err(_) => Version::new(0, 1, 0),
    }
}
