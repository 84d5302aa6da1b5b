//! Content-addressed manifest of a file tree
//!
//! A manifest describes a directory by name, kind and content identity
//! without carrying any bytes. Alongside it the builder returns a side table
//! from content hash to one file holding that content, so a deployment can
//! attach bytes only for hashes the remote does not already know.
//!
//! Nothing here talks to the network.

pub mod builder;
pub mod exclude;
pub mod hash;

pub use builder::{ManifestBuilder, UnreadablePolicy};
pub use exclude::ExclusionSet;
pub use hash::blob_hash;

use crate::boundary::BoundaryWarning;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

/// Content hash to one path holding that content
pub type SideTable = BTreeMap<String, PathBuf>;

/// One node of the manifest tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ManifestEntry {
    File {
        #[serde(rename = "contentHash")]
        content_hash: String,
        size: u64,
    },
    Directory {
        entries: BTreeMap<String, ManifestEntry>,
    },
    Symlink {
        target: String,
    },
}

/// Result of a manifest build
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Manifest {
    pub entries: BTreeMap<String, ManifestEntry>,
    #[serde(skip)]
    pub side_table: SideTable,
    #[serde(skip)]
    pub warnings: Vec<BoundaryWarning>,
}

impl Manifest {
    /// Find the entry at a `/`-separated path relative to the root
    pub fn lookup(&self, path: &str) -> Option<&ManifestEntry> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let mut entry = self.entries.get(segments.next()?)?;
        for segment in segments {
            match entry {
                ManifestEntry::Directory { entries } => entry = entries.get(segment)?,
                _ => return None,
            }
        }
        Some(entry)
    }

    /// Number of file entries at any depth
    pub fn file_count(&self) -> usize {
        fn count(entries: &BTreeMap<String, ManifestEntry>) -> usize {
            entries
                .values()
                .map(|entry| match entry {
                    ManifestEntry::File { .. } => 1,
                    ManifestEntry::Directory { entries } => count(entries),
                    ManifestEntry::Symlink { .. } => 0,
                })
                .sum()
        }
        count(&self.entries)
    }

    /// Sum of file sizes at any depth
    pub fn total_size(&self) -> u64 {
        fn size(entries: &BTreeMap<String, ManifestEntry>) -> u64 {
            entries
                .values()
                .map(|entry| match entry {
                    ManifestEntry::File { size, .. } => *size,
                    ManifestEntry::Directory { entries } => size(entries),
                    ManifestEntry::Symlink { .. } => 0,
                })
                .sum()
        }
        size(&self.entries)
    }
}

/// Files whose content the remote still needs, ordered by hash
///
/// # Arguments
/// * `side_table` - Hash to path table from a manifest build
/// * `known` - Hashes the remote already holds
pub fn upload_plan(side_table: &SideTable, known: &HashSet<String>) -> Vec<(String, PathBuf)> {
    side_table
        .iter()
        .filter(|(hash, _)| !known.contains(*hash))
        .map(|(hash, path)| (hash.clone(), path.clone()))
        .collect()
}
