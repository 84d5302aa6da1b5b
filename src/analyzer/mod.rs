//! Release analysis: from a sorted commit list to a categorized release

pub mod release;

pub use release::{next_version, ChangeGroup, ChangeSet, Release, ReleaseAssembler, UnmarkedPolicy};
