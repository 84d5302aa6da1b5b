//! Domain logic - pure release rules independent of git and the filesystem

pub mod commit;
pub mod label;
pub mod tag;
pub mod version;

pub use commit::{Author, Commit};
pub use label::{classify, CommitLabel};
pub use tag::tag_for;
pub use version::{ReleaseType, Version};
