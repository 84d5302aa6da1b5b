use crate::error::{GitShipError, Result};
use crate::git::History;
use std::cell::Cell;

/// Mock history for testing without a repository
pub struct MockHistory {
    log: String,
    first_commit: Option<String>,
    first_commit_calls: Cell<usize>,
}

impl MockHistory {
    /// Create a mock serving the given log text
    pub fn new(log: impl Into<String>) -> Self {
        MockHistory {
            log: log.into(),
            first_commit: None,
            first_commit_calls: Cell::new(0),
        }
    }

    /// Set the hash reported as the repository's first commit
    pub fn with_first_commit(mut self, hash: impl Into<String>) -> Self {
        self.first_commit = Some(hash.into());
        self
    }

    /// How many times the first commit was requested
    pub fn first_commit_calls(&self) -> usize {
        self.first_commit_calls.get()
    }
}

impl Default for MockHistory {
    fn default() -> Self {
        Self::new("")
    }
}

impl History for MockHistory {
    fn log_text(&self, _range: Option<&str>) -> Result<String> {
        Ok(self.log.clone())
    }

    fn first_commit(&self) -> Result<String> {
        self.first_commit_calls.set(self.first_commit_calls.get() + 1);
        self.first_commit
            .clone()
            .ok_or_else(|| GitShipError::git_command("Repository has no commits"))
    }
}
