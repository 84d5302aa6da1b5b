//! Version-control access behind a trait
//!
//! The release pipeline needs two things from git: the raw log text in the
//! JSON-per-commit format, and the hash of the repository's very first
//! commit. Both sit behind [`History`] so the assembler can be driven by a
//! real repository ([`GitCli`]) or by canned data ([`MockHistory`]).

pub mod mock;
pub mod repository;

pub use mock::MockHistory;
pub use repository::GitCli;

use crate::error::{GitShipError, Result};
use serde::Serialize;

/// `git log --pretty` fields, unit-separated; `-z` ends each record with NUL
pub const LOG_FORMAT: &str = "%H%x1f%h%x1f%at%x1f%an%x1f%ae%x1f%s%x1f%D";

const FIELD_SEPARATOR: char = '\u{1f}';
const RECORD_SEPARATOR: char = '\0';
const FIELD_COUNT: usize = 7;

/// Field order matches the JSON-per-commit log text, `hash` first.
#[derive(Serialize)]
struct LogRecord<'a> {
    hash: &'a str,
    id: &'a str,
    timestamp: &'a str,
    author: LogAuthor<'a>,
    subject: &'a str,
    #[serde(rename = "ref")]
    r#ref: &'a str,
}

#[derive(Serialize)]
struct LogAuthor<'a> {
    name: &'a str,
    email: &'a str,
}

/// Read access to a repository's history
pub trait History {
    /// Log text in the JSON-per-commit format, most recent commit first,
    /// following first parents only
    ///
    /// # Arguments
    /// * `range` - Optional revision range (e.g., "v1.0.0..HEAD"); the whole
    ///   history when `None`
    fn log_text(&self, range: Option<&str>) -> Result<String>;

    /// Full hash of the oldest commit on the first-parent chain of HEAD
    fn first_commit(&self) -> Result<String>;
}

impl<H: History + ?Sized> History for &H {
    fn log_text(&self, range: Option<&str>) -> Result<String> {
        (**self).log_text(range)
    }

    fn first_commit(&self) -> Result<String> {
        (**self).first_commit()
    }
}

/// Re-encode `git log -z --pretty=format:LOG_FORMAT` output as one JSON
/// object per line
///
/// Field values are taken verbatim and escaped by `serde_json`, so quotes
/// and backslashes in subjects or author names survive the round trip.
pub fn records_to_json(raw: &str) -> Result<String> {
    let mut lines = Vec::new();
    for record in raw.split(RECORD_SEPARATOR) {
        let record = record.trim_matches('\n');
        if record.is_empty() {
            continue;
        }

        let fields: Vec<&str> = record.splitn(FIELD_COUNT, FIELD_SEPARATOR).collect();
        let &[hash, id, timestamp, name, email, subject, r#ref] = fields.as_slice() else {
            return Err(GitShipError::commit_parse(
                record,
                format!("expected {} fields, found {}", FIELD_COUNT, fields.len()),
            ));
        };

        let line = serde_json::to_string(&LogRecord {
            hash,
            id,
            timestamp,
            author: LogAuthor { name, email },
            subject,
            r#ref,
        })?;
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

/// Extract `(owner, name)` from a remote URL
///
/// Handles scp-style (`git@host:owner/name.git`) and URL-style
/// (`https://host/owner/name`) remotes.
pub fn parse_remote_slug(url: &str) -> Option<(String, String)> {
    let url = url.trim().trim_end_matches('/');
    let path = if let Some((_, rest)) = url.split_once("://") {
        rest.split_once('/').map(|(_, path)| path)?
    } else {
        url.split_once(':').map(|(_, path)| path)?
    };

    let path = path.trim_end_matches(".git");
    let mut parts = path.rsplitn(2, '/');
    let name = parts.next()?;
    let owner = parts.next()?.rsplit('/').next()?;

    if owner.is_empty() || name.is_empty() {
        return None;
    }
    Some((owner.to_string(), name.to_string()))
}
