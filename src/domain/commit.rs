use crate::error::{GitShipError, Result};
use crate::gitmoji;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Start of every log record; the authoritative entry boundary
pub const ENTRY_MARKER: &str = r#"{"hash":"#;

/// Commit author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub email: String,
}

/// One commit read from the log
///
/// The subject is stored with every known emoji glyph already rewritten to
/// its `:code:` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    pub hash: String,
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub author: Author,
    pub subject: String,
    #[serde(rename = "ref")]
    pub r#ref: String,
}

#[derive(Deserialize)]
struct RawCommit {
    hash: String,
    id: String,
    timestamp: serde_json::Value,
    author: Author,
    subject: String,
    #[serde(rename = "ref", default)]
    r#ref: String,
}

/// Parse the text emitted by the JSON-per-commit log format
///
/// Entries are split on [`ENTRY_MARKER`] rather than on newlines, so a
/// subject spanning several lines stays inside its own entry. Any entry that
/// fails to parse aborts the batch, as does text ahead of the first entry.
pub fn parse_log(text: &str) -> Result<Vec<Commit>> {
    let leading = match text.find(ENTRY_MARKER) {
        Some(start) => &text[..start],
        None => text,
    };
    if !leading.trim().is_empty() {
        return Err(GitShipError::commit_parse(
            leading.trim(),
            "text outside any log entry",
        ));
    }

    split_entries(text).into_iter().map(parse_fragment).collect()
}

/// Split raw log text into one fragment per commit
pub fn split_entries(text: &str) -> Vec<&str> {
    let starts: Vec<usize> = text.match_indices(ENTRY_MARKER).map(|(i, _)| i).collect();

    starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(text.len());
            text[start..end].trim()
        })
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

/// Parse a single log fragment into a commit
pub fn parse_fragment(fragment: &str) -> Result<Commit> {
    let escaped = escape_control_chars(fragment);
    let raw: RawCommit = serde_json::from_str(&escaped)
        .map_err(|e| GitShipError::commit_parse(fragment, e.to_string()))?;

    let timestamp = parse_timestamp(&raw.timestamp)
        .ok_or_else(|| GitShipError::commit_parse(fragment, "unrecognised timestamp"))?;

    Ok(Commit {
        hash: raw.hash,
        id: raw.id,
        timestamp,
        author: raw.author,
        subject: gitmoji::normalize_subject(&raw.subject),
        r#ref: raw.r#ref,
    })
}

/// Resolve a timestamp that is either Unix seconds or a calendar date
///
/// Anything that reads as a finite number is taken as epoch seconds, so a
/// date string is only consulted when the numeric reading fails.
pub fn parse_timestamp(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().and_then(from_epoch_seconds),
        serde_json::Value::String(s) => parse_timestamp_str(s),
        _ => None,
    }
}

/// String form of [`parse_timestamp`]
pub fn parse_timestamp_str(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(secs) = raw.parse::<f64>() {
        if secs.is_finite() {
            return from_epoch_seconds(secs);
        }
    }
    parse_date(raw)
}

fn from_epoch_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round() as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // git's %ci and default date formats
    for format in ["%Y-%m-%d %H:%M:%S %z", "%a %b %e %H:%M:%S %Y %z"] {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Escape raw control characters that appear inside JSON string literals
///
/// git writes multi-line subjects verbatim, which JSON forbids.
fn escape_control_chars(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_string = false;
    let mut escaped = false;

    for c in fragment.chars() {
        if in_string {
            if escaped {
                escaped = false;
                out.push(c);
                continue;
            }
            match c {
                '\\' => {
                    escaped = true;
                    out.push(c);
                }
                '"' => {
                    in_string = false;
                    out.push(c);
                }
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
                c => out.push(c),
            }
        } else {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
        }
    }
    out
}

/// Sort commits most recent first; equal timestamps keep their order
pub fn sort_recent_first(commits: &mut [Commit]) {
    commits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(hash: &str, timestamp: &str, subject: &str, r#ref: &str) -> String {
        format!(
            r#"{{"hash":"{hash}","id":"{}","timestamp":"{timestamp}","author":{{"name":"Ada","email":"ada@example.com"}},"subject":"{subject}","ref":"{reference}"}}"#,
            &hash[..7],
            reference = r#ref
        )
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_log("").unwrap().is_empty());
        assert!(parse_log("\n  \n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_single_entry() {
        let text = entry("0123456789abcdef", "1700000000", ":sparkles: A", "");
        let commits = parse_log(&text).unwrap();
        assert_eq!(commits.len(), 1);
        let commit = &commits[0];
        assert_eq!(commit.hash, "0123456789abcdef");
        assert_eq!(commit.id, "0123456");
        assert_eq!(commit.author.name, "Ada");
        assert_eq!(commit.author.email, "ada@example.com");
        assert_eq!(commit.subject, ":sparkles: A");
        assert_eq!(commit.timestamp, Utc.timestamp_opt(1_700_000_000, 0).unwrap());
    }

    #[test]
    fn test_parse_multiple_entries_newline_separated() {
        let text = format!(
            "{}\n{}\n",
            entry("aaaaaaaaaaaa", "1700000100", ":bug: B", "HEAD -> main"),
            entry("bbbbbbbbbbbb", "1700000000", ":sparkles: A", "")
        );
        let commits = parse_log(&text).unwrap();
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].r#ref, "HEAD -> main");
        assert_eq!(commits[1].subject, ":sparkles: A");
    }

    #[test]
    fn test_parse_tolerates_multiline_subject() {
        let text = format!(
            "{}{}",
            entry("aaaaaaaaaaaa", "1700000100", ":bug: fix\nsecond line", ""),
            entry("bbbbbbbbbbbb", "1700000000", ":sparkles: A", "")
        );
        let commits = parse_log(&text).unwrap();
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].subject, ":bug: fix\nsecond line");
    }

    #[test]
    fn test_parse_normalizes_emoji() {
        let text = entry("aaaaaaaaaaaa", "1700000000", "✨ shiny", "");
        let commits = parse_log(&text).unwrap();
        assert_eq!(commits[0].subject, ":sparkles: shiny");
    }

    #[test]
    fn test_parse_failure_carries_fragment() {
        let text = r#"{"hash":"abc","id":"a""#;
        let err = parse_log(text).unwrap_err();
        match err {
            GitShipError::CommitParse { fragment, .. } => {
                assert_eq!(fragment, r#"{"hash":"abc","id":"a""#)
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_rejects_text_without_entries() {
        let err = parse_log("fatal: not json at all").unwrap_err();
        match err {
            GitShipError::CommitParse { fragment, reason } => {
                assert_eq!(fragment, "fatal: not json at all");
                assert_eq!(reason, "text outside any log entry");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_rejects_text_before_first_entry() {
        let text = format!(
            "warning: something\n{}",
            entry("aaaaaaaaaaaa", "1700000000", ":bug: B", "")
        );
        assert!(matches!(
            parse_log(&text),
            Err(GitShipError::CommitParse { .. })
        ));
    }

    #[test]
    fn test_parse_bad_timestamp_fails() {
        let text = entry("aaaaaaaaaaaa", "yesterday-ish", ":bug: B", "");
        assert!(matches!(
            parse_log(&text),
            Err(GitShipError::CommitParse { .. })
        ));
    }

    #[test]
    fn test_timestamp_epoch_seconds() {
        let ts = parse_timestamp_str("1700000000").unwrap();
        assert_eq!(ts, Utc.timestamp_opt(1_700_000_000, 0).unwrap());

        let ts = parse_timestamp(&serde_json::json!(1700000000)).unwrap();
        assert_eq!(ts, Utc.timestamp_opt(1_700_000_000, 0).unwrap());
    }

    #[test]
    fn test_timestamp_date_strings_normalize_to_utc() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(parse_timestamp_str("2024-01-02T03:04:05Z"), Some(expected));
        assert_eq!(
            parse_timestamp_str("2024-01-02T05:04:05+02:00"),
            Some(expected)
        );
        assert_eq!(
            parse_timestamp_str("2024-01-02 04:04:05 +0100"),
            Some(expected)
        );
        assert_eq!(
            parse_timestamp_str("Tue, 2 Jan 2024 03:04:05 +0000"),
            Some(expected)
        );
    }

    #[test]
    fn test_timestamp_non_finite_is_not_epoch() {
        assert_eq!(parse_timestamp_str("NaN"), None);
        assert_eq!(parse_timestamp_str("inf"), None);
    }

    #[test]
    fn test_sort_recent_first_is_stable() {
        let text = format!(
            "{}{}{}",
            entry("aaaaaaaaaaaa", "100", ":bug: old", ""),
            entry("bbbbbbbbbbbb", "300", ":bug: new", ""),
            entry("cccccccccccc", "100", ":bug: old too", "")
        );
        let mut commits = parse_log(&text).unwrap();
        sort_recent_first(&mut commits);
        let subjects: Vec<_> = commits.iter().map(|c| c.subject.as_str()).collect();
        assert_eq!(subjects, vec![":bug: new", ":bug: old", ":bug: old too"]);
    }
}
