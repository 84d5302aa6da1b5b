//! Markdown rendering of an assembled release.

use crate::analyzer::Release;
use crate::domain::label::strip_markers;
use crate::domain::Commit;
use std::fmt::Write;

/// Render a release as a changelog section.
///
/// Empty buckets are left out; the rest appear in label order with one
/// bullet per commit, newest first.
///
/// # Arguments
/// * `release` - The assembled release
/// * `strip` - Remove `:code:` markers from subjects for display
pub fn render_markdown(release: &Release, strip: bool) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "## [{}]\n", release.version);
    if !release.previous_tag.is_empty() {
        let _ = writeln!(output, "Changes since {}...{}\n", release.previous_tag, release.tag);
    }

    if release.changes.is_empty() {
        output.push_str("_No changes._\n");
        return output;
    }

    for group in release.changes.iter().filter(|g| !g.commits.is_empty()) {
        let _ = writeln!(output, "### {}\n", group.label);
        for commit in &group.commits {
            output.push_str(&format_commit(commit, strip));
        }
        output.push('\n');
    }

    output
}

/// Format a single commit as a Markdown list item.
fn format_commit(commit: &Commit, strip: bool) -> String {
    // Only the first line of a multi-line subject makes the bullet.
    let first_line = commit.subject.lines().next().unwrap_or_default();
    let subject = if strip {
        strip_markers(first_line)
    } else {
        first_line.trim().to_string()
    };
    format!("- {} ({})\n", subject, commit.id)
}
