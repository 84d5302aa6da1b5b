//! Formatting functions for terminal output.
//!
//! Every line goes to stderr so that stdout carries only the requested
//! payload (a changelog or JSON document).

use crate::analyzer::Release;
use crate::boundary::BoundaryWarning;
use crate::manifest::Manifest;
use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
///
/// Shows a yellow warning icon followed by the warning message.
///
/// # Arguments
/// * `warning` - The boundary warning to display
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// One-line summary of an assembled release.
///
/// # Arguments
/// * `release` - The assembled release
pub fn release_summary(release: &Release) -> String {
    let counts: Vec<String> = release
        .changes
        .iter()
        .filter(|group| !group.commits.is_empty())
        .map(|group| format!("{} {}", group.commits.len(), group.label))
        .collect();

    let since = if release.previous_tag.is_empty() {
        String::new()
    } else {
        format!(" since {}", release.previous_tag)
    };

    if counts.is_empty() {
        format!("Release {}{}: no changes", release.tag, since)
    } else {
        format!("Release {}{}: {}", release.tag, since, counts.join(", "))
    }
}

/// One-line summary of a built manifest.
///
/// # Arguments
/// * `manifest` - The built manifest
pub fn manifest_summary(manifest: &Manifest) -> String {
    format!(
        "Manifest: {} files ({} unique), {} bytes",
        manifest.file_count(),
        manifest.side_table.len(),
        manifest.total_size()
    )
}
