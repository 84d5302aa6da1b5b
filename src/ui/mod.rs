//! User interface module - terminal output.
//!
//! Separates concerns:
//! - `formatter` - Message formatting and coloured status lines
//! - This module - Payload output on stdout

use std::io::{self, Write};

use anyhow::Result;
use serde::Serialize;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_error, display_status, display_success, manifest_summary,
    release_summary,
};

/// Write a value to stdout as pretty-printed JSON.
///
/// # Arguments
/// * `value` - Any serializable payload (release, manifest)
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value)?;
    writeln!(handle)?;
    Ok(())
}

/// Write text to stdout unchanged.
///
/// # Arguments
/// * `text` - Rendered payload, e.g. a changelog section
pub fn print_text(text: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(text.as_bytes())?;
    handle.flush()?;
    Ok(())
}
