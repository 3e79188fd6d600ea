//! Output encoding for the host agent.
//!
//! Diagnostics go to stderr one message at a time, context goes to stdout
//! as a single JSON line, and the verdict's severity becomes the exit code.

use crate::core::verdict::Verdict;
use std::io::{self, Write};

/// Write a verdict to the given streams and return the exit code.
///
/// Writes are best effort: the exit code follows the verdict's severity
/// even when a stream is closed.
pub fn emit<O: Write, E: Write>(verdict: &Verdict, out: &mut O, err: &mut E) -> u8 {
    let code = verdict.severity().exit_code();
    if let Err(e) = write_streams(verdict, out, err) {
        tracing::debug!(error = %e, "could not write verdict");
    }
    code
}

fn write_streams<O: Write, E: Write>(verdict: &Verdict, out: &mut O, err: &mut E) -> io::Result<()> {
    for message in verdict.messages() {
        writeln!(err, "{}", message)?;
    }
    if let Some(payload) = verdict.context_payload() {
        writeln!(out, "{}", payload)?;
    }
    out.flush()?;
    err.flush()
}

/// Collapse newlines/extra whitespace and bound length for one log line.
pub fn compact_line(input: &str, max_chars: usize) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = collapsed.chars();
    let preview: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", preview)
    } else {
        preview
    }
}
