//! Line formatting for turn content.
//!
//! This is a deliberately small policy: no markdown, just a per-line cleanup
//! that drops the first bullet asterisk the backend tends to emit.

/// Trim a line and replace its first `*` with a single space. The result is
/// not trimmed again, so a leading `*` leaves a leading space behind.
pub fn format_line(line: &str) -> String {
    line.trim().replacen('*', " ", 1)
}

/// Split content on `\n` and format every piece. Empty content yields a
/// single empty block.
pub fn format_content(content: &str) -> Vec<String> {
    content.split('\n').map(format_line).collect()
}
