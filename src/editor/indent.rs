// ── Auto-indent ───────────────────────────────────────────────────────────────
//
// Return carries the current line's leading whitespace onto the new line and
// adds one indent step after a trailing colon.

use crate::{buffer::Buffer, editor::ChangeNotifier};

/// Whether a key handler consumed the key or the default action should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyOutcome {
    /// Handled; suppress the default action.
    Handled,
    Default,
}

/// Indentation for the line that follows `before_cursor`.
///
/// `before_cursor` is the current line from its start up to the cursor.
pub(crate) fn indent_for(before_cursor: &str, indent_width: usize) -> String {
    let body = before_cursor.trim_start();
    let mut indent = before_cursor[..before_cursor.len() - body.len()].to_owned();
    if before_cursor.trim_end().ends_with(':') {
        indent.extend(std::iter::repeat(' ').take(indent_width));
    }
    indent
}

/// Insert a newline plus the computed indent at the cursor.
///
/// Always returns `KeyOutcome::Handled`: this insertion replaces the default
/// newline.
pub(crate) fn auto_indent<B: Buffer>(
    notifier: &mut ChangeNotifier<B>,
    indent_width: usize,
) -> KeyOutcome {
    let buffer = notifier.buffer();
    let cursor = buffer.cursor();
    let line_start = buffer.line_start(buffer.line_of(cursor));
    let before = buffer.slice(line_start..cursor);
    let inserted = format!("\n{}", indent_for(&before, indent_width));
    notifier.insert(cursor, &inserted);
    KeyOutcome::Handled
}

// ── Tests ─────────────────────────────────────────────────────────────────────
