// ── Buffer abstraction ────────────────────────────────────────────────────────
//
// The editable text the rest of the editor observes and decorates.  All
// positions are character indices (not bytes) so that columns shown in the
// status bar count characters.  Pure Rust; no platform imports.

mod tags;
mod text;

pub(crate) use tags::{StyleRun, Tag, TagSet};
pub(crate) use text::TextBuffer;

/// A half-open range of character indices.
pub(crate) type CharRange = std::ops::Range<usize>;

/// Cursor location for the status bar: 1-based line, 0-based column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CursorPosition {
    pub(crate) line: usize,
    pub(crate) column: usize,
}

/// Geometry of one on-screen display row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DisplayLine {
    /// Top of the row, in pixels from the top of the text area.
    pub(crate) y: i32,
    pub(crate) height: i32,
}

/// The visible window onto a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Viewport {
    /// First visible source line (0-based).
    pub(crate) top_line: usize,
    /// Number of display rows that fit in the text area.
    pub(crate) rows: usize,
    pub(crate) row_height: i32,
    /// Wrap long lines at this many characters; `None` disables wrapping.
    pub(crate) wrap_columns: Option<usize>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            top_line: 0,
            rows: 40,
            row_height: 18,
            wrap_columns: None,
        }
    }
}

/// An editable character sequence with line addressing, a cursor, a
/// viewport and tag ranges.
///
/// Mutating methods are wrapped by `editor::ChangeNotifier`; code outside the
/// notifier should not call them directly on a buffer that has subscribers.
pub(crate) trait Buffer {
    // ── Queries ───────────────────────────────────────────────────────────────

    fn len_chars(&self) -> usize;

    /// The full text.
    fn text(&self) -> String;

    /// Text of `range`, clamped to the buffer.
    fn slice(&self, range: CharRange) -> String;

    /// Number of source lines; an empty buffer has one.
    fn line_count(&self) -> usize;

    /// 0-based line containing `index`.
    fn line_of(&self, index: usize) -> usize;

    /// Index of the first character of `line` (0-based, clamped).
    fn line_start(&self, line: usize) -> usize;

    /// Index just past the last character of `line`, excluding its newline.
    fn line_end(&self, line: usize) -> usize;

    fn cursor(&self) -> usize;

    fn cursor_position(&self) -> CursorPosition {
        let index = self.cursor();
        let line = self.line_of(index);
        CursorPosition {
            line: line + 1,
            column: index - self.line_start(line),
        }
    }

    fn viewport(&self) -> Viewport;

    /// Index of the character at the top-left corner of the viewport.
    fn top_left_index(&self) -> usize {
        self.line_start(self.viewport().top_line)
    }

    /// The display row containing `index`, or `None` when it is not visible.
    fn display_line(&self, index: usize) -> Option<DisplayLine>;

    /// Start of the source line after the one containing `index`.
    fn next_line_start(&self, index: usize) -> Option<usize> {
        let line = self.line_of(index);
        (line + 1 < self.line_count()).then(|| self.line_start(line + 1))
    }

    fn tags(&self) -> &TagSet;

    fn tag_ranges(&self, tag: Tag) -> &[CharRange] {
        self.tags().get(tag).ranges()
    }

    // ── Mutations ─────────────────────────────────────────────────────────────

    /// Insert `text` at `index` (clamped).  A cursor at or after `index`
    /// moves with the inserted text.
    fn insert(&mut self, index: usize, text: &str);

    /// Delete `range` (clamped) and return the removed text.
    fn delete(&mut self, range: CharRange) -> String;

    /// Replace `range` with `text`.
    fn replace(&mut self, range: CharRange, text: &str) {
        let start = range.start;
        self.delete(range);
        self.insert(start, text);
    }

    fn set_cursor(&mut self, index: usize);

    /// Make `line` (0-based, clamped) the first visible line.
    fn scroll_to_line(&mut self, line: usize);

    fn set_viewport(&mut self, viewport: Viewport);

    // ── Tags ──────────────────────────────────────────────────────────────────

    fn tag_add(&mut self, tag: Tag, range: CharRange);

    fn tag_remove(&mut self, tag: Tag, range: CharRange);
}

/// Convert regex matches over `text` into character ranges.
///
/// Matches must be in ascending, non-overlapping order, which is what
/// `Regex::find_iter` yields.
pub(crate) fn char_ranges<'t>(
    text: &'t str,
    matches: impl Iterator<Item = regex::Match<'t>>,
) -> Vec<CharRange> {
    let mut out = Vec::new();
    let mut byte = 0;
    let mut chars = 0;
    for m in matches {
        chars += text[byte..m.start()].chars().count();
        let start = chars;
        chars += m.as_str().chars().count();
        byte = m.end();
        out.push(start..chars);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_ranges_count_characters_not_bytes() {
        let text = "é if ü if";
        let re = regex::Regex::new(r"\bif\b").unwrap();
        assert_eq!(char_ranges(text, re.find_iter(text)), vec![2..4, 7..9]);
    }
}
