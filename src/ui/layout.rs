// ── Text-area layout ──────────────────────────────────────────────────────────
//
// Turns a buffer's viewport into the rows the platform layer paints.  Each
// row is a slice of one source line (several rows per line when wrapping),
// split into runs by the highest-priority tag covering each character.

use crate::buffer::{Buffer, CharRange, StyleRun};

/// One display row ready to paint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PaintRow {
    /// Top of the row in pixels, relative to the text area.
    pub(crate) y: i32,
    /// Characters shown on this row.
    pub(crate) span: CharRange,
    /// Non-empty, contiguous, covering `span`.
    pub(crate) runs: Vec<StyleRun>,
}

/// Where the caret is drawn: the row's top and the column within the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Caret {
    pub(crate) y: i32,
    pub(crate) column: usize,
}

/// Every visible row of `buffer`, top to bottom.
pub(crate) fn visible_rows(buffer: &impl Buffer) -> Vec<PaintRow> {
    let view = buffer.viewport();
    let width = view.wrap_columns.filter(|&w| w > 0);
    let mut rows = Vec::new();
    let mut line = view.top_line;
    while line < buffer.line_count() {
        let (start, end) = (buffer.line_start(line), buffer.line_end(line));
        let mut row_start = start;
        loop {
            let Some(dl) = buffer.display_line(row_start) else {
                return rows;
            };
            let row_end = match width {
                Some(w) => (row_start + w).min(end),
                None => end,
            };
            rows.push(PaintRow {
                y: dl.y,
                span: row_start..row_end,
                runs: buffer.tags().style_runs(row_start..row_end),
            });
            if row_end >= end {
                break;
            }
            row_start = row_end;
        }
        line += 1;
    }
    rows
}

/// The caret cell, or `None` when the cursor is scrolled out of view.
pub(crate) fn caret(buffer: &impl Buffer) -> Option<Caret> {
    let cursor = buffer.cursor();
    let dl = buffer.display_line(cursor)?;
    let line_start = buffer.line_start(buffer.line_of(cursor));
    let mut column = cursor - line_start;
    if let Some(w) = buffer.viewport().wrap_columns.filter(|&w| w > 0) {
        let row = (dl.y - first_row_y(buffer, line_start)) / dl.height.max(1);
        column -= row as usize * w;
    }
    Some(Caret { y: dl.y, column })
}

/// Top of a line's first row, given the line's start index.
fn first_row_y(buffer: &impl Buffer, line_start: usize) -> i32 {
    buffer.display_line(line_start).map_or(0, |dl| dl.y)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{Tag, TextBuffer, Viewport};

    fn buffer(text: &str, rows: usize, wrap: Option<usize>) -> TextBuffer {
        let mut b = TextBuffer::from(text);
        b.set_viewport(Viewport {
            top_line: 0,
            rows,
            row_height: 10,
            wrap_columns: wrap,
        });
        b
    }

    fn spans(rows: &[PaintRow]) -> Vec<(i32, CharRange)> {
        rows.iter().map(|r| (r.y, r.span.clone())).collect()
    }

    #[test]
    fn one_row_per_line_without_wrap() {
        let b = buffer("ab\n\ncde", 10, None);
        assert_eq!(spans(&visible_rows(&b)), vec![(0, 0..2), (10, 3..3), (20, 4..7)]);
    }

    #[test]
    fn wrapped_lines_split_into_rows() {
        let b = buffer("abcdefg\nh", 10, Some(3));
        assert_eq!(
            spans(&visible_rows(&b)),
            vec![(0, 0..3), (10, 3..6), (20, 6..7), (30, 8..9)]
        );
    }

    #[test]
    fn rows_stop_at_viewport_bottom() {
        let mut b = buffer("a\nb\nc\nd", 2, None);
        b.scroll_to_line(1);
        assert_eq!(spans(&visible_rows(&b)), vec![(0, 2..3), (10, 4..5)]);
    }

    #[test]
    fn runs_follow_tags() {
        let mut b = buffer("if x", 10, None);
        b.tag_add(Tag::Keyword, 0..2);
        let rows = visible_rows(&b);
        let tags: Vec<_> = rows[0].runs.iter().map(|r| (r.range.clone(), r.tag)).collect();
        assert_eq!(tags, vec![(0..2, Some(Tag::Keyword)), (2..4, None)]);
    }

    #[test]
    fn caret_tracks_cursor() {
        let mut b = buffer("abc\ndef", 10, None);
        b.set_cursor(5);
        assert_eq!(caret(&b), Some(Caret { y: 10, column: 1 }));
    }

    #[test]
    fn caret_on_wrapped_row() {
        let mut b = buffer("abcdefg", 10, Some(3));
        b.set_cursor(4);
        assert_eq!(caret(&b), Some(Caret { y: 10, column: 1 }));
        b.set_cursor(7);
        assert_eq!(caret(&b), Some(Caret { y: 20, column: 1 }));
    }

    #[test]
    fn caret_hidden_when_scrolled_away() {
        let mut b = buffer("a\nb\nc", 1, None);
        b.scroll_to_line(2);
        assert_eq!(caret(&b), None);
    }
}
