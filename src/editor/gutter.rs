// ── Line-number gutter & status indicator ─────────────────────────────────────
//
// Both are recomputed from scratch on every change notification.  They hold
// what should be drawn; the platform layer does the drawing.

use crate::buffer::{Buffer, CursorPosition};

/// One line number to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GutterGlyph {
    /// 1-based source line number.
    pub(crate) line: usize,
    /// Top of the line's first display row, in pixels.
    pub(crate) y: i32,
}

/// The line numbers currently visible beside a document.
#[derive(Debug, Default)]
pub(crate) struct LineGutter {
    glyphs: Vec<GutterGlyph>,
}

impl LineGutter {
    /// Discard the previous glyphs and lay out one per visible source line,
    /// starting with the line at the top-left of the viewport.
    pub(crate) fn redraw(&mut self, buffer: &impl Buffer) {
        self.glyphs.clear();
        let mut index = buffer.top_left_index();
        while let Some(row) = buffer.display_line(index) {
            self.glyphs.push(GutterGlyph {
                line: buffer.line_of(index) + 1,
                y: row.y,
            });
            match buffer.next_line_start(index) {
                Some(next) => index = next,
                None => break,
            }
        }
    }

    pub(crate) fn glyphs(&self) -> &[GutterGlyph] {
        &self.glyphs
    }

    /// Digits needed for the widest visible number (at least two).
    pub(crate) fn digits(&self) -> usize {
        let widest = self.glyphs.last().map_or(1, |g| g.line);
        widest.to_string().len().max(2)
    }
}

/// The `Line: n | Col: m` text shown in the status bar.
#[derive(Debug)]
pub(crate) struct StatusIndicator {
    text: String,
}

impl Default for StatusIndicator {
    fn default() -> Self {
        Self {
            text: Self::format(CursorPosition { line: 1, column: 0 }),
        }
    }
}

impl StatusIndicator {
    fn format(pos: CursorPosition) -> String {
        format!("Line: {} | Col: {}", pos.line, pos.column)
    }

    pub(crate) fn update(&mut self, pos: CursorPosition) {
        self.text = Self::format(pos);
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{TextBuffer, Viewport};

    fn buffer(text: &str, rows: usize, wrap: Option<usize>) -> TextBuffer {
        let mut b = TextBuffer::from(text);
        b.set_viewport(Viewport {
            top_line: 0,
            rows,
            row_height: 16,
            wrap_columns: wrap,
        });
        b
    }

    fn lines(g: &LineGutter) -> Vec<usize> {
        g.glyphs().iter().map(|g| g.line).collect()
    }

    #[test]
    fn one_glyph_per_visible_row_without_wrap() {
        let text = (1..=10).map(|n| n.to_string()).collect::<Vec<_>>().join("\n");
        for rows in 0..14 {
            let b = buffer(&text, rows, None);
            let mut g = LineGutter::default();
            g.redraw(&b);
            assert_eq!(g.glyphs().len(), rows.min(10), "rows = {rows}");
        }
    }

    #[test]
    fn glyphs_are_stacked_top_to_bottom() {
        let b = buffer("a\nb\nc", 10, None);
        let mut g = LineGutter::default();
        g.redraw(&b);
        assert_eq!(
            g.glyphs(),
            &[
                GutterGlyph { line: 1, y: 0 },
                GutterGlyph { line: 2, y: 16 },
                GutterGlyph { line: 3, y: 32 },
            ]
        );
    }

    #[test]
    fn empty_buffer_shows_line_one() {
        let mut g = LineGutter::default();
        g.redraw(&buffer("", 5, None));
        assert_eq!(lines(&g), vec![1]);
    }

    #[test]
    fn zero_rows_draw_nothing() {
        let mut g = LineGutter::default();
        g.redraw(&buffer("", 0, None));
        assert!(g.glyphs().is_empty());
        g.redraw(&buffer("a\nb", 0, None));
        assert!(g.glyphs().is_empty());
    }

    #[test]
    fn wrapped_line_gets_a_single_number() {
        // Line 1 wraps over three rows at width 4.
        let b = buffer("abcdefghij\nk\nl", 4, Some(4));
        let mut g = LineGutter::default();
        g.redraw(&b);
        assert_eq!(
            g.glyphs(),
            &[
                GutterGlyph { line: 1, y: 0 },
                GutterGlyph { line: 2, y: 48 },
            ]
        );
    }

    #[test]
    fn starts_from_the_scrolled_top_line() {
        let mut b = buffer("a\nb\nc\nd\ne", 2, None);
        b.scroll_to_line(3);
        let mut g = LineGutter::default();
        g.redraw(&b);
        assert_eq!(lines(&g), vec![4, 5]);
        assert_eq!(g.glyphs()[0].y, 0);
    }

    #[test]
    fn redraw_replaces_previous_glyphs() {
        let mut g = LineGutter::default();
        g.redraw(&buffer("a\nb\nc", 10, None));
        g.redraw(&buffer("a", 10, None));
        assert_eq!(lines(&g), vec![1]);
    }

    #[test]
    fn digits_grow_with_line_numbers() {
        let mut g = LineGutter::default();
        g.redraw(&buffer("a", 10, None));
        assert_eq!(g.digits(), 2);
        let text = "x\n".repeat(120);
        let mut b = buffer(&text, 200, None);
        b.scroll_to_line(0);
        g.redraw(&b);
        assert_eq!(g.digits(), 3);
    }

    #[test]
    fn status_text_format() {
        let mut s = StatusIndicator::default();
        assert_eq!(s.text(), "Line: 1 | Col: 0");
        s.update(CursorPosition { line: 12, column: 7 });
        assert_eq!(s.text(), "Line: 12 | Col: 7");
    }
}
