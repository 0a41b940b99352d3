// ── In-memory text buffer ─────────────────────────────────────────────────────
//
// A `String` plus a line-start index.  Documents are small, so edits rebuild
// the index and convert character indices to byte offsets by scanning.

use super::{Buffer, CharRange, DisplayLine, Tag, TagSet, Viewport};

/// The buffer behind every document.
#[derive(Debug, Clone)]
pub(crate) struct TextBuffer {
    text: String,
    /// Character index of the first character of each line; never empty.
    line_starts: Vec<usize>,
    len: usize,
    cursor: usize,
    viewport: Viewport,
    tags: TagSet,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    pub(crate) fn new() -> Self {
        Self {
            text: String::new(),
            line_starts: vec![0],
            len: 0,
            cursor: 0,
            viewport: Viewport::default(),
            tags: TagSet::default(),
        }
    }

    /// Borrow the text without copying it.
    pub(crate) fn as_str(&self) -> &str {
        &self.text
    }

    fn byte_offset(&self, index: usize) -> usize {
        self.text
            .char_indices()
            .nth(index)
            .map_or(self.text.len(), |(b, _)| b)
    }

    fn reindex(&mut self) {
        self.line_starts.clear();
        self.line_starts.push(0);
        let mut count = 0;
        for c in self.text.chars() {
            count += 1;
            if c == '\n' {
                self.line_starts.push(count);
            }
        }
        self.len = count;
        self.viewport.top_line = self.viewport.top_line.min(self.line_starts.len() - 1);
    }

    /// Display rows occupied by `line` under the current wrap setting.
    fn rows_of(&self, line: usize) -> usize {
        match self.viewport.wrap_columns {
            Some(width) if width > 0 => {
                let chars = self.line_end(line) - self.line_start(line);
                chars.div_ceil(width).max(1)
            }
            _ => 1,
        }
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.text.push_str(text);
        buffer.reindex();
        buffer
    }
}

impl Buffer for TextBuffer {
    fn len_chars(&self) -> usize {
        self.len
    }

    fn text(&self) -> String {
        self.text.clone()
    }

    fn slice(&self, range: CharRange) -> String {
        let start = range.start.min(self.len);
        let end = range.end.clamp(start, self.len);
        self.text.chars().skip(start).take(end - start).collect()
    }

    fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    fn line_of(&self, index: usize) -> usize {
        self.line_starts.partition_point(|&s| s <= index) - 1
    }

    fn line_start(&self, line: usize) -> usize {
        self.line_starts[line.min(self.line_starts.len() - 1)]
    }

    fn line_end(&self, line: usize) -> usize {
        match self.line_starts.get(line + 1) {
            Some(&next) => next - 1,
            None => self.len,
        }
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn display_line(&self, index: usize) -> Option<DisplayLine> {
        let line = self.line_of(index.min(self.len));
        let top = self.viewport.top_line;
        if line < top {
            return None;
        }
        let mut row: usize = (top..line).map(|l| self.rows_of(l)).sum();
        if let Some(width) = self.viewport.wrap_columns.filter(|&w| w > 0) {
            let column = index.min(self.len) - self.line_start(line);
            // The end-of-line position belongs to the last row.
            row += (column / width).min(self.rows_of(line) - 1);
        }
        if row >= self.viewport.rows {
            return None;
        }
        let height = self.viewport.row_height;
        Some(DisplayLine {
            y: row as i32 * height,
            height,
        })
    }

    fn tags(&self) -> &TagSet {
        &self.tags
    }

    fn insert(&mut self, index: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let index = index.min(self.len);
        let byte = self.byte_offset(index);
        self.text.insert_str(byte, text);
        let count = text.chars().count();
        if self.cursor >= index {
            self.cursor += count;
        }
        self.tags.on_insert(index, count);
        self.reindex();
    }

    fn delete(&mut self, range: CharRange) -> String {
        let start = range.start.min(self.len);
        let end = range.end.clamp(start, self.len);
        if start == end {
            return String::new();
        }
        let (from, to) = (self.byte_offset(start), self.byte_offset(end));
        let removed: String = self.text.drain(from..to).collect();
        if self.cursor >= end {
            self.cursor -= end - start;
        } else if self.cursor > start {
            self.cursor = start;
        }
        self.tags.on_delete(start..end);
        self.reindex();
        removed
    }

    fn set_cursor(&mut self, index: usize) {
        self.cursor = index.min(self.len);
    }

    fn scroll_to_line(&mut self, line: usize) {
        self.viewport.top_line = line.min(self.line_starts.len() - 1);
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.viewport.top_line = viewport.top_line.min(self.line_starts.len() - 1);
    }

    fn tag_add(&mut self, tag: Tag, range: CharRange) {
        let end = range.end.min(self.len);
        self.tags.get_mut(tag).add(range.start.min(end)..end);
    }

    fn tag_remove(&mut self, tag: Tag, range: CharRange) {
        self.tags.get_mut(tag).remove(range);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(rows: usize, wrap: Option<usize>) -> Viewport {
        Viewport {
            top_line: 0,
            rows,
            row_height: 10,
            wrap_columns: wrap,
        }
    }

    #[test]
    fn empty_buffer_has_one_line() {
        let b = TextBuffer::new();
        assert_eq!(b.len_chars(), 0);
        assert_eq!(b.line_count(), 1);
        assert_eq!(b.line_of(0), 0);
        assert_eq!(b.line_end(0), 0);
    }

    #[test]
    fn line_addressing() {
        let b = TextBuffer::from("ab\ncde\n\nf");
        assert_eq!(b.line_count(), 4);
        assert_eq!(b.line_start(1), 3);
        assert_eq!(b.line_end(1), 6);
        assert_eq!(b.line_of(6), 1);
        assert_eq!(b.line_of(7), 2);
        assert_eq!(b.line_start(2), b.line_end(2));
        assert_eq!(b.next_line_start(0), Some(3));
        assert_eq!(b.next_line_start(9), None);
    }

    #[test]
    fn insert_and_delete_use_character_indices() {
        let mut b = TextBuffer::from("héllo");
        b.insert(2, "XY");
        assert_eq!(b.as_str(), "héXYllo");
        let removed = b.delete(1..4);
        assert_eq!(removed, "éXY");
        assert_eq!(b.as_str(), "hllo");
        assert_eq!(b.slice(1..3), "ll");
    }

    #[test]
    fn out_of_range_positions_are_clamped() {
        let mut b = TextBuffer::from("abc");
        b.insert(99, "!");
        assert_eq!(b.as_str(), "abc!");
        assert_eq!(b.delete(3..99), "!");
        assert_eq!(b.delete(5..9), "");
        b.set_cursor(42);
        assert_eq!(b.cursor(), 3);
    }

    #[test]
    fn cursor_follows_insertions_at_or_before_it() {
        let mut b = TextBuffer::from("abc");
        b.set_cursor(1);
        b.insert(1, "xx");
        assert_eq!(b.cursor(), 3);
        b.insert(3, "y");
        assert_eq!(b.cursor(), 4);
        b.insert(5, "z");
        assert_eq!(b.cursor(), 4);
    }

    #[test]
    fn cursor_inside_deleted_span_collapses_to_start() {
        let mut b = TextBuffer::from("abcdef");
        b.set_cursor(4);
        b.delete(2..5);
        assert_eq!(b.cursor(), 2);
        b.set_cursor(3);
        b.delete(0..1);
        assert_eq!(b.cursor(), 2);
    }

    #[test]
    fn cursor_position_is_one_based_line_zero_based_column() {
        let mut b = TextBuffer::from("one\ntwo");
        b.set_cursor(6);
        let pos = b.cursor_position();
        assert_eq!((pos.line, pos.column), (2, 2));
    }

    #[test]
    fn tags_follow_edits() {
        let mut b = TextBuffer::from("if x: pass");
        b.tag_add(Tag::Keyword, 0..2);
        b.insert(0, "  ");
        assert_eq!(b.tag_ranges(Tag::Keyword), &[2..4]);
        b.delete(0..3);
        assert_eq!(b.tag_ranges(Tag::Keyword), &[0..1]);
    }

    #[test]
    fn tag_add_clamps_to_length() {
        let mut b = TextBuffer::from("abc");
        b.tag_add(Tag::Found, 1..10);
        assert_eq!(b.tag_ranges(Tag::Found), &[1..3]);
        b.tag_add(Tag::Found, 8..10);
        assert_eq!(b.tag_ranges(Tag::Found), &[1..3]);
    }

    #[test]
    fn display_lines_without_wrap() {
        let mut b = TextBuffer::from("a\nb\nc\nd");
        b.set_viewport(viewport(2, None));
        assert_eq!(b.display_line(0), Some(DisplayLine { y: 0, height: 10 }));
        assert_eq!(b.display_line(2), Some(DisplayLine { y: 10, height: 10 }));
        assert_eq!(b.display_line(4), None);
        b.scroll_to_line(2);
        assert_eq!(b.top_left_index(), 4);
        assert_eq!(b.display_line(0), None);
        assert_eq!(b.display_line(6), Some(DisplayLine { y: 10, height: 10 }));
    }

    #[test]
    fn wrapped_line_spans_several_rows() {
        let mut b = TextBuffer::from("abcdefghij\nk");
        b.set_viewport(viewport(5, Some(4)));
        // 10 characters at width 4 → 3 rows.
        assert_eq!(b.display_line(0).map(|d| d.y), Some(0));
        assert_eq!(b.display_line(5).map(|d| d.y), Some(10));
        assert_eq!(b.display_line(10).map(|d| d.y), Some(20));
        assert_eq!(b.display_line(11).map(|d| d.y), Some(30));
    }

    #[test]
    fn scroll_is_clamped_to_last_line() {
        let mut b = TextBuffer::from("a\nb");
        b.scroll_to_line(10);
        assert_eq!(b.viewport().top_line, 1);
        b.delete(1..3);
        assert_eq!(b.viewport().top_line, 0);
    }

    #[test]
    fn replace_swaps_text() {
        let mut b = TextBuffer::from("foo bar");
        b.replace(4..7, "baz!");
        assert_eq!(b.as_str(), "foo baz!");
    }
}
