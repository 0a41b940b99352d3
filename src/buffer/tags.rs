// ── Tag ranges ────────────────────────────────────────────────────────────────
//
// Per-tag bookkeeping of styled character ranges.  Ranges are kept sorted,
// non-overlapping and merged, and follow the text through edits the way a
// text widget's tags do.

use super::CharRange;

/// A named style that can be applied to character ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Tag {
    /// Keyword highlight, re-established on every key release.
    Keyword,
    /// Search match highlight.
    Found,
}

impl Tag {
    /// Every tag, lowest paint priority first.
    pub(crate) const ALL: [Tag; 2] = [Tag::Keyword, Tag::Found];

    pub(crate) fn name(self) -> &'static str {
        match self {
            Tag::Keyword => "keyword",
            Tag::Found => "found",
        }
    }
}

// ── TagRanges ─────────────────────────────────────────────────────────────────

/// Sorted, merged ranges carrying one tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TagRanges {
    ranges: Vec<CharRange>,
}

impl TagRanges {
    pub(crate) fn ranges(&self) -> &[CharRange] {
        &self.ranges
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// `true` when the character at `index` carries this tag.
    pub(crate) fn contains(&self, index: usize) -> bool {
        let i = self.ranges.partition_point(|r| r.end <= index);
        self.ranges.get(i).is_some_and(|r| r.start <= index)
    }

    /// Tag `range`, merging with overlapping or touching ranges.
    pub(crate) fn add(&mut self, range: CharRange) {
        if range.start >= range.end {
            return;
        }
        let mut merged = range;
        // First range whose end reaches the new start; last whose start reaches the new end.
        let first = self.ranges.partition_point(|r| r.end < merged.start);
        let mut last = first;
        while last < self.ranges.len() && self.ranges[last].start <= merged.end {
            merged.start = merged.start.min(self.ranges[last].start);
            merged.end = merged.end.max(self.ranges[last].end);
            last += 1;
        }
        self.ranges.splice(first..last, std::iter::once(merged));
    }

    /// Untag `range`, splitting ranges that straddle its ends.
    pub(crate) fn remove(&mut self, range: CharRange) {
        if range.start >= range.end || self.ranges.is_empty() {
            return;
        }
        let mut kept = Vec::with_capacity(self.ranges.len() + 1);
        for r in self.ranges.drain(..) {
            if r.end <= range.start || r.start >= range.end {
                kept.push(r);
                continue;
            }
            if r.start < range.start {
                kept.push(r.start..range.start);
            }
            if r.end > range.end {
                kept.push(range.end..r.end);
            }
        }
        self.ranges = kept;
    }

    /// Shift ranges for `count` characters inserted at `at`.
    ///
    /// Text inserted strictly inside a range joins it; text inserted at a
    /// range boundary stays untagged.
    pub(crate) fn on_insert(&mut self, at: usize, count: usize) {
        for r in &mut self.ranges {
            if r.start >= at {
                r.start += count;
                r.end += count;
            } else if r.end > at {
                r.end += count;
            }
        }
    }

    /// Shrink or drop ranges for the deleted span `removed`.
    pub(crate) fn on_delete(&mut self, removed: CharRange) {
        let len = removed.end - removed.start;
        let map = |x: usize| {
            if x <= removed.start {
                x
            } else if x >= removed.end {
                x - len
            } else {
                removed.start
            }
        };
        let old = std::mem::take(&mut self.ranges);
        for r in old {
            // Deletion can make neighbours touch; `add` merges them again.
            self.add(map(r.start)..map(r.end));
        }
    }
}

// ── TagSet ────────────────────────────────────────────────────────────────────

/// A segment of text with uniform styling, used by the painter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StyleRun {
    pub(crate) range: CharRange,
    /// Topmost tag covering the run, if any.
    pub(crate) tag: Option<Tag>,
}

/// All tag ranges of one buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TagSet {
    keyword: TagRanges,
    found: TagRanges,
}

impl TagSet {
    pub(crate) fn get(&self, tag: Tag) -> &TagRanges {
        match tag {
            Tag::Keyword => &self.keyword,
            Tag::Found => &self.found,
        }
    }

    pub(crate) fn get_mut(&mut self, tag: Tag) -> &mut TagRanges {
        match tag {
            Tag::Keyword => &mut self.keyword,
            Tag::Found => &mut self.found,
        }
    }

    pub(crate) fn on_insert(&mut self, at: usize, count: usize) {
        self.keyword.on_insert(at, count);
        self.found.on_insert(at, count);
    }

    pub(crate) fn on_delete(&mut self, removed: CharRange) {
        self.keyword.on_delete(removed.clone());
        self.found.on_delete(removed);
    }

    /// The topmost tag at `index`.  `Found` paints over `Keyword`.
    pub(crate) fn top_tag(&self, index: usize) -> Option<Tag> {
        Tag::ALL
            .iter()
            .rev()
            .copied()
            .find(|&tag| self.get(tag).contains(index))
    }

    /// Split `span` into runs of uniform topmost tag.
    pub(crate) fn style_runs(&self, span: CharRange) -> Vec<StyleRun> {
        let mut runs: Vec<StyleRun> = Vec::new();
        for index in span {
            let tag = self.top_tag(index);
            match runs.last_mut() {
                Some(run) if run.tag == tag && run.range.end == index => run.range.end += 1,
                _ => runs.push(StyleRun {
                    range: index..index + 1,
                    tag,
                }),
            }
        }
        runs
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(t: &TagRanges) -> Vec<CharRange> {
        t.ranges().to_vec()
    }

    #[test]
    fn add_keeps_sorted_and_merges_overlaps() {
        let mut t = TagRanges::default();
        t.add(10..12);
        t.add(0..3);
        t.add(2..5);
        assert_eq!(ranges(&t), vec![0..5, 10..12]);
    }

    #[test]
    fn add_merges_touching_ranges() {
        let mut t = TagRanges::default();
        t.add(0..3);
        t.add(3..6);
        assert_eq!(ranges(&t), vec![0..6]);
    }

    #[test]
    fn add_ignores_empty_range() {
        let mut t = TagRanges::default();
        t.add(4..4);
        assert!(t.is_empty());
    }

    #[test]
    fn remove_splits_straddling_range() {
        let mut t = TagRanges::default();
        t.add(0..10);
        t.remove(3..5);
        assert_eq!(ranges(&t), vec![0..3, 5..10]);
    }

    #[test]
    fn insert_inside_grows_insert_at_boundary_shifts() {
        let mut t = TagRanges::default();
        t.add(2..5);
        t.on_insert(3, 2);
        assert_eq!(ranges(&t), vec![2..7]);
        t.on_insert(2, 1);
        assert_eq!(ranges(&t), vec![3..8]);
        t.on_insert(8, 4);
        assert_eq!(ranges(&t), vec![3..8]);
    }

    #[test]
    fn delete_shrinks_drops_and_remerges() {
        let mut t = TagRanges::default();
        t.add(0..2);
        t.add(4..6);
        t.add(8..9);
        // Removing 2..4 makes the first two ranges touch.
        t.on_delete(2..4);
        assert_eq!(ranges(&t), vec![0..4, 6..7]);
        t.on_delete(6..7);
        assert_eq!(ranges(&t), vec![0..4]);
    }

    #[test]
    fn contains_respects_half_open_ranges() {
        let mut t = TagRanges::default();
        t.add(2..4);
        assert!(!t.contains(1));
        assert!(t.contains(2));
        assert!(t.contains(3));
        assert!(!t.contains(4));
    }

    #[test]
    fn found_paints_over_keyword() {
        let mut set = TagSet::default();
        set.get_mut(Tag::Keyword).add(0..3);
        set.get_mut(Tag::Found).add(2..5);
        let runs = set.style_runs(0..6);
        assert_eq!(
            runs,
            vec![
                StyleRun { range: 0..2, tag: Some(Tag::Keyword) },
                StyleRun { range: 2..5, tag: Some(Tag::Found) },
                StyleRun { range: 5..6, tag: None },
            ]
        );
    }

    #[test]
    fn tag_names() {
        assert_eq!(Tag::Keyword.name(), "keyword");
        assert_eq!(Tag::Found.name(), "found");
    }
}
