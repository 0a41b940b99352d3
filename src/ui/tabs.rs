// ── Tab manager ───────────────────────────────────────────────────────────────
//
// Pure Rust state that mirrors the Win32 tab strip content.
// No Win32 calls here; all control messages are sent from `platform::win32::window`.

use crate::app::Document;

/// Compute the display label for a tab from its document.
///
/// Format:
/// - clean → `"title"`
/// - dirty → `"*title"`
pub(crate) fn tab_label(doc: &Document) -> String {
    if doc.is_dirty() {
        format!("*{}", doc.title())
    } else {
        doc.title().to_owned()
    }
}

/// The ordered open documents and which one is active.
#[derive(Default)]
pub(crate) struct Tabs {
    docs: Vec<Document>,
    active: Option<usize>,
}

impl Tabs {
    pub(crate) fn len(&self) -> usize {
        self.docs.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Append `doc` and make it active.  Returns its index.
    pub(crate) fn push(&mut self, doc: Document) -> usize {
        self.docs.push(doc);
        let index = self.docs.len() - 1;
        self.active = Some(index);
        index
    }

    /// Make tab `index` active.  Returns `false` when out of range.
    pub(crate) fn select(&mut self, index: usize) -> bool {
        if index < self.docs.len() {
            self.active = Some(index);
            true
        } else {
            false
        }
    }

    pub(crate) fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub(crate) fn active(&self) -> Option<&Document> {
        self.active.and_then(|i| self.docs.get(i))
    }

    pub(crate) fn active_mut(&mut self) -> Option<&mut Document> {
        self.active.and_then(|i| self.docs.get_mut(i))
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Document> {
        self.docs.get(index)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Document> {
        self.docs.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Document> {
        self.docs.iter_mut()
    }

    /// Close tab `index` and dispose of its document.
    ///
    /// The tab to the right (or, for the last tab, to the left) becomes
    /// active if the closed tab was active.
    pub(crate) fn close(&mut self, index: usize) -> bool {
        if index >= self.docs.len() {
            return false;
        }
        self.docs.remove(index).close();
        self.active = match self.active {
            _ if self.docs.is_empty() => None,
            Some(a) if a > index => Some(a - 1),
            Some(a) if a == index => Some(index.min(self.docs.len() - 1)),
            other => other,
        };
        true
    }

    pub(crate) fn labels(&self) -> Vec<String> {
        self.docs.iter().map(tab_label).collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn tabs(titles: &[&str]) -> Tabs {
        let mut t = Tabs::default();
        for title in titles {
            t.push(Document::new(*title));
        }
        t
    }

    fn active_title(t: &Tabs) -> Option<String> {
        t.active().map(|d| d.title().to_owned())
    }

    #[test]
    fn push_selects_new_tab() {
        let t = tabs(&["a", "b"]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.active_index(), Some(1));
    }

    #[test]
    fn select_switches_active_document() {
        let mut t = tabs(&["a", "b", "c"]);
        assert!(t.select(0));
        assert_eq!(active_title(&t).as_deref(), Some("a"));
        assert!(!t.select(3));
        assert_eq!(t.active_index(), Some(0));
    }

    #[test]
    fn empty_manager_has_no_active() {
        let t = Tabs::default();
        assert!(t.is_empty());
        assert!(t.active().is_none());
    }

    #[test]
    fn closing_active_moves_to_right_neighbour() {
        let mut t = tabs(&["a", "b", "c"]);
        t.select(1);
        assert!(t.close(1));
        assert_eq!(active_title(&t).as_deref(), Some("c"));
    }

    #[test]
    fn closing_last_active_moves_left() {
        let mut t = tabs(&["a", "b", "c"]);
        t.close(2);
        assert_eq!(active_title(&t).as_deref(), Some("b"));
    }

    #[test]
    fn closing_before_active_keeps_same_document() {
        let mut t = tabs(&["a", "b", "c"]);
        t.close(0);
        assert_eq!(active_title(&t).as_deref(), Some("c"));
        assert_eq!(t.active_index(), Some(1));
    }

    #[test]
    fn closing_every_tab_clears_active() {
        let mut t = tabs(&["a"]);
        assert!(t.close(0));
        assert!(t.active().is_none());
        assert!(!t.close(0));
    }

    #[test]
    fn documents_are_independent() {
        let mut t = tabs(&["a", "b"]);
        t.select(0);
        t.active_mut().unwrap().notifier_mut().insert(0, "x\ny\nz");
        assert_eq!(t.get(0).unwrap().gutter().glyphs().len(), 3);
        assert_eq!(t.get(1).unwrap().gutter().glyphs().len(), 1);
        assert_eq!(t.get(1).unwrap().text(), "");
    }

    #[test]
    fn labels_mark_dirty_documents() {
        let mut t = tabs(&["clean.py", "dirty.py"]);
        t.active_mut().unwrap().notifier_mut().insert(0, "x");
        assert_eq!(t.labels(), vec!["clean.py", "*dirty.py"]);
    }
}
