// ── Keyword tagging ───────────────────────────────────────────────────────────
//
// Naive, whole-document highlighting: clear every `keyword` tag, rescan the
// full text, tag every whole-word match.  Runs on each key release, so the
// cost is O(document length) per keystroke.

use regex::Regex;

use crate::{
    buffer::{char_ranges, Buffer, Tag},
    editor::ChangeNotifier,
    error::Result,
};

/// The fixed keyword set shared by every document.
pub(crate) const KEYWORDS: [&str; 14] = [
    "def", "class", "if", "else", "elif", "return", "import", "from", "while", "for", "in",
    "print", "with", "as",
];

/// Compiled matcher for a keyword set.
#[derive(Debug, Clone)]
pub(crate) struct KeywordTagger {
    pattern: Regex,
}

impl KeywordTagger {
    /// Build a case-sensitive, word-boundary matcher for `words`.
    pub(crate) fn new(words: &[&str]) -> Result<Self> {
        let alternation = words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"\b(?:{alternation})\b"))?;
        Ok(Self { pattern })
    }

    /// Matcher for `KEYWORDS`.
    pub(crate) fn standard() -> Result<Self> {
        Self::new(&KEYWORDS)
    }

    /// Replace every `keyword` tag in the buffer with the current matches.
    ///
    /// Returns the number of tagged ranges.
    pub(crate) fn retag<B: Buffer>(&self, notifier: &mut ChangeNotifier<B>) -> usize {
        let len = notifier.buffer().len_chars();
        notifier.tag_remove(Tag::Keyword, 0..len);
        let text = notifier.buffer().text();
        let ranges = char_ranges(&text, self.pattern.find_iter(&text));
        let count = ranges.len();
        for range in ranges {
            notifier.tag_add(Tag::Keyword, range);
        }
        tracing::trace!(tag = Tag::Keyword.name(), count, "retagged");
        count
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::buffer::{CharRange, TextBuffer};

    fn tagged(text: &str) -> Vec<CharRange> {
        let mut n = ChangeNotifier::new(TextBuffer::from(text));
        KeywordTagger::standard().unwrap().retag(&mut n);
        n.buffer().tag_ranges(Tag::Keyword).to_vec()
    }

    #[test]
    fn tags_only_keywords() {
        // def@0..3, return@15..21; foo and bar are not keywords.
        assert_eq!(tagged("def foo():\n    return bar"), vec![0..3, 15..21]);
    }

    #[test]
    fn respects_word_boundaries() {
        assert!(tagged("define classy ifx _if if_ print_").is_empty());
        assert_eq!(tagged("x.if(y)"), vec![2..4]);
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(tagged("Def CLASS Return").is_empty());
    }

    #[test]
    fn adjacent_keywords_stay_separate_ranges() {
        assert_eq!(tagged("for x in y"), vec![0..3, 6..8]);
    }

    #[test]
    fn stale_tags_are_cleared() {
        let mut n = ChangeNotifier::new(TextBuffer::from("if x"));
        let tagger = KeywordTagger::standard().unwrap();
        tagger.retag(&mut n);
        n.replace(0..2, "xx");
        n.tag_add(Tag::Keyword, 3..4);
        assert_eq!(tagger.retag(&mut n), 0);
        assert!(n.buffer().tag_ranges(Tag::Keyword).is_empty());
    }

    #[test]
    fn found_tags_are_untouched() {
        let mut n = ChangeNotifier::new(TextBuffer::from("if x"));
        n.tag_add(Tag::Found, 3..4);
        KeywordTagger::standard().unwrap().retag(&mut n);
        assert_eq!(n.buffer().tag_ranges(Tag::Found), &[3..4]);
    }

    #[test]
    fn custom_words_are_escaped() {
        let tagger = KeywordTagger::new(&["c++", "fn"]).unwrap();
        let mut n = ChangeNotifier::new(TextBuffer::from("fn c++ cxx"));
        assert_eq!(tagger.retag(&mut n), 1);
        assert_eq!(n.buffer().tag_ranges(Tag::Keyword), &[0..2]);
    }

    proptest! {
        #[test]
        fn retag_is_idempotent(text in "[a-z :\n()]{0,80}") {
            let tagger = KeywordTagger::standard().unwrap();
            let mut n = ChangeNotifier::new(TextBuffer::from(text.as_str()));
            tagger.retag(&mut n);
            let first = n.buffer().tag_ranges(Tag::Keyword).to_vec();
            tagger.retag(&mut n);
            prop_assert_eq!(first, n.buffer().tag_ranges(Tag::Keyword).to_vec());
        }
    }
}
