// ── Search highlighting ───────────────────────────────────────────────────────
//
// Case-insensitive literal search over the whole document.  Matches are
// tagged `found`; earlier `found` tags are kept, so repeated searches
// accumulate until `clear` is called.

use regex::{Regex, RegexBuilder};

use crate::{
    buffer::{char_ranges, Buffer, CharRange, Tag},
    editor::ChangeNotifier,
    error::Result,
};

/// Compile `query` as a case-insensitive literal.
fn matcher(query: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()?)
}

/// Every non-overlapping, case-insensitive occurrence of `query` in `text`,
/// left to right.  An empty query matches nothing.
pub(crate) fn find_all(text: &str, query: &str) -> Result<Vec<CharRange>> {
    if query.is_empty() {
        return Ok(Vec::new());
    }
    let re = matcher(query)?;
    Ok(char_ranges(text, re.find_iter(text)))
}

/// Tag every occurrence of `query` with `found` and return the matches.
pub(crate) fn highlight<B: Buffer>(
    notifier: &mut ChangeNotifier<B>,
    query: &str,
) -> Result<Vec<CharRange>> {
    let matches = find_all(&notifier.buffer().text(), query)?;
    for range in &matches {
        notifier.tag_add(Tag::Found, range.clone());
    }
    tracing::debug!(query, matches = matches.len(), "search highlighted");
    Ok(matches)
}

/// Remove every `found` tag.
pub(crate) fn clear<B: Buffer>(notifier: &mut ChangeNotifier<B>) {
    let len = notifier.buffer().len_chars();
    notifier.tag_remove(Tag::Found, 0..len);
    tracing::debug!(tag = Tag::Found.name(), "highlights cleared");
}

/// Replace every occurrence of `query` with `replacement`.
///
/// Each replacement is one notified `replace` call.  Returns the count.
pub(crate) fn replace_all<B: Buffer>(
    notifier: &mut ChangeNotifier<B>,
    query: &str,
    replacement: &str,
) -> Result<usize> {
    let matches = find_all(&notifier.buffer().text(), query)?;
    // Back to front so earlier ranges stay valid.
    for range in matches.iter().rev() {
        notifier.replace(range.clone(), replacement);
    }
    tracing::debug!(query, count = matches.len(), "replaced all");
    Ok(matches.len())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
