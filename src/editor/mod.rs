// ── Editing core ──────────────────────────────────────────────────────────────
//
// The UI-sync logic that sits between a `Buffer` and whatever draws it:
// change notification, the line-number gutter and status indicator, keyword
// tagging, and auto-indent.  No platform imports; everything here is driven
// synchronously from the UI thread.

mod gutter;
mod indent;
mod keywords;
mod notifier;

pub(crate) use gutter::{LineGutter, StatusIndicator};
pub(crate) use indent::{auto_indent, KeyOutcome};
pub(crate) use keywords::KeywordTagger;
pub(crate) use notifier::{ChangeNotifier, SubscriptionId};
