// ── Change notification ───────────────────────────────────────────────────────
//
// Every mutating or navigational buffer call goes through `ChangeNotifier`,
// which performs the call and then tells each subscriber exactly once.
// Subscribers only see `&B`, so a handler cannot mutate the buffer it is
// being notified about.

use crate::buffer::{Buffer, CharRange, Tag, Viewport};

/// Which kind of operation produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChangeKind {
    Insert,
    Replace,
    Delete,
    /// The cursor was moved.
    Cursor,
    /// The view was scrolled or resized.
    View,
}

impl ChangeKind {
    /// `true` for kinds that change the text itself.
    pub(crate) fn is_edit(self) -> bool {
        matches!(self, Self::Insert | Self::Replace | Self::Delete)
    }
}

/// Handle returned by `subscribe`, used to detach the handler again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SubscriptionId(u64);

type Handler<B> = Box<dyn FnMut(ChangeKind, &B)>;

/// A buffer plus the handlers that observe it.
pub(crate) struct ChangeNotifier<B> {
    buffer: B,
    subscribers: Vec<(SubscriptionId, Handler<B>)>,
    next_id: u64,
}

impl<B: Buffer> ChangeNotifier<B> {
    pub(crate) fn new(buffer: B) -> Self {
        Self {
            buffer,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// Register `handler`; it runs after every wrapped operation, in
    /// subscription order.
    pub(crate) fn subscribe(
        &mut self,
        handler: impl FnMut(ChangeKind, &B) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(handler)));
        id
    }

    /// Detach a handler.  Returns `false` if `id` was not subscribed.
    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Read-only access for queries.  Queries never notify.
    pub(crate) fn buffer(&self) -> &B {
        &self.buffer
    }

    fn emit(&mut self, kind: ChangeKind) {
        tracing::trace!(?kind, subscribers = self.subscribers.len(), "buffer changed");
        let buffer = &self.buffer;
        for (_, handler) in &mut self.subscribers {
            handler(kind, buffer);
        }
    }

    // ── Wrapped operations ────────────────────────────────────────────────────

    pub(crate) fn insert(&mut self, index: usize, text: &str) {
        self.buffer.insert(index, text);
        self.emit(ChangeKind::Insert);
    }

    pub(crate) fn delete(&mut self, range: CharRange) -> String {
        let removed = self.buffer.delete(range);
        self.emit(ChangeKind::Delete);
        removed
    }

    pub(crate) fn replace(&mut self, range: CharRange, text: &str) {
        self.buffer.replace(range, text);
        self.emit(ChangeKind::Replace);
    }

    pub(crate) fn set_cursor(&mut self, index: usize) {
        self.buffer.set_cursor(index);
        self.emit(ChangeKind::Cursor);
    }

    pub(crate) fn scroll_to_line(&mut self, line: usize) {
        self.buffer.scroll_to_line(line);
        self.emit(ChangeKind::View);
    }

    pub(crate) fn set_viewport(&mut self, viewport: Viewport) {
        self.buffer.set_viewport(viewport);
        self.emit(ChangeKind::View);
    }

    // ── Tags (not notified) ───────────────────────────────────────────────────

    pub(crate) fn tag_add(&mut self, tag: Tag, range: CharRange) {
        self.buffer.tag_add(tag, range);
    }

    pub(crate) fn tag_remove(&mut self, tag: Tag, range: CharRange) {
        self.buffer.tag_remove(tag, range);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
