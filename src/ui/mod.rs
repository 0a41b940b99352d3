// ── UI state ──────────────────────────────────────────────────────────────────
//
// Platform-independent state behind the window chrome: the tab manager and
// the command/key surface.  The Win32 layer renders and routes; it owns none
// of this.

pub(crate) mod commands;
pub(crate) mod layout;
pub(crate) mod tabs;
