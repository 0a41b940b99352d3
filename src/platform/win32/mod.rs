// ── Win32 platform implementation ─────────────────────────────────────────────
//
// The only module in the codebase where `unsafe` code is permitted.  Every
// `unsafe` block MUST carry a `// SAFETY:` comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// Nothing in this module is `pub` beyond what callers genuinely need; keep the
// unsafe surface as small as possible.

#![allow(unsafe_code)]

use windows::Win32::Foundation::GetLastError;

use crate::error::NexusError;

// ── Sub-modules ───────────────────────────────────────────────────────────────

pub(crate) mod dialogs; // open/save/find-replace dialogs, error boxes
pub(crate) mod window; // main window, WndProc, painting, message loop

pub(crate) mod dpi; // per-monitor DPI v2 helpers

// ── Error helpers ─────────────────────────────────────────────────────────────

/// Capture the current Win32 last-error code and wrap it in a `NexusError`.
///
/// Call immediately after a Win32 function that signals failure; `GetLastError`
/// reads thread-local state that any later API call can overwrite.
pub(crate) fn last_error(function: &'static str) -> NexusError {
    // SAFETY: GetLastError reads thread-local state set by the last Win32 call.
    let code = unsafe { GetLastError() };
    NexusError::Win32 {
        function,
        code: code.0,
    }
}
