// ── Common dialogs ─────────────────────────────────────────────────────────────
//
// Thin wrappers around the Win32 common-dialog APIs.  Open and save return
// `Some(path)` on user confirmation and `None` on cancel or error.  The
// find/replace dialog is modeless; its owner receives the registered
// `commdlg_FindReplace` message and decodes it with `find_event`.
//
// This is inside `platform::win32` so `unsafe` is permitted per crate policy.

#![allow(unsafe_code)]

use std::path::PathBuf;

use windows::{
    core::{w, PCWSTR, PWSTR},
    Win32::{
        Foundation::{HWND, LPARAM},
        UI::{
            Controls::Dialogs::{
                GetOpenFileNameW, GetSaveFileNameW, ReplaceTextW, FINDREPLACEW, FR_DIALOGTERM,
                FR_FINDNEXT, FR_HIDEMATCHCASE, FR_HIDEUPDOWN, FR_HIDEWHOLEWORD, FR_REPLACE,
                FR_REPLACEALL, OFN_FILEMUSTEXIST, OFN_HIDEREADONLY, OFN_OVERWRITEPROMPT,
                OPENFILENAMEW, OFN_PATHMUSTEXIST,
            },
            WindowsAndMessaging::{MessageBoxW, RegisterWindowMessageW, MB_ICONERROR, MB_OK},
        },
    },
};

use super::last_error;
use crate::error::Result;

// ── Buffer size ───────────────────────────────────────────────────────────────

/// Maximum path length in `WCHAR`s, including the null terminator.
/// `MAX_PATH` (260) is too short for modern Windows paths; use 32 768 which
/// is the documented maximum for `\\?\` extended paths.
const PATH_BUF_LEN: usize = 32_768;

/// Find/replace edit-field capacity in `WCHAR`s.
const QUERY_BUF_LEN: usize = 256;

const FILTER: &str = "Python Files (*.py)\0*.py\0Text Files (*.txt)\0*.txt\0All Files (*.*)\0*.*\0\0";

// ── Open dialog ───────────────────────────────────────────────────────────────

/// Show the standard "Open File" dialog.
///
/// Returns the chosen path, or `None` if the user cancelled.
pub(crate) fn show_open_dialog(hwnd_owner: HWND) -> Option<PathBuf> {
    let mut buf = vec![0u16; PATH_BUF_LEN];
    let filter: Vec<u16> = FILTER.encode_utf16().collect();

    let mut ofn = OPENFILENAMEW {
        lStructSize: std::mem::size_of::<OPENFILENAMEW>() as u32,
        hwndOwner: hwnd_owner,
        lpstrFilter: PCWSTR(filter.as_ptr()),
        lpstrFile: PWSTR(buf.as_mut_ptr()),
        nMaxFile: PATH_BUF_LEN as u32,
        Flags: OFN_FILEMUSTEXIST | OFN_PATHMUSTEXIST | OFN_HIDEREADONLY,
        ..Default::default()
    };

    // SAFETY: `ofn` is fully initialised; `buf` and `filter` outlive this
    // call.  GetOpenFileNameW reads and writes only within the buffers we
    // provided.  Called on the UI thread (required for modal dialogs).
    let ok = unsafe { GetOpenFileNameW(&mut ofn) };
    ok.as_bool().then(|| path_from_buf(&buf))
}

// ── Save dialog ───────────────────────────────────────────────────────────────

/// Show the standard "Save As" dialog, pre-filled with `default_name`.
///
/// Returns the chosen path, or `None` if cancelled.
pub(crate) fn show_save_dialog(hwnd_owner: HWND, default_name: &str) -> Option<PathBuf> {
    let mut buf: Vec<u16> = default_name
        .encode_utf16()
        .chain(std::iter::repeat(0))
        .take(PATH_BUF_LEN)
        .collect();
    let filter: Vec<u16> = FILTER.encode_utf16().collect();

    let mut ofn = OPENFILENAMEW {
        lStructSize: std::mem::size_of::<OPENFILENAMEW>() as u32,
        hwndOwner: hwnd_owner,
        lpstrFilter: PCWSTR(filter.as_ptr()),
        lpstrFile: PWSTR(buf.as_mut_ptr()),
        nMaxFile: PATH_BUF_LEN as u32,
        Flags: OFN_OVERWRITEPROMPT | OFN_PATHMUSTEXIST,
        ..Default::default()
    };

    // SAFETY: same invariants as show_open_dialog above.
    let ok = unsafe { GetSaveFileNameW(&mut ofn) };
    ok.as_bool().then(|| path_from_buf(&buf))
}

// ── Error box ─────────────────────────────────────────────────────────────────

/// Report a recoverable error to the user.
pub(crate) fn show_error(hwnd_owner: HWND, message: &str) {
    let msg_wide = wide(message);
    // SAFETY: msg_wide is null-terminated and outlives the modal call.
    unsafe {
        let _ = MessageBoxW(
            hwnd_owner,
            PCWSTR(msg_wide.as_ptr()),
            w!("Nexus"),
            MB_OK | MB_ICONERROR,
        );
    }
}

// ── Find & Replace ────────────────────────────────────────────────────────────

/// What the user asked for in the find/replace dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FindEvent {
    Find(String),
    ReplaceAll { query: String, replacement: String },
    Closed,
}

/// A live modeless find/replace dialog.
///
/// The dialog writes into `request` and both text buffers until it is
/// closed, so they are boxed and owned here.
pub(crate) struct FindDialog {
    hwnd: HWND,
    _request: Box<FINDREPLACEW>,
    _find_what: Box<[u16]>,
    _replace_with: Box<[u16]>,
}

impl FindDialog {
    pub(crate) fn hwnd(&self) -> HWND {
        self.hwnd
    }
}

/// Id of the message the dialog sends its owner.
pub(crate) fn find_message_id() -> u32 {
    // SAFETY: the argument is a static null-terminated string.
    unsafe { RegisterWindowMessageW(w!("commdlg_FindReplace")) }
}

/// Open the modeless find/replace dialog pre-filled with `query`.
pub(crate) fn show_find_dialog(hwnd_owner: HWND, query: &str) -> Result<FindDialog> {
    let mut find_what: Box<[u16]> = query
        .encode_utf16()
        .take(QUERY_BUF_LEN - 1)
        .chain(std::iter::repeat(0))
        .take(QUERY_BUF_LEN)
        .collect();
    let mut replace_with: Box<[u16]> = vec![0u16; QUERY_BUF_LEN].into_boxed_slice();

    let mut request = Box::new(FINDREPLACEW {
        lStructSize: std::mem::size_of::<FINDREPLACEW>() as u32,
        hwndOwner: hwnd_owner,
        Flags: FR_HIDEMATCHCASE | FR_HIDEWHOLEWORD | FR_HIDEUPDOWN,
        lpstrFindWhat: PWSTR(find_what.as_mut_ptr()),
        lpstrReplaceWith: PWSTR(replace_with.as_mut_ptr()),
        wFindWhatLen: QUERY_BUF_LEN as u16,
        wReplaceWithLen: QUERY_BUF_LEN as u16,
        ..Default::default()
    });

    // SAFETY: `request` and both buffers are heap allocations owned by the
    // returned `FindDialog`, which the caller keeps until FR_DIALOGTERM.
    let hwnd = unsafe { ReplaceTextW(request.as_mut()) };
    if hwnd == HWND::default() {
        return Err(last_error("ReplaceTextW"));
    }

    Ok(FindDialog {
        hwnd,
        _request: request,
        _find_what: find_what,
        _replace_with: replace_with,
    })
}

/// Decode a `commdlg_FindReplace` message.
///
/// # Safety
///
/// `lparam` must be the LPARAM of that registered message, which points at
/// the live `FINDREPLACEW` owned by a `FindDialog`.
pub(crate) unsafe fn find_event(lparam: LPARAM) -> Option<FindEvent> {
    let request = &*(lparam.0 as *const FINDREPLACEW);
    let flags = request.Flags.0;
    let has = |flag: u32| flags & flag != 0;

    if has(FR_DIALOGTERM.0) {
        return Some(FindEvent::Closed);
    }
    let query = pwstr_to_string(request.lpstrFindWhat);
    if has(FR_REPLACE.0) || has(FR_REPLACEALL.0) {
        let replacement = pwstr_to_string(request.lpstrReplaceWith);
        return Some(FindEvent::ReplaceAll { query, replacement });
    }
    has(FR_FINDNEXT.0).then_some(FindEvent::Find(query))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Null-terminated UTF-16 copy of `s`.
pub(crate) fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Convert a null-terminated UTF-16 buffer to a `PathBuf`.
fn path_from_buf(buf: &[u16]) -> PathBuf {
    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    PathBuf::from(String::from_utf16_lossy(&buf[..len]))
}

/// # Safety
///
/// `p` must be null or point at a null-terminated UTF-16 string.
unsafe fn pwstr_to_string(p: PWSTR) -> String {
    if p.is_null() {
        return String::new();
    }
    p.to_string().unwrap_or_default()
}
