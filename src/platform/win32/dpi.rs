#![allow(unsafe_code)]

use windows::Win32::{
    Foundation::HWND,
    UI::HiDpi::{
        GetDpiForSystem, GetDpiForWindow, SetProcessDpiAwarenessContext,
        DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
    },
};

pub(crate) const BASE_DPI: u32 = 96;

/// Typographic points per inch.
const POINTS_PER_INCH: i32 = 72;

/// Scale a pixel value defined at 96 DPI to `dpi`.
pub(crate) fn scale(px: i32, dpi: u32) -> i32 {
    px * dpi as i32 / BASE_DPI as i32
}

/// LOGFONT height for a `points`-sized font at `dpi` (negative selects by
/// character height rather than cell height).
pub(crate) fn font_height(points: u32, dpi: u32) -> i32 {
    -(points as i32 * dpi as i32 / POINTS_PER_INCH)
}

/// Opt into Per-Monitor v2 DPI awareness.
/// MUST be called before any window is created on the calling thread.
pub(crate) fn init() {
    // SAFETY: Must precede all window creation; single call at process start.
    unsafe {
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }
}

/// The DPI for `hwnd`, falling back to the system DPI.
pub(crate) fn for_window(hwnd: HWND) -> u32 {
    // SAFETY: hwnd is a valid window handle provided by the caller.
    match unsafe { GetDpiForWindow(hwnd) } {
        0 => system(),
        v => v,
    }
}

/// Primary-monitor DPI, or 96 if unavailable.
fn system() -> u32 {
    // SAFETY: GetDpiForSystem takes no parameters and always succeeds on Win10+.
    match unsafe { GetDpiForSystem() } {
        0 => BASE_DPI,
        v => v,
    }
}
