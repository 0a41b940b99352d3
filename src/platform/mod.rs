// ── Platform abstraction layer ────────────────────────────────────────────────
//
// The editing core never calls the OS.  The desktop front end lives here and
// is compiled on Windows only; all Win32 FFI is confined to the `win32`
// sub-module and never leaks outward.

#[cfg(windows)]
pub(crate) mod win32;
