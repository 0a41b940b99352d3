// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except `platform::win32` (Win32 FFI).
// Each unsafe block there MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]
// Release builds run as a GUI application (no console window).
// Debug builds keep the console so that log output on stderr is visible.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
// Off Windows only the portable core is built, for its tests.
#![cfg_attr(not(windows), allow(dead_code))]

mod app;
mod buffer;
mod config;
mod editor;
mod error;
mod platform;
mod search;
mod theme;
mod ui;

use tracing_subscriber::EnvFilter;

use crate::config::EditorConfig;

fn main() {
    // Set RUST_LOG=nexus=trace to see per-keystroke work.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = EditorConfig::load();
    tracing::info!(theme = ?config.theme, "starting nexus");

    #[cfg(windows)]
    if let Err(e) = platform::win32::window::run(config) {
        tracing::error!("{e}");
        // Show a modal error dialog: stderr is invisible in release builds.
        platform::win32::window::show_error_dialog(&e.to_string());
        std::process::exit(1);
    }

    #[cfg(not(windows))]
    {
        let _ = config;
        tracing::error!("the nexus desktop front end requires Windows");
        std::process::exit(1);
    }
}
