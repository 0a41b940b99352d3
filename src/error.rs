// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in Nexus return `error::Result<T>`.  No panics
// in production paths; errors surface as user-facing message boxes (see
// `platform::win32::dialogs::show_error`) and leave editor state unchanged.

use std::path::PathBuf;

use thiserror::Error;

/// Every error that Nexus can produce.
#[derive(Debug, Error)]
pub(crate) enum NexusError {
    /// A file could not be read into a new document (missing, permission
    /// denied, or not valid UTF-8).
    #[error("cannot open {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The active document could not be written to disk.
    #[error("cannot save {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file exists but is not valid JSON for `EditorConfig`.
    #[error("invalid configuration in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A search or keyword pattern could not be compiled.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A Win32 API call returned a failure code.
    #[cfg(windows)]
    #[error("{function} failed (error {code:#010x})")]
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },
}

// Convert a windows-crate error (HRESULT) directly into a NexusError so that
// `?` can be used on `windows::core::Result<T>` throughout the platform module.
#[cfg(windows)]
impl From<windows::core::Error> for NexusError {
    fn from(e: windows::core::Error) -> Self {
        // HRESULT.0 is i32; reinterpret bits as u32 for display purposes.
        Self::Win32 {
            function: "windows",
            code: e.code().0 as u32,
        }
    }
}

/// Convenience alias used throughout the crate.
pub(crate) type Result<T> = std::result::Result<T, NexusError>;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::error::Error as _;
    use std::io;

    use super::*;

    #[test]
    fn file_read_names_the_path() {
        let err = NexusError::FileRead {
            path: PathBuf::from("notes.txt"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("cannot open notes.txt"), "{msg}");
        assert!(err.source().is_some());
    }

    #[test]
    fn file_write_keeps_io_source() {
        let err = NexusError::FileWrite {
            path: PathBuf::from("out.py"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let source = err.source().expect("io source");
        assert_eq!(source.to_string(), "denied");
    }

    #[test]
    fn regex_error_converts() {
        let err: NexusError = regex::Regex::new("(").unwrap_err().into();
        assert!(matches!(err, NexusError::Pattern(_)));
    }
}
