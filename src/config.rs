// ── Editor configuration ──────────────────────────────────────────────────────
//
// Read once at startup from an optional JSON file; never written back.
// Every field has a default, so a partial file is fine.

use std::{fs, io, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::{NexusError, Result},
    theme::Theme,
};

/// Environment variable naming an explicit config file.
pub(crate) const CONFIG_ENV: &str = "NEXUS_CONFIG";

/// Editor-wide settings threaded to every component that renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct EditorConfig {
    pub(crate) theme: Theme,
    /// Spaces added after a line ending in `:`.
    pub(crate) indent_width: usize,
    pub(crate) word_wrap: bool,
    pub(crate) font_face: String,
    /// Point size.
    pub(crate) font_size: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            indent_width: 4,
            word_wrap: false,
            font_face: "Consolas".to_owned(),
            font_size: 13,
        }
    }
}

impl EditorConfig {
    /// Parse `bytes` read from `path`.
    pub(crate) fn parse(path: &Path, bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|source| NexusError::Config {
            path: path.to_owned(),
            source,
        })
    }

    /// Load from `path`.  A missing file yields the defaults.
    pub(crate) fn load_from(path: &Path) -> Result<Self> {
        match fs::read(path) {
            Ok(bytes) => Self::parse(path, &bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(NexusError::FileRead {
                path: path.to_owned(),
                source,
            }),
        }
    }

    /// Load from `config_path()`, falling back to the defaults on any
    /// problem.  Problems are logged, not reported.
    pub(crate) fn load() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "configuration loaded");
                config
            }
            Err(e) => {
                tracing::warn!("{e}; using default configuration");
                Self::default()
            }
        }
    }
}

// ── Path ──────────────────────────────────────────────────────────────────────

/// Where the config file lives.
///
/// `NEXUS_CONFIG` wins; otherwise `%APPDATA%\Nexus\config.json` on Windows
/// and `$XDG_CONFIG_HOME/nexus/config.json` (or `~/.config/...`) elsewhere.
pub(crate) fn config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(explicit));
    }
    let mut p = if cfg!(windows) {
        let mut p = PathBuf::from(std::env::var_os("APPDATA")?);
        p.push("Nexus");
        p
    } else {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        base.join("nexus")
    };
    p.push("config.json");
    Some(p)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = EditorConfig::default();
        assert_eq!(c.theme, Theme::Light);
        assert_eq!(c.indent_width, 4);
        assert!(!c.word_wrap);
        assert_eq!(c.font_face, "Consolas");
        assert_eq!(c.font_size, 13);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let c = EditorConfig::parse(Path::new("c.json"), br#"{"theme":"dark"}"#).unwrap();
        assert_eq!(c.theme, Theme::Dark);
        assert_eq!(c.indent_width, 4);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let err = EditorConfig::parse(Path::new("c.json"), b"{theme").unwrap_err();
        assert!(matches!(err, NexusError::Config { .. }));
        assert!(err.to_string().contains("c.json"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let c = EditorConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(c, EditorConfig::default());
    }

    #[test]
    fn load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"indent_width":2,"word_wrap":true}"#).unwrap();
        let c = EditorConfig::load_from(&path).unwrap();
        assert_eq!(c.indent_width, 2);
        assert!(c.word_wrap);
    }

    #[test]
    fn roundtrip() {
        let c = EditorConfig {
            theme: Theme::Dark,
            indent_width: 8,
            word_wrap: true,
            font_face: "Cascadia Mono".to_owned(),
            font_size: 11,
        };
        let json = serde_json::to_string(&c).unwrap();
        let c2: EditorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c, c2);
    }
}
