// ── Dual light/dark colour theme ───────────────────────────────────────────────
//
// The active theme lives in `EditorConfig` and is passed to whoever paints;
// nothing reads it from global state.  Changing it forces a keyword re-tag of
// every document (see `App::toggle_theme`).
//
// Colour conventions:
//   • Palette entries are written as 0xRR, 0xGG, 0xBB.
//   • The `rgb!` macro converts to the BGR COLORREF layout GDI expects.

use serde::{Deserialize, Serialize};

use crate::buffer::Tag;

// ── Colour macro ──────────────────────────────────────────────────────────────

/// Convert (R, G, B) → BGR COLORREF.
macro_rules! rgb {
    ($r:expr, $g:expr, $b:expr) => {
        (($b as u32) << 16) | (($g as u32) << 8) | ($r as u32)
    };
}

// ── Theme ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub(crate) fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub(crate) fn is_dark(self) -> bool {
        self == Self::Dark
    }

    pub(crate) fn palette(self) -> &'static Palette {
        match self {
            Self::Light => &LIGHT,
            Self::Dark => &DARK,
        }
    }

    /// Colours for text carrying `tag`.
    pub(crate) fn tag_style(self, tag: Tag) -> TagStyle {
        let p = self.palette();
        match tag {
            Tag::Keyword => TagStyle {
                fg: p.keyword,
                bg: None,
            },
            Tag::Found => TagStyle {
                fg: p.found_fg,
                bg: Some(p.found_bg),
            },
        }
    }
}

// ── Colour palette ────────────────────────────────────────────────────────────

pub(crate) struct Palette {
    pub(crate) bg: u32,
    pub(crate) fg: u32,
    pub(crate) caret: u32,
    pub(crate) gutter_bg: u32,
    pub(crate) gutter_fg: u32,
    pub(crate) keyword: u32,
    pub(crate) found_bg: u32,
    pub(crate) found_fg: u32,
}

/// Foreground, and optional background, for a tagged run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TagStyle {
    pub(crate) fg: u32,
    pub(crate) bg: Option<u32>,
}

const LIGHT: Palette = Palette {
    bg: rgb!(0xFF, 0xFF, 0xFF),
    fg: rgb!(0x00, 0x00, 0x00),
    caret: rgb!(0x00, 0x00, 0x00),
    gutter_bg: rgb!(0xF0, 0xF0, 0xF0),
    gutter_fg: rgb!(0x80, 0x80, 0x80),
    keyword: rgb!(0x00, 0x00, 0xFF),
    found_bg: rgb!(0xFF, 0xFF, 0x00),
    found_fg: rgb!(0x00, 0x00, 0x00),
};

/// VS Code Dark+-inspired keyword colour on a near-black background.
const DARK: Palette = Palette {
    bg: rgb!(0x21, 0x21, 0x21),
    fg: rgb!(0xFF, 0xFF, 0xFF),
    caret: rgb!(0xFF, 0xFF, 0xFF),
    gutter_bg: rgb!(0x2A, 0x2A, 0x2A),
    gutter_fg: rgb!(0x85, 0x85, 0x85),
    keyword: rgb!(0x56, 0x9C, 0xD6),
    found_bg: rgb!(0xFF, 0xFF, 0x00),
    found_fg: rgb!(0x00, 0x00, 0x00),
};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_is_bgr_colorref() {
        assert_eq!(rgb!(0x56, 0x9C, 0xD6), 0x00D6_9C56);
    }

    #[test]
    fn keyword_colour_follows_theme() {
        assert_eq!(Theme::Light.tag_style(Tag::Keyword).fg, rgb!(0, 0, 0xFF));
        assert_eq!(Theme::Dark.tag_style(Tag::Keyword).fg, rgb!(0x56, 0x9C, 0xD6));
        assert_eq!(Theme::Light.tag_style(Tag::Keyword).bg, None);
    }

    #[test]
    fn found_is_black_on_yellow_in_both_themes() {
        for theme in [Theme::Light, Theme::Dark] {
            let style = theme.tag_style(Tag::Found);
            assert_eq!(style.fg, rgb!(0, 0, 0));
            assert_eq!(style.bg, Some(rgb!(0xFF, 0xFF, 0)));
        }
    }

    #[test]
    fn toggle_flips() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert!(Theme::Dark.is_dark());
        assert!(!Theme::default().is_dark());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        let t: Theme = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(t, Theme::Light);
    }
}
