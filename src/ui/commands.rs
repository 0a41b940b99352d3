// ── Commands & key bindings ───────────────────────────────────────────────────
//
// The menu and keyboard surface as plain data.  The platform layer builds
// its menu from `Command::ALL` and routes shortcuts through
// `Command::for_shortcut`; nothing here touches Win32.

/// A user-invokable editor action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Command {
    NewTab,
    Open,
    Save,
    CloseTab,
    Exit,
    Find,
    ClearHighlights,
    ToggleDarkMode,
}

/// Which top-level menu a command lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Menu {
    File,
    Edit,
}

/// A key that, pressed with or without Ctrl, triggers a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShortcutKey {
    /// An upper-case ASCII letter.
    Letter(char),
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Shortcut {
    pub(crate) ctrl: bool,
    pub(crate) key: ShortcutKey,
}

impl Command {
    /// Menu order.
    pub(crate) const ALL: [Command; 8] = [
        Command::NewTab,
        Command::Open,
        Command::Save,
        Command::CloseTab,
        Command::Exit,
        Command::Find,
        Command::ClearHighlights,
        Command::ToggleDarkMode,
    ];

    pub(crate) fn menu(self) -> Menu {
        match self {
            Self::NewTab | Self::Open | Self::Save | Self::CloseTab | Self::Exit => Menu::File,
            Self::Find | Self::ClearHighlights | Self::ToggleDarkMode => Menu::Edit,
        }
    }

    /// Menu item text, with `&` mnemonics and a tab-separated shortcut hint.
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::NewTab => "&New Tab\tCtrl+N",
            Self::Open => "&Open…",
            Self::Save => "&Save\tCtrl+S",
            Self::CloseTab => "&Close Tab\tCtrl+W",
            Self::Exit => "E&xit",
            Self::Find => "&Find && Replace…\tCtrl+F",
            Self::ClearHighlights => "&Clear Highlights\tEsc",
            Self::ToggleDarkMode => "Toggle &Dark Mode",
        }
    }

    /// A separator is drawn above these items.
    pub(crate) fn separated(self) -> bool {
        matches!(self, Self::Exit)
    }

    pub(crate) fn shortcut(self) -> Option<Shortcut> {
        let ctrl = |c| Some(Shortcut { ctrl: true, key: ShortcutKey::Letter(c) });
        match self {
            Self::NewTab => ctrl('N'),
            Self::Save => ctrl('S'),
            Self::CloseTab => ctrl('W'),
            Self::Find => ctrl('F'),
            Self::ClearHighlights => Some(Shortcut { ctrl: false, key: ShortcutKey::Escape }),
            Self::Open | Self::Exit | Self::ToggleDarkMode => None,
        }
    }

    /// The command bound to `shortcut`, if any.
    pub(crate) fn for_shortcut(shortcut: Shortcut) -> Option<Command> {
        Self::ALL.into_iter().find(|c| c.shortcut() == Some(shortcut))
    }

    /// Stable menu identifier, offset from `base`.
    pub(crate) fn id(self, base: usize) -> usize {
        base + Self::ALL.iter().position(|&c| c == self).unwrap_or(0)
    }

    /// Inverse of `id`.
    pub(crate) fn from_id(id: usize, base: usize) -> Option<Command> {
        id.checked_sub(base).and_then(|i| Self::ALL.get(i).copied())
    }
}

/// Navigation and deletion keys handled by the editing area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditKey {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Backspace,
    Delete,
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl(c: char) -> Shortcut {
        Shortcut { ctrl: true, key: ShortcutKey::Letter(c) }
    }

    #[test]
    fn required_shortcuts() {
        assert_eq!(Command::for_shortcut(ctrl('N')), Some(Command::NewTab));
        assert_eq!(Command::for_shortcut(ctrl('F')), Some(Command::Find));
        assert_eq!(Command::for_shortcut(ctrl('S')), Some(Command::Save));
        assert_eq!(
            Command::for_shortcut(Shortcut { ctrl: false, key: ShortcutKey::Escape }),
            Some(Command::ClearHighlights)
        );
    }

    #[test]
    fn unbound_keys_map_to_nothing() {
        assert_eq!(Command::for_shortcut(ctrl('Q')), None);
        assert_eq!(
            Command::for_shortcut(Shortcut { ctrl: false, key: ShortcutKey::Letter('N') }),
            None
        );
    }

    #[test]
    fn shortcuts_are_unique() {
        let bound: Vec<_> = Command::ALL.iter().filter_map(|c| c.shortcut()).collect();
        for (i, a) in bound.iter().enumerate() {
            assert!(!bound[i + 1..].contains(a), "{a:?} bound twice");
        }
    }

    #[test]
    fn ids_roundtrip() {
        for c in Command::ALL {
            assert_eq!(Command::from_id(c.id(1000), 1000), Some(c));
        }
        assert_eq!(Command::from_id(999, 1000), None);
        assert_eq!(Command::from_id(1000 + Command::ALL.len(), 1000), None);
    }

    #[test]
    fn menus() {
        assert_eq!(Command::Open.menu(), Menu::File);
        assert_eq!(Command::ToggleDarkMode.menu(), Menu::Edit);
        assert!(Command::label(Command::Find).contains("Ctrl+F"));
    }
}
