//! Platform-independent key events.
//!
//! The core never sees crossterm types; the TUI translates terminal events
//! into `KeyInput` before handing them over.

/// Logical key identifier. Space is `Char(' ')`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        meta: false,
        shift: false,
        alt: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        meta: false,
        shift: false,
        alt: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        ctrl: false,
        meta: false,
        shift: true,
        alt: false,
    };
}

/// A single keystroke with its modifier flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Unmodified key press.
    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// Ctrl-modified key press.
    pub fn ctrl(key: Key) -> Self {
        Self::new(key, Modifiers::CTRL)
    }

    /// Ctrl on Linux/Windows, Cmd (meta) on macOS. Either counts.
    pub fn has_platform_modifier(&self) -> bool {
        self.modifiers.ctrl || self.modifiers.meta
    }

    /// Space or Enter without the platform modifier.
    pub fn is_activation(&self) -> bool {
        !self.has_platform_modifier() && matches!(self.key, Key::Char(' ') | Key::Enter)
    }

    /// Character this key inserts under default handling, if any.
    pub fn inserted_char(&self) -> Option<char> {
        match self.key {
            Key::Char(c) if !self.has_platform_modifier() && !self.modifiers.alt => Some(c),
            _ => None,
        }
    }
}
