//! Input event types and key binding matching.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Simplified key representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    /// Anything we don't bind.
    Other,
}

impl From<KeyCode> for Key {
    fn from(code: KeyCode) -> Self {
        match code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::F(n) => Key::F(n),
            _ => Key::Other,
        }
    }
}

/// Key modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl From<KeyModifiers> for Modifiers {
    fn from(mods: KeyModifiers) -> Self {
        Self {
            ctrl: mods.contains(KeyModifiers::CONTROL),
            alt: mods.contains(KeyModifiers::ALT),
            shift: mods.contains(KeyModifiers::SHIFT),
        }
    }
}

/// A processed input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl From<KeyEvent> for InputEvent {
    fn from(event: KeyEvent) -> Self {
        Self {
            key: Key::from(event.code),
            modifiers: Modifiers::from(event.modifiers),
        }
    }
}

impl InputEvent {
    /// Create a new input event.
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// A plain key press without modifiers.
    pub fn key(key: Key) -> Self {
        Self::new(key, Modifiers::default())
    }

    /// The character typed, if this is text input (no Ctrl/Alt).
    pub fn text(&self) -> Option<char> {
        match self.key {
            Key::Char(c) if !self.modifiers.ctrl && !self.modifiers.alt => Some(c),
            _ => None,
        }
    }

    /// Check if Ctrl is held.
    pub fn ctrl(&self) -> bool {
        self.modifiers.ctrl
    }

    /// Check if this matches a key binding string (e.g., "Ctrl+q", "Enter", "?").
    ///
    /// Shift is implied by the character itself for printable keys, so `?`
    /// matches whether or not the terminal reports Shift.
    pub fn matches(&self, binding: &str) -> bool {
        let mut expected = Modifiers::default();
        let mut expected_key = "";

        for part in binding.split('+') {
            match part.to_lowercase().as_str() {
                "ctrl" => expected.ctrl = true,
                "alt" => expected.alt = true,
                "shift" => expected.shift = true,
                // A literal '+' binding splits into empty parts.
                "" => expected_key = "+",
                _ => expected_key = part,
            }
        }

        if self.modifiers.ctrl != expected.ctrl || self.modifiers.alt != expected.alt {
            return false;
        }

        let is_char = matches!(self.key, Key::Char(_));
        if !is_char && self.modifiers.shift != expected.shift {
            return false;
        }

        let lower = expected_key.to_lowercase();
        match lower.as_str() {
            "enter" => self.key == Key::Enter,
            "esc" | "escape" => self.key == Key::Escape,
            "backspace" => self.key == Key::Backspace,
            "delete" | "del" => self.key == Key::Delete,
            "tab" => self.key == Key::Tab,
            "backtab" => self.key == Key::BackTab,
            "up" => self.key == Key::Up,
            "down" => self.key == Key::Down,
            "left" => self.key == Key::Left,
            "right" => self.key == Key::Right,
            "home" => self.key == Key::Home,
            "end" => self.key == Key::End,
            "pageup" => self.key == Key::PageUp,
            "pagedown" => self.key == Key::PageDown,
            "space" => self.key == Key::Char(' '),
            s if s.len() > 1 && s.starts_with('f') => s[1..]
                .parse::<u8>()
                .is_ok_and(|n| self.key == Key::F(n)),
            _ => {
                let mut chars = expected_key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => match self.key {
                        Key::Char(k) if expected.shift => k == c.to_ascii_uppercase(),
                        Key::Char(k) if self.modifiers.ctrl => k.eq_ignore_ascii_case(&c),
                        Key::Char(k) => k == c,
                        _ => false,
                    },
                    _ => false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shifted(c: char) -> InputEvent {
        InputEvent::new(
            Key::Char(c),
            Modifiers {
                shift: true,
                ..Modifiers::default()
            },
        )
    }

    fn ctrl(c: char) -> InputEvent {
        InputEvent::new(
            Key::Char(c),
            Modifiers {
                ctrl: true,
                ..Modifiers::default()
            },
        )
    }

    #[test]
    fn test_plain_characters() {
        assert!(InputEvent::key(Key::Char('q')).matches("q"));
        assert!(!InputEvent::key(Key::Char('Q')).matches("q"));
        assert!(!ctrl('q').matches("q"));
    }

    #[test]
    fn test_shifted_symbols_match() {
        assert!(shifted('?').matches("?"));
        assert!(shifted(':').matches(":"));
        assert!(shifted('G').matches("Shift+g"));
    }

    #[test]
    fn test_modifier_chords() {
        assert!(ctrl('l').matches("Ctrl+l"));
        assert!(ctrl('L').matches("ctrl+l"));
        assert!(!InputEvent::key(Key::Char('l')).matches("Ctrl+l"));
    }

    #[test]
    fn test_named_keys() {
        assert!(InputEvent::key(Key::Enter).matches("Enter"));
        assert!(InputEvent::key(Key::Escape).matches("Esc"));
        assert!(InputEvent::key(Key::F(5)).matches("F5"));
        assert!(InputEvent::key(Key::Char(' ')).matches("Space"));
        assert!(!InputEvent::key(Key::Tab).matches("BackTab"));
    }

    #[test]
    fn test_text_excludes_chords() {
        assert_eq!(InputEvent::key(Key::Char('a')).text(), Some('a'));
        assert_eq!(shifted('A').text(), Some('A'));
        assert_eq!(ctrl('a').text(), None);
        assert_eq!(InputEvent::key(Key::Enter).text(), None);
    }
}
