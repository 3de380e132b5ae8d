//! Key event types and chord matching.

/// Logical key: the meaning of the key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    ArrowUp,
    ArrowDown,
    Shift,
    Character(char),
    Unidentified,
}

/// Physical key code, independent of layout and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Enter,
    Space,
    Escape,
    ArrowUp,
    ArrowDown,
    ShiftLeft,
    ShiftRight,
    /// `KeyA` .. `KeyZ`, stored uppercase
    Letter(char),
    /// `Digit0` .. `Digit9`
    Digit(u8),
    Unidentified,
}

impl KeyCode {
    /// The logical key an unmodified press of this code produces.
    pub fn default_key(self) -> Key {
        match self {
            KeyCode::Enter => Key::Enter,
            KeyCode::Space => Key::Space,
            KeyCode::Escape => Key::Escape,
            KeyCode::ArrowUp => Key::ArrowUp,
            KeyCode::ArrowDown => Key::ArrowDown,
            KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
            KeyCode::Letter(c) => Key::Character(c.to_ascii_lowercase()),
            KeyCode::Digit(d) => char::from_digit(u32::from(d), 10)
                .map(Key::Character)
                .unwrap_or(Key::Unidentified),
            KeyCode::Unidentified => Key::Unidentified,
        }
    }
}

/// A single keydown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub code: KeyCode,
    /// Shift held while the key went down
    pub shift: bool,
    /// OS-generated auto-repeat from a held key
    pub repeat: bool,
}

impl KeyEvent {
    pub fn new(key: Key, code: KeyCode) -> Self {
        Self {
            key,
            code,
            shift: false,
            repeat: false,
        }
    }

    /// A fresh, unmodified press of `code`.
    pub fn press(code: KeyCode) -> Self {
        Self::new(code.default_key(), code)
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        if let Key::Character(c) = self.key {
            self.key = Key::Character(c.to_ascii_uppercase());
        }
        self
    }

    pub fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }

    /// Pressing Shift itself reports `shift = true` as well.
    pub fn is_shift_key(&self) -> bool {
        matches!(self.code, KeyCode::ShiftLeft | KeyCode::ShiftRight)
    }
}

/// A modifier + physical key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    pub shift: bool,
    pub code: KeyCode,
}

/// The search toggle shortcut.
pub const SHIFT_SPACE: Chord = Chord {
    shift: true,
    code: KeyCode::Space,
};

impl Chord {
    pub fn matches(&self, event: &KeyEvent) -> bool {
        event.shift == self.shift && event.code == self.code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_space_matches_by_code() {
        let event = KeyEvent::press(KeyCode::Space).with_shift();
        assert!(SHIFT_SPACE.matches(&event));

        // Layouts where Space yields another character still match
        let odd = KeyEvent {
            key: Key::Character('\u{3000}'),
            code: KeyCode::Space,
            shift: true,
            repeat: false,
        };
        assert!(SHIFT_SPACE.matches(&odd));
    }

    #[test]
    fn test_shift_space_rejects_partial_chords() {
        assert!(!SHIFT_SPACE.matches(&KeyEvent::press(KeyCode::Space)));
        assert!(!SHIFT_SPACE.matches(&KeyEvent::press(KeyCode::ShiftLeft).with_shift()));
        assert!(!SHIFT_SPACE.matches(&KeyEvent::press(KeyCode::Letter('A')).with_shift()));
    }

    #[test]
    fn test_default_keys() {
        assert_eq!(KeyCode::Letter('A').default_key(), Key::Character('a'));
        assert_eq!(KeyCode::Digit(7).default_key(), Key::Character('7'));
        assert_eq!(KeyCode::ShiftRight.default_key(), Key::Shift);
        assert_eq!(
            KeyEvent::press(KeyCode::Letter('A')).with_shift().key,
            Key::Character('A')
        );
    }
}
