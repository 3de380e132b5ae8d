//! Shift+Space visibility toggle for the search container.

use std::time::Instant;

use crate::input::{Chord, KeyDisposition, KeyEvent, KeyListener, SHIFT_SPACE};

/// Interpolation targets for the container's show/hide transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealStyle {
    pub opacity: f32,
    /// Downward offset in logical pixels
    pub offset_y: f32,
    /// Blur radius in logical pixels
    pub blur: f32,
    pub scale: f32,
    /// Whether the container accepts pointer input
    pub interactive: bool,
}

impl RevealStyle {
    pub const SHOWN: RevealStyle = RevealStyle {
        opacity: 1.0,
        offset_y: 0.0,
        blur: 0.0,
        scale: 1.0,
        interactive: true,
    };

    pub const HIDDEN: RevealStyle = RevealStyle {
        opacity: 0.0,
        offset_y: 32.0,
        blur: 8.0,
        scale: 0.95,
        interactive: false,
    };

    pub fn for_visibility(visible: bool) -> Self {
        if visible {
            Self::SHOWN
        } else {
            Self::HIDDEN
        }
    }
}

/// Owns the search container's visibility. Starts hidden.
#[derive(Debug, Clone)]
pub struct SearchVisibility {
    visible: bool,
    chord: Chord,
}

impl Default for SearchVisibility {
    fn default() -> Self {
        Self::new(SHIFT_SPACE)
    }
}

impl SearchVisibility {
    pub fn new(chord: Chord) -> Self {
        Self {
            visible: false,
            chord,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Focus signal passed down to the search input.
    pub fn should_focus(&self) -> bool {
        self.visible
    }

    pub fn style(&self) -> RevealStyle {
        RevealStyle::for_visibility(self.visible)
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        tracing::debug!("Search container {}", if self.visible { "shown" } else { "hidden" });
    }

    pub fn hide(&mut self) {
        if self.visible {
            self.toggle();
        }
    }
}

impl KeyListener for SearchVisibility {
    fn on_key_down(&mut self, event: &KeyEvent, _now: Instant) -> KeyDisposition {
        if self.chord.matches(event) {
            self.toggle();
            KeyDisposition::PreventDefault
        } else {
            KeyDisposition::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;

    fn key(controller: &mut SearchVisibility, event: KeyEvent) -> KeyDisposition {
        controller.on_key_down(&event, Instant::now())
    }

    #[test]
    fn test_starts_hidden() {
        let controller = SearchVisibility::default();
        assert!(!controller.is_visible());
        assert_eq!(controller.style(), RevealStyle::HIDDEN);
    }

    #[test]
    fn test_shift_space_toggles_each_time() {
        let mut controller = SearchVisibility::default();
        let chord = KeyEvent::press(KeyCode::Space).with_shift();

        let mut seen = Vec::new();
        for _ in 0..4 {
            assert_eq!(key(&mut controller, chord), KeyDisposition::PreventDefault);
            seen.push(controller.is_visible());
        }
        assert_eq!(seen, vec![true, false, true, false]);
    }

    #[test]
    fn test_space_or_shift_alone_does_nothing() {
        let mut controller = SearchVisibility::default();

        assert_eq!(
            key(&mut controller, KeyEvent::press(KeyCode::Space)),
            KeyDisposition::Ignored
        );
        assert_eq!(
            key(&mut controller, KeyEvent::press(KeyCode::ShiftLeft).with_shift()),
            KeyDisposition::Ignored
        );
        assert_eq!(
            key(&mut controller, KeyEvent::press(KeyCode::Letter('A')).with_shift()),
            KeyDisposition::Ignored
        );
        assert!(!controller.is_visible());
    }

    #[test]
    fn test_style_and_focus_signal_follow_visibility() {
        let mut controller = SearchVisibility::default();
        controller.toggle();
        assert!(controller.should_focus());
        assert_eq!(controller.style(), RevealStyle::SHOWN);

        controller.hide();
        assert!(!controller.should_focus());
        controller.hide();
        assert!(!controller.is_visible());
    }
}
