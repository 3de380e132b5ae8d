//! One-shot intro overlay shown at startup.
//!
//! Any key dismisses it except Shift combined with something other than
//! Space. The first dismissing key starts the hide transition and latches;
//! the dismissal callback runs once, `delay` later.

use std::time::{Duration, Instant};

use crate::input::{KeyCode, KeyDisposition, KeyEvent, KeyListener};

/// Delay between the dismissing key and the dismissal callback (500ms).
pub const DEFAULT_DISMISS_DELAY: Duration = Duration::from_millis(500);

pub const TITLE: &str = "Press ⇧ shift + space to begin";
pub const SUBTITLE: &str = "Press any key to dismiss";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroPhase {
    Showing,
    /// Hide transition running; dismissal fires at the stored instant.
    Hiding { dismiss_at: Instant },
    Dismissed,
}

impl IntroPhase {
    /// Overlay opacity target: opaque only while showing.
    pub fn opacity(self) -> f32 {
        match self {
            IntroPhase::Showing => 1.0,
            _ => 0.0,
        }
    }

    /// Whether the overlay still captures pointer input.
    pub fn is_interactive(self) -> bool {
        self == IntroPhase::Showing
    }
}

pub struct IntroGate {
    phase: IntroPhase,
    delay: Duration,
    on_dismiss: Option<Box<dyn FnMut()>>,
}

impl Default for IntroGate {
    fn default() -> Self {
        Self::new(DEFAULT_DISMISS_DELAY)
    }
}

impl IntroGate {
    pub fn new(delay: Duration) -> Self {
        Self {
            phase: IntroPhase::Showing,
            delay,
            on_dismiss: None,
        }
    }

    pub fn with_on_dismiss(mut self, on_dismiss: impl FnMut() + 'static) -> Self {
        self.on_dismiss = Some(Box::new(on_dismiss));
        self
    }

    pub fn phase(&self) -> IntroPhase {
        self.phase
    }

    pub fn is_dismissed(&self) -> bool {
        self.phase == IntroPhase::Dismissed
    }

    /// Shift held with anything but Space keeps the overlay up.
    pub fn dismisses(event: &KeyEvent) -> bool {
        !(event.shift && event.code != KeyCode::Space)
    }

    /// Fire the dismissal once its delay has passed. Returns true on that tick.
    pub fn tick(&mut self, now: Instant) -> bool {
        let IntroPhase::Hiding { dismiss_at } = self.phase else {
            return false;
        };
        if now < dismiss_at {
            return false;
        }

        self.phase = IntroPhase::Dismissed;
        tracing::info!("Intro dismissed");
        if let Some(on_dismiss) = self.on_dismiss.as_mut() {
            on_dismiss();
        }
        true
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match self.phase {
            IntroPhase::Hiding { dismiss_at } => Some(dismiss_at),
            _ => None,
        }
    }
}

impl KeyListener for IntroGate {
    fn on_key_down(&mut self, event: &KeyEvent, now: Instant) -> KeyDisposition {
        if !Self::dismisses(event) {
            return KeyDisposition::Ignored;
        }

        match self.phase {
            IntroPhase::Showing => {
                self.phase = IntroPhase::Hiding {
                    dismiss_at: now + self.delay,
                };
                tracing::debug!("Intro hiding after {:?}", event.code);
                KeyDisposition::PreventDefault
            }
            // Latched: swallow the key without scheduling again.
            IntroPhase::Hiding { .. } => KeyDisposition::PreventDefault,
            IntroPhase::Dismissed => KeyDisposition::Ignored,
        }
    }
}
