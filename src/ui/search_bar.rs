//! Search input state: text, focus/expansion, and Enter submission.
//!
//! The bar is either `Blurred` or `Focused`. A mousedown inside a focused bar
//! arms a one-shot flag that swallows the next blur, so clicking the bar's own
//! controls does not collapse it.

use std::time::{Duration, Instant};

use crate::input::{Key, KeyEvent};
use crate::ui::hint::{DictationHint, DEFAULT_HINT_DURATION};

/// Placeholder when none is configured.
pub const DEFAULT_PLACEHOLDER: &str = "Ask ChatGPT";

/// Bar width while focused, in logical pixels (37.5rem).
pub const EXPANDED_WIDTH: f32 = 600.0;

/// Bar width while blurred, in logical pixels (18.75rem).
pub const COLLAPSED_WIDTH: f32 = 300.0;

/// Callback receiving the submitted text.
pub type SubmitCallback = Box<dyn FnMut(&str)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusState {
    #[default]
    Blurred,
    Focused,
}

impl FocusState {
    pub fn is_focused(self) -> bool {
        self == FocusState::Focused
    }

    /// Bar width for this state.
    pub fn width(self) -> f32 {
        match self {
            FocusState::Focused => EXPANDED_WIDTH,
            FocusState::Blurred => COLLAPSED_WIDTH,
        }
    }

    /// Opacity of the arrow and microphone accessories.
    pub fn accessory_opacity(self) -> f32 {
        match self {
            FocusState::Focused => 1.0,
            FocusState::Blurred => 0.7,
        }
    }
}

/// A single search input widget's state.
pub struct SearchBar {
    state: FocusState,
    text: String,
    placeholder: String,
    mouse_down_on_bar: bool,
    should_focus: bool,
    on_enter: Option<SubmitCallback>,
    hint: DictationHint,
}

impl Default for SearchBar {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER)
    }
}

impl SearchBar {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            state: FocusState::Blurred,
            text: String::new(),
            placeholder: placeholder.into(),
            mouse_down_on_bar: false,
            should_focus: false,
            on_enter: None,
            hint: DictationHint::for_current_platform(DEFAULT_HINT_DURATION),
        }
    }

    pub fn with_on_enter(mut self, on_enter: impl FnMut(&str) + 'static) -> Self {
        self.on_enter = Some(Box::new(on_enter));
        self
    }

    pub fn with_hint(mut self, hint: DictationHint) -> Self {
        self.hint = hint;
        self
    }

    pub fn with_hint_duration(mut self, duration: Duration) -> Self {
        self.hint = DictationHint::for_current_platform(duration);
        self
    }

    pub fn state(&self) -> FocusState {
        self.state
    }

    pub fn is_focused(&self) -> bool {
        self.state.is_focused()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn width(&self) -> f32 {
        self.state.width()
    }

    pub fn hint(&self) -> &DictationHint {
        &self.hint
    }

    pub fn on_focus(&mut self) {
        if self.state != FocusState::Focused {
            tracing::debug!("Search bar focused");
        }
        self.state = FocusState::Focused;
    }

    /// Blur, unless a mousedown inside the bar is still unconsumed.
    pub fn on_blur(&mut self) {
        if self.mouse_down_on_bar {
            tracing::debug!("Blur suppressed by mousedown inside the bar");
        } else {
            self.state = FocusState::Blurred;
        }
        self.mouse_down_on_bar = false;
    }

    /// Force the bar blurred and drop any pending mousedown. Used when the
    /// container hides, which is not a user blur and must not be suppressed.
    pub fn reset_focus(&mut self) {
        if self.is_focused() {
            tracing::debug!("Search bar focus reset");
        }
        self.state = FocusState::Blurred;
        self.mouse_down_on_bar = false;
    }

    /// Mousedown inside the bar. Returns true when the press must not move
    /// focus (the bar was focused and keeps it).
    pub fn on_mouse_down(&mut self) -> bool {
        if self.is_focused() {
            self.mouse_down_on_bar = true;
            true
        } else {
            false
        }
    }

    pub fn on_text_change(&mut self, value: impl Into<String>) {
        self.text = value.into();
    }

    /// Handle a keydown on the input. Returns true if the text was submitted.
    ///
    /// Only a fresh Enter submits; held-key repeats and other keys do nothing.
    pub fn on_key_down(&mut self, event: &KeyEvent) -> bool {
        if event.key != Key::Enter || event.repeat {
            return false;
        }
        let Some(on_enter) = self.on_enter.as_mut() else {
            return false;
        };

        tracing::debug!("Search bar submitted {} chars", self.text.len());
        on_enter(&self.text);
        true
    }

    /// Feed the container's focus signal. Returns true when the widget must be
    /// focused programmatically, which only happens on a false -> true edge
    /// while blurred.
    pub fn set_should_focus(&mut self, should_focus: bool) -> bool {
        let rising = should_focus && !self.should_focus;
        self.should_focus = should_focus;

        if rising && !self.is_focused() {
            self.on_focus();
            true
        } else {
            false
        }
    }

    pub fn on_mic_click(&mut self, now: Instant) {
        self.hint.show(now);
    }

    pub fn tick(&mut self, now: Instant) {
        self.hint.tick(now);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.hint.next_deadline()
    }
}
