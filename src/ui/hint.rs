//! Dictation hint shown from the search bar's microphone control.

use std::time::{Duration, Instant};

/// How long the hint stays up (3s).
pub const DEFAULT_HINT_DURATION: Duration = Duration::from_millis(3000);

const APPLE_PLATFORMS: [&str; 4] = ["mac", "ipod", "iphone", "ipad"];

/// Dictation shortcut label for a platform string such as `MacIntel` or `macos`.
pub fn dictation_shortcut(platform: &str) -> &'static str {
    let platform = platform.to_ascii_lowercase();
    if APPLE_PLATFORMS.iter().any(|p| platform.contains(p)) {
        "Fn twice"
    } else {
        "Win+H"
    }
}

/// Tooltip text for a platform string.
pub fn dictation_hint(platform: &str) -> String {
    format!("Press {} to dictate", dictation_shortcut(platform))
}

/// Timed visibility of the hint tooltip.
#[derive(Debug, Clone)]
pub struct DictationHint {
    text: String,
    duration: Duration,
    hide_at: Option<Instant>,
}

impl DictationHint {
    pub fn new(platform: &str, duration: Duration) -> Self {
        Self {
            text: dictation_hint(platform),
            duration,
            hide_at: None,
        }
    }

    /// For the platform this binary was built for.
    pub fn for_current_platform(duration: Duration) -> Self {
        Self::new(std::env::consts::OS, duration)
    }

    /// Show the hint; a repeated show restarts the countdown.
    pub fn show(&mut self, now: Instant) {
        self.hide_at = Some(now + self.duration);
    }

    pub fn tick(&mut self, now: Instant) {
        if self.hide_at.is_some_and(|at| now >= at) {
            self.hide_at = None;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.hide_at.is_some()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.hide_at
    }
}
