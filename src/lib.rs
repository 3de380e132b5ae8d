//! Floatbar - a floating, keyboard-toggled search bar.
//!
//! This library holds the view-state machines behind the overlay: the
//! Shift+Space visibility toggle, the search input's focus handling, the
//! one-shot intro gate, toast scheduling, and the results list projection.
//! All of them are headless and driven by explicit `Instant`s; the `ui::app`
//! module renders them with egui.

pub mod config;
pub mod input;
pub mod timeline;
pub mod ui;

use thiserror::Error;

/// Floatbar error types.
///
/// The state machines themselves never fail; errors only come from loading
/// configuration and result fixtures.
#[derive(Error, Debug)]
pub enum FloatbarError {
    /// Configuration file could not be parsed
    #[error("Config error: {0}")]
    Config(String),

    /// Result fixture could not be loaded
    #[error("Results error: {0}")]
    Results(String),

    /// I/O errors (reading config or fixture files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using FloatbarError
pub type Result<T> = std::result::Result<T, FloatbarError>;
