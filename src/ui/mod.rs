//! Overlay UI components.
//!
//! Each component is a headless state machine; `app` renders them with egui.

pub mod app;
pub mod hint;
pub mod intro;
pub mod overlay;
pub mod results;
pub mod search_bar;
pub mod toast;
pub mod visibility;

pub use app::FloatbarApp;
pub use intro::{IntroGate, IntroPhase};
pub use overlay::{KeyOutcome, Overlay};
pub use results::{SearchResult, SearchResultsList};
pub use search_bar::{FocusState, SearchBar};
pub use toast::{Toast, ToastId, ToastScheduler};
pub use visibility::{RevealStyle, SearchVisibility};
