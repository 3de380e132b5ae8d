//! Headless coordinator for the whole overlay.
//!
//! Routes global key events through the [`KeyboardHub`], mounts the intro
//! gate first and the Shift+Space toggle only after the intro is gone, feeds
//! the toggle's focus signal into the search bar, and drives every timer from
//! [`Overlay::tick`]. The egui app renders from its accessors.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::config::FloatbarConfig;
use crate::input::{KeyCode, KeyDisposition, KeyEvent, KeyboardHub, Subscription};
use crate::ui::intro::{IntroGate, IntroPhase};
use crate::ui::results::SearchResult;
use crate::ui::search_bar::SearchBar;
use crate::ui::toast::{Toast, ToastScheduler};
use crate::ui::visibility::{RevealStyle, SearchVisibility};

/// Result of feeding one keydown to the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyOutcome {
    pub disposition: KeyDisposition,
    /// Text submitted by this key, if it was a fresh Enter in the focused bar
    pub submitted: Option<String>,
}

struct MountedIntro {
    gate: Rc<RefCell<IntroGate>>,
    _subscription: Subscription,
}

pub struct Overlay {
    hub: KeyboardHub,
    intro: Option<MountedIntro>,
    visibility: Rc<RefCell<SearchVisibility>>,
    visibility_subscription: Option<Subscription>,
    search_bar: SearchBar,
    submitted: Rc<RefCell<Option<String>>>,
    focus_request: bool,
    toasts: ToastScheduler,
    results: Vec<SearchResult>,
    selected_index: Option<isize>,
    welcome_toast: Option<String>,
}

impl Overlay {
    pub fn new(config: &FloatbarConfig) -> Self {
        let submitted = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&submitted);
        let search_bar = SearchBar::new(config.placeholder.clone())
            .with_hint_duration(config.hint_duration())
            .with_on_enter(move |text| *sink.borrow_mut() = Some(text.to_string()));

        let mut overlay = Self {
            hub: KeyboardHub::new(),
            intro: None,
            visibility: Rc::new(RefCell::new(SearchVisibility::default())),
            visibility_subscription: None,
            search_bar,
            submitted,
            focus_request: false,
            toasts: ToastScheduler::new(config.toast_duration(), config.toast_fade_lead()),
            results: Vec::new(),
            selected_index: None,
            welcome_toast: config.welcome_toast.clone(),
        };

        if config.show_intro {
            overlay.mount_intro(IntroGate::new(config.intro_dismiss_delay()));
        } else {
            overlay.mount_search(Instant::now());
        }
        overlay
    }

    /// Replace the intro gate, e.g. to attach a dismissal callback.
    /// Ignored once the search toggle is mounted.
    pub fn with_intro(mut self, gate: IntroGate) -> Self {
        if self.visibility_subscription.is_none() {
            self.mount_intro(gate);
        }
        self
    }

    pub fn with_results(mut self, results: Vec<SearchResult>) -> Self {
        self.set_results(results);
        self
    }

    fn mount_intro(&mut self, gate: IntroGate) {
        // Drop the previous gate's subscription before registering the new one.
        self.intro = None;
        let gate = Rc::new(RefCell::new(gate));
        let subscription = self.hub.subscribe(gate.clone());
        self.intro = Some(MountedIntro {
            gate,
            _subscription: subscription,
        });
    }

    fn mount_search(&mut self, now: Instant) {
        let subscription = self.hub.subscribe(self.visibility.clone());
        self.visibility_subscription = Some(subscription);
        tracing::info!("Search toggle active (Shift+Space)");

        if let Some(message) = self.welcome_toast.take() {
            self.toasts.add_toast(message, None, now);
        }
    }

    /// Feed a window-level keydown.
    pub fn handle_key(&mut self, event: &KeyEvent, now: Instant) -> KeyOutcome {
        let mut disposition = self.hub.dispatch(event, now);

        if self.is_search_visible() {
            match event.code {
                KeyCode::ArrowDown => {
                    self.move_selection(1);
                    disposition = disposition.max(KeyDisposition::PreventDefault);
                }
                KeyCode::ArrowUp => {
                    self.move_selection(-1);
                    disposition = disposition.max(KeyDisposition::PreventDefault);
                }
                KeyCode::Escape => {
                    self.visibility.borrow_mut().hide();
                    disposition = disposition.max(KeyDisposition::Handled);
                }
                _ => {}
            }

            if self.search_bar.is_focused() && self.search_bar.on_key_down(event) {
                disposition = disposition.max(KeyDisposition::Handled);
            }
        }

        self.sync_focus();

        let submitted = self.submitted.borrow_mut().take();
        if let Some(text) = &submitted {
            tracing::info!("Search submitted: {:?}", text);
        }
        KeyOutcome {
            disposition,
            submitted,
        }
    }

    fn sync_focus(&mut self) {
        let visible = self.is_search_visible();
        if self.search_bar.set_should_focus(visible) {
            self.focus_request = true;
        }
        if !visible {
            self.search_bar.reset_focus();
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.results.is_empty() {
            return;
        }
        let last = self.results.len() as isize - 1;
        let next = match self.selected_index {
            Some(i) if (0..=last).contains(&i) => (i + delta).clamp(0, last),
            _ if delta > 0 => 0,
            _ => last,
        };
        self.selected_index = Some(next);
    }

    /// Fire every timer due at `now`.
    pub fn tick(&mut self, now: Instant) {
        let dismissed = self
            .intro
            .as_ref()
            .is_some_and(|intro| intro.gate.borrow_mut().tick(now));
        if dismissed {
            self.intro = None;
            self.mount_search(now);
        }

        for id in self.toasts.tick(now) {
            tracing::debug!("Toast {} expired", id);
        }
        self.search_bar.tick(now);
    }

    /// When the next timer is due, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        let intro = self
            .intro
            .as_ref()
            .and_then(|intro| intro.gate.borrow().next_deadline());
        [intro, self.toasts.next_deadline(), self.search_bar.next_deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    /// Intro phase while the intro is still mounted.
    pub fn intro_phase(&self) -> Option<IntroPhase> {
        self.intro.as_ref().map(|intro| intro.gate.borrow().phase())
    }

    pub fn is_search_visible(&self) -> bool {
        self.visibility.borrow().is_visible()
    }

    pub fn reveal_style(&self) -> RevealStyle {
        self.visibility.borrow().style()
    }

    /// True once per false -> true visibility edge: the widget must grab focus.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_request)
    }

    pub fn search_bar(&self) -> &SearchBar {
        &self.search_bar
    }

    pub fn search_bar_mut(&mut self) -> &mut SearchBar {
        &mut self.search_bar
    }

    pub fn add_toast(
        &mut self,
        message: impl Into<String>,
        duration: Option<Duration>,
        now: Instant,
    ) -> Toast {
        self.toasts.add_toast(message, duration, now)
    }

    pub fn toasts(&self) -> &ToastScheduler {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut ToastScheduler {
        &mut self.toasts
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn set_results(&mut self, results: Vec<SearchResult>) {
        self.results = results;
        self.selected_index = None;
    }

    pub fn selected_index(&self) -> Option<isize> {
        self.selected_index
    }

    pub fn set_selected_index(&mut self, index: Option<isize>) {
        self.selected_index = index;
    }

    /// Number of live window-level key listeners.
    pub fn listener_count(&self) -> usize {
        self.hub.listener_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::search_bar::FocusState;
    use crate::ui::toast::REVEAL_DELAY;
    use std::cell::Cell;

    fn shift_space() -> KeyEvent {
        KeyEvent::press(KeyCode::Space).with_shift()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn no_intro() -> FloatbarConfig {
        FloatbarConfig {
            show_intro: false,
            ..FloatbarConfig::default()
        }
    }

    fn results() -> Vec<SearchResult> {
        vec![
            SearchResult::new("1", "one"),
            SearchResult::new("2", "two"),
            SearchResult::new("3", "three"),
        ]
    }

    #[test]
    fn test_intro_is_sole_listener() {
        let start = Instant::now();
        let mut overlay = Overlay::new(&FloatbarConfig::default());
        assert_eq!(overlay.listener_count(), 1);
        assert_eq!(overlay.intro_phase(), Some(IntroPhase::Showing));

        // Shift+Space dismisses the intro but does not open the search
        let outcome = overlay.handle_key(&shift_space(), start);
        assert_eq!(outcome.disposition, KeyDisposition::PreventDefault);
        assert!(!overlay.is_search_visible());
        assert!(matches!(overlay.intro_phase(), Some(IntroPhase::Hiding { .. })));

        // Still inert during the hide transition
        overlay.handle_key(&shift_space(), start + ms(100));
        assert!(!overlay.is_search_visible());

        overlay.tick(start + ms(500));
        assert_eq!(overlay.intro_phase(), None);
        assert_eq!(overlay.listener_count(), 1);

        overlay.handle_key(&shift_space(), start + ms(600));
        assert!(overlay.is_search_visible());
    }

    #[test]
    fn test_intro_callback_fires_once() {
        let start = Instant::now();
        let count = Rc::new(Cell::new(0));
        let sink = Rc::clone(&count);
        let mut overlay = Overlay::new(&FloatbarConfig::default())
            .with_intro(IntroGate::default().with_on_dismiss(move || sink.set(sink.get() + 1)));
        assert_eq!(overlay.listener_count(), 1);

        overlay.handle_key(&KeyEvent::press(KeyCode::Letter('Q')), start);
        overlay.handle_key(&KeyEvent::press(KeyCode::Letter('W')), start + ms(10));
        overlay.tick(start + ms(500));
        overlay.tick(start + ms(1500));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_toggle_requests_focus_once() {
        let start = Instant::now();
        let mut overlay = Overlay::new(&no_intro());

        overlay.handle_key(&shift_space(), start);
        assert!(overlay.is_search_visible());
        assert_eq!(overlay.search_bar().state(), FocusState::Focused);
        assert!(overlay.take_focus_request());
        assert!(!overlay.take_focus_request());

        // Unrelated keys while visible do not re-request focus
        overlay.handle_key(&KeyEvent::press(KeyCode::Letter('A')), start);
        assert!(!overlay.take_focus_request());

        overlay.handle_key(&shift_space(), start);
        assert!(!overlay.is_search_visible());
        assert_eq!(overlay.search_bar().state(), FocusState::Blurred);
        assert_eq!(overlay.reveal_style(), RevealStyle::HIDDEN);

        overlay.handle_key(&shift_space(), start);
        assert!(overlay.take_focus_request());
    }

    #[test]
    fn test_hide_blurs_despite_mousedown_in_bar() {
        let start = Instant::now();
        let mut overlay = Overlay::new(&no_intro());

        overlay.handle_key(&shift_space(), start);
        assert!(overlay.take_focus_request());

        // Click inside the focused text field, then hide with the chord
        assert!(overlay.search_bar_mut().on_mouse_down());
        overlay.handle_key(&shift_space(), start);
        assert!(!overlay.is_search_visible());
        assert_eq!(overlay.search_bar().state(), FocusState::Blurred);

        overlay.handle_key(&shift_space(), start);
        assert!(overlay.take_focus_request());
        assert_eq!(overlay.search_bar().state(), FocusState::Focused);
    }

    #[test]
    fn test_toast_hidden_on_first_render() {
        let start = Instant::now();
        let mut overlay = Overlay::new(&no_intro());

        overlay.add_toast("Searching for \"x\"", None, start);
        overlay.tick(start);
        let view = overlay.toasts().views().next().unwrap();
        assert!(!view.visible);

        overlay.tick(start + REVEAL_DELAY);
        let view = overlay.toasts().views().next().unwrap();
        assert!(view.visible);
    }

    #[test]
    fn test_enter_submits_only_when_visible_and_focused() {
        let start = Instant::now();
        let mut overlay = Overlay::new(&no_intro());
        overlay.search_bar_mut().on_text_change("weather");

        let hidden = overlay.handle_key(&KeyEvent::press(KeyCode::Enter), start);
        assert_eq!(hidden.submitted, None);

        overlay.handle_key(&shift_space(), start);
        let fresh = overlay.handle_key(&KeyEvent::press(KeyCode::Enter), start);
        assert_eq!(fresh.submitted.as_deref(), Some("weather"));

        let held = overlay.handle_key(&KeyEvent::press(KeyCode::Enter).repeated(), start);
        assert_eq!(held.submitted, None);
    }

    #[test]
    fn test_escape_hides() {
        let start = Instant::now();
        let mut overlay = Overlay::new(&no_intro());
        overlay.handle_key(&shift_space(), start);
        overlay.handle_key(&KeyEvent::press(KeyCode::Escape), start);
        assert!(!overlay.is_search_visible());
    }

    #[test]
    fn test_arrow_navigation() {
        let start = Instant::now();
        let mut overlay = Overlay::new(&no_intro()).with_results(results());
        let down = KeyEvent::press(KeyCode::ArrowDown);
        let up = KeyEvent::press(KeyCode::ArrowUp);

        // Ignored while hidden
        overlay.handle_key(&down, start);
        assert_eq!(overlay.selected_index(), None);

        overlay.handle_key(&shift_space(), start);
        overlay.handle_key(&down, start);
        assert_eq!(overlay.selected_index(), Some(0));
        for _ in 0..5 {
            overlay.handle_key(&down, start);
        }
        assert_eq!(overlay.selected_index(), Some(2));
        overlay.handle_key(&up, start);
        assert_eq!(overlay.selected_index(), Some(1));

        overlay.set_selected_index(Some(7));
        overlay.handle_key(&up, start);
        assert_eq!(overlay.selected_index(), Some(2));
    }

    #[test]
    fn test_welcome_toast_after_intro() {
        let start = Instant::now();
        let config = FloatbarConfig {
            welcome_toast: Some("Welcome".to_string()),
            ..FloatbarConfig::default()
        };
        let mut overlay = Overlay::new(&config);
        assert!(overlay.toasts().is_empty());

        overlay.handle_key(&KeyEvent::press(KeyCode::Enter), start);
        overlay.tick(start + ms(500));

        let messages: Vec<&str> = overlay.toasts().toasts().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, vec!["Welcome"]);
    }

    #[test]
    fn test_next_deadline_across_components() {
        let start = Instant::now();
        let mut overlay = Overlay::new(&FloatbarConfig::default());
        assert_eq!(overlay.next_deadline(), None);

        overlay.add_toast("later", Some(ms(2000)), start);
        overlay.handle_key(&KeyEvent::press(KeyCode::Enter), start);
        assert_eq!(overlay.next_deadline(), Some(start + REVEAL_DELAY));

        overlay.tick(start);
        assert_eq!(overlay.next_deadline(), Some(start + REVEAL_DELAY));

        overlay.tick(start + REVEAL_DELAY);
        assert_eq!(overlay.next_deadline(), Some(start + ms(500)));

        overlay.tick(start + ms(500));
        assert_eq!(overlay.next_deadline(), Some(start + ms(1700)));
    }
}
