//! Toast notifications.
//!
//! [`ToastScheduler`] owns the live toasts in insertion order. Every toast
//! gets three timers when it is added: an entrance reveal one frame later,
//! a fade-out `fade_lead` before its end, and its removal at `duration`.
//! A toast is therefore always drawn hidden at least once before it shows,
//! so the entrance transition has a starting point.
//! Removing a toast early cancels all three together.

use std::fmt;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::timeline::{TimerId, Timeline};

/// Default toast lifetime (5s).
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(5000);

/// Fade-out starts this long before removal (300ms).
pub const DEFAULT_FADE_LEAD: Duration = Duration::from_millis(300);

/// Delay between adding a toast and revealing it (one frame at 60Hz).
pub const REVEAL_DELAY: Duration = Duration::from_millis(16);

/// Horizontal slide of a hidden toast, in logical pixels.
const HIDDEN_OFFSET_X: f32 = 16.0;

/// Unique toast identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToastId(String);

impl ToastId {
    fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A notification record. Never edited after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub duration: Duration,
}

/// Read-only projection of a live toast for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToastView<'a> {
    pub toast: &'a Toast,
    pub visible: bool,
}

impl ToastView<'_> {
    pub fn opacity(&self) -> f32 {
        if self.visible {
            1.0
        } else {
            0.0
        }
    }

    pub fn offset_x(&self) -> f32 {
        if self.visible {
            0.0
        } else {
            HIDDEN_OFFSET_X
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToastStep {
    Reveal,
    Fade,
    Remove,
}

#[derive(Debug, Clone, Copy)]
struct ToastTimers {
    reveal: TimerId,
    fade: TimerId,
    remove: TimerId,
}

#[derive(Debug)]
struct LiveToast {
    toast: Toast,
    visible: bool,
    timers: ToastTimers,
}

/// Owner of the live toast list and its timers.
#[derive(Debug)]
pub struct ToastScheduler {
    live: Vec<LiveToast>,
    timeline: Timeline<(ToastId, ToastStep)>,
    default_duration: Duration,
    fade_lead: Duration,
}

impl Default for ToastScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION, DEFAULT_FADE_LEAD)
    }
}

impl ToastScheduler {
    pub fn new(default_duration: Duration, fade_lead: Duration) -> Self {
        Self {
            live: Vec::new(),
            timeline: Timeline::new(),
            default_duration,
            fade_lead,
        }
    }

    /// Append a toast and start its timers. Returns the stored record.
    pub fn add_toast(
        &mut self,
        message: impl Into<String>,
        duration: Option<Duration>,
        now: Instant,
    ) -> Toast {
        let mut id = ToastId::generate();
        while self.contains(&id) {
            id = ToastId::generate();
        }

        let duration = duration.unwrap_or(self.default_duration);
        // Fade never precedes the reveal
        let fade_after = duration.saturating_sub(self.fade_lead).max(REVEAL_DELAY);
        let timers = ToastTimers {
            reveal: self
                .timeline
                .schedule_after(now, REVEAL_DELAY, (id.clone(), ToastStep::Reveal)),
            fade: self
                .timeline
                .schedule_after(now, fade_after, (id.clone(), ToastStep::Fade)),
            remove: self
                .timeline
                .schedule_after(now, duration, (id.clone(), ToastStep::Remove)),
        };

        let toast = Toast {
            id,
            message: message.into(),
            duration,
        };
        tracing::debug!("Toast {} added ({:?})", toast.id, duration);

        self.live.push(LiveToast {
            toast: toast.clone(),
            visible: false,
            timers,
        });
        toast
    }

    /// Remove a toast and cancel its pending timers. Unknown ids are ignored.
    pub fn remove_toast(&mut self, id: &ToastId) -> bool {
        let Some(pos) = self.live.iter().position(|t| &t.toast.id == id) else {
            return false;
        };

        let removed = self.live.remove(pos);
        let timers = removed.timers;
        for timer in [timers.reveal, timers.fade, timers.remove] {
            self.timeline.cancel(timer);
        }
        tracing::debug!("Toast {} removed", id);
        true
    }

    /// Fire due timers. Returns the ids removed by their own expiry.
    pub fn tick(&mut self, now: Instant) -> Vec<ToastId> {
        let mut expired = Vec::new();

        for (id, step) in self.timeline.drain_due(now) {
            match step {
                ToastStep::Reveal => self.set_visible(&id, true),
                ToastStep::Fade => self.set_visible(&id, false),
                ToastStep::Remove => {
                    if self.remove_toast(&id) {
                        expired.push(id);
                    }
                }
            }
        }

        expired
    }

    fn set_visible(&mut self, id: &ToastId, visible: bool) {
        if let Some(live) = self.live.iter_mut().find(|t| &t.toast.id == id) {
            live.visible = visible;
        }
    }

    pub fn contains(&self, id: &ToastId) -> bool {
        self.live.iter().any(|t| &t.toast.id == id)
    }

    /// Live toasts, oldest first.
    pub fn toasts(&self) -> impl Iterator<Item = &Toast> {
        self.live.iter().map(|t| &t.toast)
    }

    pub fn views(&self) -> impl Iterator<Item = ToastView<'_>> {
        self.live.iter().map(|t| ToastView {
            toast: &t.toast,
            visible: t.visible,
        })
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn pending_timers(&self) -> usize {
        self.timeline.len()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timeline.next_due()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn messages(scheduler: &ToastScheduler) -> Vec<&str> {
        scheduler.toasts().map(|t| t.message.as_str()).collect()
    }

    #[test]
    fn test_add_uses_default_duration() {
        let start = Instant::now();
        let mut scheduler = ToastScheduler::default();
        let toast = scheduler.add_toast("Saved", None, start);

        assert_eq!(toast.duration, DEFAULT_TOAST_DURATION);
        assert_eq!(toast.message, "Saved");
        assert!(scheduler.contains(&toast.id));
        assert_eq!(scheduler.pending_timers(), 3);
    }

    #[test]
    fn test_insertion_order_and_removal() {
        let start = Instant::now();
        let mut scheduler = ToastScheduler::default();
        let ids: Vec<ToastId> = ["one", "two", "three", "four"]
            .iter()
            .map(|m| scheduler.add_toast(*m, None, start).id)
            .collect();

        assert_eq!(messages(&scheduler), vec!["one", "two", "three", "four"]);

        assert!(scheduler.remove_toast(&ids[1]));
        assert_eq!(messages(&scheduler), vec!["one", "three", "four"]);
    }

    #[test]
    fn test_ids_are_unique() {
        let start = Instant::now();
        let mut scheduler = ToastScheduler::default();
        let mut ids: Vec<ToastId> = (0..200)
            .map(|i| scheduler.add_toast(format!("t{}", i), None, start).id)
            .collect();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        ids.dedup();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let start = Instant::now();
        let mut scheduler = ToastScheduler::default();
        let toast = scheduler.add_toast("keep", None, start);
        let other = ToastScheduler::default().add_toast("elsewhere", None, start);

        assert!(!scheduler.remove_toast(&other.id));
        assert!(scheduler.remove_toast(&toast.id));
        assert!(!scheduler.remove_toast(&toast.id));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_lifecycle() {
        let start = Instant::now();
        let mut scheduler = ToastScheduler::default();
        let toast = scheduler.add_toast("hello", Some(ms(1000)), start);

        // Added hidden, revealed one frame later
        assert!(!scheduler.views().next().unwrap().visible);
        assert!(scheduler.tick(start + REVEAL_DELAY).is_empty());
        assert!(scheduler.views().next().unwrap().visible);

        assert!(scheduler.tick(start + ms(699)).is_empty());
        assert!(scheduler.views().next().unwrap().visible);

        assert!(scheduler.tick(start + ms(700)).is_empty());
        assert!(!scheduler.views().next().unwrap().visible);
        assert!(scheduler.contains(&toast.id));

        assert!(scheduler.tick(start + ms(999)).is_empty());
        assert!(scheduler.contains(&toast.id));

        assert_eq!(scheduler.tick(start + ms(1000)), vec![toast.id.clone()]);
        assert!(!scheduler.contains(&toast.id));
        assert_eq!(scheduler.pending_timers(), 0);

        // Fires once
        assert!(scheduler.tick(start + ms(5000)).is_empty());
    }

    #[test]
    fn test_early_removal_cancels_all_timers() {
        let start = Instant::now();
        let mut scheduler = ToastScheduler::default();
        let doomed = scheduler.add_toast("doomed", None, start);
        let kept = scheduler.add_toast("kept", Some(ms(8000)), start);
        assert_eq!(scheduler.pending_timers(), 6);

        scheduler.remove_toast(&doomed.id);
        assert_eq!(scheduler.pending_timers(), 3);

        let expired = scheduler.tick(start + ms(6000));
        assert!(expired.is_empty());
        assert!(scheduler.contains(&kept.id));
    }

    #[test]
    fn test_short_duration_fades_immediately() {
        let start = Instant::now();
        let mut scheduler = ToastScheduler::default();
        let toast = scheduler.add_toast("blink", Some(ms(100)), start);

        // Fade deadline clamps to the reveal; both fire in order
        scheduler.tick(start + REVEAL_DELAY);
        assert!(!scheduler.views().next().unwrap().visible);
        assert_eq!(scheduler.tick(start + ms(100)), vec![toast.id]);
    }

    #[test]
    fn test_reveal_waits_for_first_render() {
        let start = Instant::now();
        let mut scheduler = ToastScheduler::default();
        scheduler.add_toast("Searching for \"x\"", None, start);

        // Same instant as the add: still hidden when first drawn
        assert!(scheduler.tick(start).is_empty());
        assert!(!scheduler.views().next().unwrap().visible);
        assert_eq!(scheduler.next_deadline(), Some(start + REVEAL_DELAY));

        scheduler.tick(start + ms(1));
        assert!(!scheduler.views().next().unwrap().visible);

        scheduler.tick(start + REVEAL_DELAY);
        assert!(scheduler.views().next().unwrap().visible);
    }

    #[test]
    fn test_next_deadline() {
        let start = Instant::now();
        let mut scheduler = ToastScheduler::new(ms(2000), ms(300));
        assert_eq!(scheduler.next_deadline(), None);

        scheduler.add_toast("x", None, start);
        scheduler.tick(start);
        assert_eq!(scheduler.next_deadline(), Some(start + REVEAL_DELAY));

        scheduler.tick(start + REVEAL_DELAY);
        assert_eq!(scheduler.next_deadline(), Some(start + ms(1700)));
    }

    #[test]
    fn test_view_style() {
        let start = Instant::now();
        let mut scheduler = ToastScheduler::default();
        scheduler.add_toast("x", None, start);

        let hidden = scheduler.views().next().unwrap();
        assert_eq!(hidden.opacity(), 0.0);
        assert_eq!(hidden.offset_x(), HIDDEN_OFFSET_X);

        scheduler.tick(start + REVEAL_DELAY);
        let shown = scheduler.views().next().unwrap();
        assert_eq!(shown.opacity(), 1.0);
        assert_eq!(shown.offset_x(), 0.0);
    }
}
