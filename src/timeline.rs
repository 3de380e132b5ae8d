//! Cancellable deferred actions.
//!
//! A [`Timeline`] is a polled timer queue: actions are scheduled for an
//! `Instant` and handed back by [`Timeline::drain_due`] once that instant has
//! passed. Nothing runs on its own; the render loop calls `drain_due` each
//! frame and uses [`Timeline::next_due`] to decide when to wake up next.
//!
//! ```
//! use std::time::{Duration, Instant};
//! use floatbar::timeline::Timeline;
//!
//! let start = Instant::now();
//! let mut timeline = Timeline::new();
//! let fade = timeline.schedule_after(start, Duration::from_millis(300), "fade");
//! timeline.schedule_after(start, Duration::from_millis(500), "remove");
//!
//! assert!(timeline.cancel(fade));
//! assert_eq!(timeline.drain_due(start + Duration::from_millis(500)), vec!["remove"]);
//! assert!(timeline.is_empty());
//! ```

use std::time::{Duration, Instant};

/// Handle to a scheduled action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Pending<A> {
    id: TimerId,
    due: Instant,
    action: A,
}

/// Queue of actions waiting for their due time.
#[derive(Debug)]
pub struct Timeline<A> {
    next_id: u64,
    pending: Vec<Pending<A>>,
}

impl<A> Default for Timeline<A> {
    fn default() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<A> Timeline<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Instant, action: A) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending { id, due, action });
        id
    }

    pub fn schedule_after(&mut self, now: Instant, delay: Duration, action: A) -> TimerId {
        self.schedule(now + delay, action)
    }

    /// Cancel a pending action. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    /// Remove and return every action due at or before `now`, earliest first.
    /// Actions due at the same instant come back in scheduling order.
    pub fn drain_due(&mut self, now: Instant) -> Vec<A> {
        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = waiting;

        due.sort_by_key(|p| (p.due, p.id.0));
        due.into_iter().map(|p| p.action).collect()
    }

    /// Earliest due time among pending actions.
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.due).min()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
