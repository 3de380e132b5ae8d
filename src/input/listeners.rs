//! Window-level key listener registration.
//!
//! A listener stays registered exactly as long as its [`Subscription`] guard
//! is alive. Dropping the guard deregisters it, so a torn-down controller can
//! never keep receiving events.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Instant;

use super::keys::KeyEvent;

/// What a listener did with an event. Ordered so the strongest reaction wins
/// when several listeners see the same event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum KeyDisposition {
    Ignored,
    Handled,
    /// Handled, and the key's default action (typing, scrolling) must be suppressed.
    PreventDefault,
}

impl KeyDisposition {
    pub fn prevents_default(self) -> bool {
        self == KeyDisposition::PreventDefault
    }
}

/// Receiver of global keydown events.
pub trait KeyListener {
    fn on_key_down(&mut self, event: &KeyEvent, now: Instant) -> KeyDisposition;
}

type SharedListener = Rc<RefCell<dyn KeyListener>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<(u64, SharedListener)>,
}

/// Dispatches key events to registered listeners in registration order.
#[derive(Default)]
pub struct KeyboardHub {
    registry: Rc<RefCell<Registry>>,
}

impl KeyboardHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It receives events until the returned guard drops.
    #[must_use = "the listener is deregistered as soon as the subscription is dropped"]
    pub fn subscribe(&self, listener: SharedListener) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push((id, listener));
        tracing::debug!("Key listener {} registered", id);

        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Deliver `event` to every listener registered at the time of the call.
    pub fn dispatch(&self, event: &KeyEvent, now: Instant) -> KeyDisposition {
        // Snapshot so listeners may (un)subscribe while handling.
        let listeners: Vec<SharedListener> = self
            .registry
            .borrow()
            .entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        listeners
            .iter()
            .map(|listener| listener.borrow_mut().on_key_down(event, now))
            .max()
            .unwrap_or(KeyDisposition::Ignored)
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().entries.len()
    }
}

/// Registration guard returned by [`KeyboardHub::subscribe`].
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().entries.retain(|(id, _)| *id != self.id);
            tracing::debug!("Key listener {} deregistered", self.id);
        }
    }
}
