//! Keyboard input model and global listener registration.
//!
//! Key events carry both the logical key (what was typed) and the physical
//! key code (where it sits on the keyboard). Shortcuts match on the code.

pub mod keys;
pub mod listeners;

pub use keys::{Chord, Key, KeyCode, KeyEvent, SHIFT_SPACE};
pub use listeners::{KeyDisposition, KeyListener, KeyboardHub, Subscription};
