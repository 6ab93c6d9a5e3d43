// Holdaccent Input Layer - Key Events
// One key press/release/repeat with its resolved text and monotonic timestamp

use std::time::Instant;

use crate::{Action, Key};

/// A key event handed to the substitution engine by the host.
///
/// `text` is the printable character the host resolved for this key
/// (already accounting for Shift and layout), or `None` for keys that
/// produce no text such as arrows and modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Physical key identity
    pub key: Key,
    /// Resolved printable character, if any
    pub text: Option<char>,
    /// Press, release or auto-repeat
    pub action: Action,
    /// Monotonic clock reading when the event was observed
    pub time: Instant,
}

impl KeyEvent {
    pub fn new(key: Key, text: Option<char>, action: Action, time: Instant) -> Self {
        Self {
            key,
            text: text.filter(|c| !c.is_control()),
            action,
            time,
        }
    }

    /// Event for a key that types `ch`, using its US-layout physical key
    pub fn for_char(ch: char, action: Action, time: Instant) -> Self {
        Self::new(Key::for_char(ch), Some(ch), action, time)
    }

    /// Event for a key that produces no text (arrows, modifiers, ...)
    pub fn for_key(key: Key, action: Action, time: Instant) -> Self {
        let text = if key == Key::SPACE { Some(' ') } else { None };
        Self::new(key, text, action, time)
    }

    pub fn press(ch: char, time: Instant) -> Self {
        Self::for_char(ch, Action::Press, time)
    }

    pub fn release(ch: char, time: Instant) -> Self {
        Self::for_char(ch, Action::Release, time)
    }
}
