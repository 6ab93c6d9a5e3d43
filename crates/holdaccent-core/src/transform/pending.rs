// Holdaccent Pending State
// The single in-flight substitution candidate

use std::time::{Duration, Instant};

use crate::event::TimerId;

/// A suppressed accent key awaiting leader, release or timeout.
///
/// Substitute and delay are captured when the key is suppressed, so a
/// reconfiguration never changes the outcome of a gesture already under way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pending {
    /// The literal text that was withheld
    pub input: String,
    /// What a leader key commits instead
    pub substitute: String,
    /// When the key was suppressed
    pub started_at: Instant,
    /// Effective delay for this key's case
    pub delay: Duration,
    /// Live timeout for this gesture
    pub timer: TimerId,
}

impl Pending {
    pub fn deadline(&self) -> Instant {
        self.started_at + self.delay
    }

    fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    /// Leader window: strictly before the deadline
    pub fn within_window(&self, now: Instant) -> bool {
        self.elapsed(now) < self.delay
    }

    /// Complement of [`Pending::within_window`]; matches a timer firing at the deadline
    pub fn is_expired(&self, now: Instant) -> bool {
        !self.within_window(now)
    }
}

/// Engine state: idle, or exactly one pending key with its timer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PendingState {
    #[default]
    Idle,
    Pending(Pending),
}

impl PendingState {
    pub fn is_idle(&self) -> bool {
        matches!(self, PendingState::Idle)
    }

    pub fn as_pending(&self) -> Option<&Pending> {
        match self {
            PendingState::Pending(pending) => Some(pending),
            PendingState::Idle => None,
        }
    }

    /// Literal text of the pending key, if any
    pub fn input(&self) -> Option<&str> {
        self.as_pending().map(|p| p.input.as_str())
    }

    pub fn timer(&self) -> Option<TimerId> {
        self.as_pending().map(|p| p.timer)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.as_pending().map(Pending::deadline)
    }

    pub fn within_window(&self, now: Instant) -> bool {
        self.as_pending().is_some_and(|p| p.within_window(now))
    }

    /// True only while pending and past the deadline
    pub fn is_expired(&self, now: Instant) -> bool {
        self.as_pending().is_some_and(|p| p.is_expired(now))
    }

    /// Move out the pending gesture, leaving the state idle
    pub fn take(&mut self) -> Option<Pending> {
        match std::mem::take(self) {
            PendingState::Pending(pending) => Some(pending),
            PendingState::Idle => None,
        }
    }
}
