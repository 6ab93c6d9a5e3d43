// Holdaccent Substitution Engine
// Timed accent substitution: withhold an accent key, then commit either the
// literal character or its substitute depending on what happens next.
//
// Evaluation order for every key event:
// 1. Leader press inside the window commits the substitute
// 2. Events without printable text only drain an expired pending key
// 3. Accent key press starts (or, on key-repeat, keeps) a pending gesture
// 4. Release of the pending key commits it and forwards the release
// 5. Any event after the deadline commits the pending key first
// 6. Another key pressed inside the window commits the pending key first
// 7. Everything else passes through

use std::time::Instant;

use crate::config::{Config, TimeoutConfig};
use crate::event::{Scheduler, TimerId, TimerQueue};
use crate::input::KeyEvent;
use crate::mapping::MappingTable;
use crate::transform::pending::{Pending, PendingState};
use crate::LeaderKey;

/// What the host should do with the key event it just delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Forward the event to the application unchanged
    PassThrough,
    /// Swallow the event
    Suppress,
}

/// Result of handling a single key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Forward the event unchanged
    PassThrough,
    /// Swallow the event without output
    Suppress,
    /// Commit `text` to the event's input context, then apply `event`
    /// to the key event itself
    Commit { text: String, event: Disposition },
}

impl Decision {
    /// Text to commit, if any
    pub fn commit_text(&self) -> Option<&str> {
        match self {
            Decision::Commit { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Whether the triggering key event should reach the application
    pub fn forwards_event(&self) -> bool {
        matches!(
            self,
            Decision::PassThrough
                | Decision::Commit {
                    event: Disposition::PassThrough,
                    ..
                }
        )
    }

    fn commit(text: String, event: Disposition) -> Self {
        Decision::Commit { text, event }
    }
}

/// Timed key-substitution engine.
///
/// Owns the mapping table, leader key, timeouts and pending state. All
/// calls are expected on one thread; the scheduler reports timer firings
/// back through [`SubstitutionEngine::fire_timeout`].
#[derive(Debug)]
pub struct SubstitutionEngine<S: Scheduler = TimerQueue> {
    mapping: MappingTable,
    leader: LeaderKey,
    timeouts: TimeoutConfig,
    state: PendingState,
    enabled: bool,
    scheduler: S,
}

impl SubstitutionEngine<TimerQueue> {
    /// Create an engine driven by an in-process [`TimerQueue`]
    pub fn new(config: &Config) -> Self {
        Self::with_scheduler(config, TimerQueue::new())
    }

    /// Fire the pending timeout if it is due at `now`.
    ///
    /// Returns the literal text to commit to the currently focused context.
    pub fn poll_timers(&mut self, now: Instant) -> Option<String> {
        while let Some(id) = self.scheduler.pop_expired(now) {
            if let Some(text) = self.fire_timeout(id) {
                return Some(text);
            }
        }
        None
    }
}

impl<S: Scheduler> SubstitutionEngine<S> {
    /// Create an engine using a host-provided scheduler
    pub fn with_scheduler(config: &Config, scheduler: S) -> Self {
        Self {
            mapping: config.mapping_table(),
            leader: config.leader_key,
            timeouts: config.timeouts(),
            state: PendingState::Idle,
            enabled: true,
            scheduler,
        }
    }

    pub fn mapping(&self) -> &MappingTable {
        &self.mapping
    }

    pub fn leader(&self) -> LeaderKey {
        self.leader
    }

    pub fn timeouts(&self) -> TimeoutConfig {
        self.timeouts
    }

    pub fn pending(&self) -> &PendingState {
        &self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Deadline of the pending gesture, if any
    pub fn next_deadline(&self) -> Option<Instant> {
        self.state.deadline()
    }

    /// Decide what to do with one key event
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> Decision {
        if !self.enabled {
            return Decision::PassThrough;
        }

        let decision = self.decide(event);
        log::trace!(
            "Event: {} {} {:?} -> {:?}",
            event.key,
            event.action,
            event.text,
            decision
        );
        decision
    }

    fn decide(&mut self, event: &KeyEvent) -> Decision {
        let now = event.time;
        let pressed = event.action.is_pressed();

        // Arrow leaders carry no text, so this runs before text resolution.
        if pressed && self.leader.matches(event.key) && self.state.within_window(now) {
            if let Some(pending) = self.clear_pending() {
                log::debug!(
                    "'{}' -> '{}' committed by leader {}",
                    pending.input,
                    pending.substitute,
                    event.key
                );
                return Decision::commit(pending.substitute, Disposition::Suppress);
            }
        }

        let Some(ch) = event.text else {
            if self.state.is_expired(now) {
                if let Some(pending) = self.clear_pending() {
                    log::debug!("'{}' committed after timeout (non-text key)", pending.input);
                    return Decision::commit(pending.input, Disposition::PassThrough);
                }
            }
            return Decision::PassThrough;
        };

        let mut buf = [0u8; 4];
        let text: &str = ch.encode_utf8(&mut buf);

        if pressed {
            // Key-repeat of the pending key never moves the deadline.
            if self.state.input() == Some(text) {
                return Decision::Suppress;
            }

            if self.mapping.contains(text) {
                let previous = self.clear_pending();
                self.start_pending(text, now);
                return match previous {
                    Some(previous) => {
                        log::debug!(
                            "'{}' committed, interrupted by accent key '{}'",
                            previous.input,
                            text
                        );
                        Decision::commit(previous.input, Disposition::Suppress)
                    }
                    None => Decision::Suppress,
                };
            }
        }

        if event.action.is_released() && self.state.input() == Some(text) {
            if let Some(pending) = self.clear_pending() {
                log::debug!("'{}' committed on release", pending.input);
                return Decision::commit(pending.input, Disposition::PassThrough);
            }
        }

        // Past the deadline the pending key is committed and this event is
        // evaluated as if idle. Accent presses were handled above, so idle
        // evaluation always passes it through.
        if self.state.is_expired(now) {
            if let Some(pending) = self.clear_pending() {
                log::debug!("'{}' committed after timeout", pending.input);
                return Decision::commit(pending.input, Disposition::PassThrough);
            }
        }

        if pressed {
            if let Some(pending) = self.clear_pending() {
                log::debug!("'{}' committed, interrupted by '{}'", pending.input, text);
                return Decision::commit(pending.input, Disposition::PassThrough);
            }
        }

        Decision::PassThrough
    }

    /// Report a fired timeout.
    ///
    /// Returns the literal pending text if `id` is the live timer; stale
    /// or unknown ids return `None`. Firing is one-shot.
    pub fn fire_timeout(&mut self, id: TimerId) -> Option<String> {
        if self.state.timer() != Some(id) {
            log::trace!("Ignoring stale {}", id);
            return None;
        }

        let pending = self.clear_pending()?;
        log::debug!("'{}' committed by timeout", pending.input);
        Some(pending.input)
    }

    /// Replace mapping, leader and timeouts.
    ///
    /// A gesture already pending keeps the substitute and deadline it
    /// started with.
    pub fn reconfigure(&mut self, config: &Config) {
        self.mapping = config.mapping_table();
        self.leader = config.leader_key;
        self.timeouts = config.timeouts();
        log::debug!(
            "Reconfigured: {} mappings, leader {}, delays {:?}/{:?}",
            self.mapping.len(),
            self.leader,
            self.timeouts.lowercase(),
            self.timeouts.uppercase()
        );
    }

    /// Drop any pending key without committing it (focus change)
    pub fn reset(&mut self) {
        if let Some(pending) = self.clear_pending() {
            log::debug!("'{}' dropped by reset", pending.input);
        }
    }

    pub fn enable(&mut self) {
        if !self.enabled {
            log::debug!("Engine enabled");
        }
        self.enabled = true;
    }

    /// Drop any pending key and pass every event through until [`enable`](Self::enable)
    pub fn disable(&mut self) {
        if let Some(pending) = self.clear_pending() {
            log::debug!("'{}' dropped by disable", pending.input);
        }
        if self.enabled {
            log::debug!("Engine disabled");
        }
        self.enabled = false;
    }

    fn start_pending(&mut self, text: &str, now: Instant) {
        debug_assert!(self.state.is_idle());

        let substitute = self.mapping.get(text).unwrap_or(text).to_string();
        let delay = self.timeouts.delay_for(text);
        let timer = self.scheduler.schedule(now + delay);

        log::debug!("'{}' pending for {:?} ({})", text, delay, timer);
        self.state = PendingState::Pending(Pending {
            input: text.to_string(),
            substitute,
            started_at: now,
            delay,
            timer,
        });
    }

    fn clear_pending(&mut self) -> Option<Pending> {
        let pending = self.state.take()?;
        self.scheduler.cancel(pending.timer);
        Some(pending)
    }
}
