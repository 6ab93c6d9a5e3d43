// Holdaccent Timer Scheduling
// Register-at-deadline / cancel interface plus a deadline queue implementation

use std::fmt;
use std::time::Instant;

use smallvec::SmallVec;

/// Handle for a scheduled one-shot timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Host timer facility used by the substitution engine.
///
/// When a timer comes due the host reports it back through
/// `SubstitutionEngine::fire_timeout`, on the same thread that delivers
/// key events.
pub trait Scheduler {
    /// Register a one-shot timeout at an absolute deadline
    fn schedule(&mut self, deadline: Instant) -> TimerId;

    /// Cancel a timeout. Unknown, fired or already cancelled ids are ignored.
    fn cancel(&mut self, id: TimerId);
}

impl<S: Scheduler + ?Sized> Scheduler for Box<S> {
    fn schedule(&mut self, deadline: Instant) -> TimerId {
        (**self).schedule(deadline)
    }

    fn cancel(&mut self, id: TimerId) {
        (**self).cancel(id)
    }
}

/// In-process deadline queue.
///
/// The engine keeps at most one live timer, so the queue lives inline and
/// never allocates in practice.
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    timers: SmallVec<[(Instant, TimerId); 2]>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Check whether `id` is still waiting to fire
    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.iter().any(|(_, t)| *t == id)
    }

    /// Earliest live deadline, for computing poll timeouts
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().map(|(deadline, _)| *deadline).min()
    }

    /// Remove and return the earliest timer due at `now`
    pub fn pop_expired(&mut self, now: Instant) -> Option<TimerId> {
        let (index, _) = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, (deadline, _))| *deadline <= now)
            .min_by_key(|(_, (deadline, id))| (*deadline, *id))?;
        Some(self.timers.remove(index).1)
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, deadline: Instant) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.timers.push((deadline, id));
        log::trace!("Scheduled {} at {:?}", id, deadline);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.timers.retain(|(_, t)| *t != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_schedule_assigns_unique_ids() {
        let mut queue = TimerQueue::new();
        let now = Instant::now();
        let a = queue.schedule(now);
        let b = queue.schedule(now);
        assert_ne!(a, b);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_pop_expired_in_deadline_order() {
        let mut queue = TimerQueue::new();
        let now = Instant::now();
        let late = queue.schedule(now + Duration::from_millis(300));
        let early = queue.schedule(now + Duration::from_millis(100));

        assert_eq!(queue.next_deadline(), Some(now + Duration::from_millis(100)));
        assert_eq!(queue.pop_expired(now + Duration::from_millis(50)), None);
        assert_eq!(queue.pop_expired(now + Duration::from_millis(500)), Some(early));
        assert_eq!(queue.pop_expired(now + Duration::from_millis(500)), Some(late));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_deadline_is_inclusive() {
        let mut queue = TimerQueue::new();
        let now = Instant::now();
        let id = queue.schedule(now + Duration::from_millis(400));
        assert_eq!(queue.pop_expired(now + Duration::from_millis(400)), Some(id));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut queue = TimerQueue::new();
        let now = Instant::now();
        let id = queue.schedule(now);
        queue.cancel(id);
        queue.cancel(id);
        queue.cancel(TimerId::new(999));
        assert!(!queue.is_scheduled(id));
        assert_eq!(queue.next_deadline(), None);
    }

    #[test]
    fn test_boxed_scheduler_delegates() {
        let mut boxed: Box<dyn Scheduler> = Box::new(TimerQueue::new());
        let id = boxed.schedule(Instant::now());
        boxed.cancel(id);
    }
}
