//! Deferred timers driven by frame time.
//!
//! A [`Timeline`] does not own a clock. The owner advances it once per frame
//! and handles the events it yields. Timers fire at their exact due instant,
//! so a handler that schedules a follow-up timer measures from that instant
//! rather than from the end of the frame.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct PendingTimer<E> {
    id: TimerId,
    due: Duration,
    event: E,
}

#[derive(Debug)]
pub struct Timeline<E> {
    now: Duration,
    next_id: u64,
    pending: Vec<PendingTimer<E>>,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Timeline<E> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Time elapsed since the timeline was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Arms a timer that yields `event` once `delay` has elapsed.
    pub fn schedule(&mut self, delay: Duration, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(PendingTimer {
            id,
            due: self.now + delay,
            event,
        });
        id
    }

    /// Cancels a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|t| t.id == id)
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pops the earliest timer due at or before `horizon`, moving `now` to
    /// its due instant. Ties fire in scheduling order.
    pub fn pop_due(&mut self, horizon: Duration) -> Option<E> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= horizon)
            .min_by_key(|(_, t)| (t.due, t.id))
            .map(|(i, _)| i)?;
        let timer = self.pending.swap_remove(index);
        self.now = self.now.max(timer.due);
        Some(timer.event)
    }

    /// Moves `now` forward to `horizon` once every due timer has been popped.
    pub fn settle_at(&mut self, horizon: Duration) {
        self.now = self.now.max(horizon);
    }
}
