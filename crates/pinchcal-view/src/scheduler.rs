#![forbid(unsafe_code)]

//! Deterministic queue of scheduled continuations.
//!
//! The host drives time: [`Scheduler::pop_due`] hands back continuations whose
//! due instant is at or before `now`, earliest first. Nothing runs on its own
//! thread, so a continuation can never race an input handler.
//!
//! # Invariants
//!
//! 1. Continuations pop in `(due, scheduling order)` order.
//! 2. A cancelled continuation is never returned.
//! 3. `len()` counts only live (uncancelled, unpopped) continuations.
//!
//! # Failure Modes
//!
//! - Cancelling an unknown or already-fired id returns `false` and changes
//!   nothing.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use web_time::Instant;

/// Handle to a scheduled continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

struct Entry<T> {
    id: TimerId,
    due: Instant,
    payload: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed: BinaryHeap is a max-heap and we want the earliest due first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// A min-heap of continuations keyed by due instant.
pub struct Scheduler<T> {
    queue: BinaryHeap<Entry<T>>,
    cancelled: HashSet<TimerId>,
    next_id: u64,
}

impl<T> std::fmt::Debug for Scheduler<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("live", &self.len())
            .field("next_due", &self.next_due())
            .finish()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            cancelled: HashSet::new(),
            next_id: 0,
        }
    }

    /// Schedule `payload` to become due at `due`.
    pub fn schedule(&mut self, due: Instant, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.queue.push(Entry { id, due, payload });
        id
    }

    /// Cancel a pending continuation. Returns whether it was pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let pending = self
            .queue
            .iter()
            .any(|e| e.id == id && !self.cancelled.contains(&id));
        if pending {
            self.cancelled.insert(id);
        }
        pending
    }

    /// Due instant of the earliest live continuation.
    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        self.queue
            .iter()
            .filter(|e| !self.cancelled.contains(&e.id))
            .map(|e| e.due)
            .min()
    }

    /// Remove and return the earliest continuation due at or before `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<(TimerId, Instant, T)> {
        loop {
            let (id, due) = self.queue.peek().map(|e| (e.id, e.due))?;
            if self.cancelled.remove(&id) {
                self.queue.pop();
                continue;
            }
            if due > now {
                return None;
            }
            let entry = self.queue.pop()?;
            return Some((entry.id, entry.due, entry.payload));
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue
            .iter()
            .filter(|e| !self.cancelled.contains(&e.id))
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
