//! `TimerQueue` — time-ordered queue of pending continuations.
//!
//! # Why this exists
//!
//! Everything in the station that "waits N seconds, then does X" (spawn
//! intervals, Poisson inter-arrival gaps, alighting bursts, boarding delays)
//! is an entry here.  The simulation drains the due entries once per step,
//! before agents move.
//!
//! There is no cancellation.  An entry whose subject is gone (agent
//! destroyed, state changed) is simply skipped by whoever drains it.
//!
//! `BTreeMap` keeps deadlines ordered; entries sharing a deadline fire in
//! insertion order.

use std::collections::BTreeMap;

use ped_core::SimTime;

pub struct TimerQueue<T> {
    inner: BTreeMap<SimTime, Vec<T>>,
    /// Cached total entry count for O(1) `len()`.
    total: usize,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self { inner: BTreeMap::new(), total: 0 }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `item` to fire at `at`.
    pub fn push(&mut self, at: SimTime, item: T) {
        self.inner.entry(at).or_default().push(item);
        self.total += 1;
    }

    /// Remove and return every entry due at or before `now`, earliest first.
    pub fn drain_due(&mut self, now: SimTime) -> Vec<T> {
        let mut due = Vec::new();
        while let Some(entry) = self.inner.first_entry() {
            if *entry.key() > now {
                break;
            }
            due.extend(entry.remove());
        }
        self.total -= due.len();
        due
    }

    /// The earliest pending deadline, or `None` if empty.
    pub fn next_deadline(&self) -> Option<SimTime> {
        self.inner.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct pending deadlines.
    pub fn deadline_count(&self) -> usize {
        self.inner.len()
    }

    /// Iterate over pending entries in deadline order without removing them.
    pub fn iter(&self) -> impl Iterator<Item = (SimTime, &T)> + '_ {
        self.inner.iter().flat_map(|(&t, items)| items.iter().map(move |i| (t, i)))
    }
}
