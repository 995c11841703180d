//! Virtual-clock scheduler
//!
//! Time only moves when the owner calls [`ManualScheduler::pop_due`] or
//! [`ManualScheduler::set_now`]. Frame-driven shells advance it once per
//! frame; tests advance it explicitly and get fully deterministic ticks.

use super::{Scheduler, Tick};
use std::time::Duration;

/// Identifier of a timer held by a [`ManualScheduler`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    due: Duration,
    tick: Tick,
}

#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    timers: Vec<Timer>,
    cancelled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time, measured from creation
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of timers waiting to fire
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Number of timers cancelled before firing
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }

    /// Earliest deadline among pending timers
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.iter().map(|t| t.due).min()
    }

    /// Remove and return the earliest timer due at or before `until`.
    ///
    /// The clock moves forward to that timer's deadline. Timers with equal
    /// deadlines fire in scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<Tick> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.id))
            .map(|(idx, _)| idx)?;

        let timer = self.timers.swap_remove(idx);
        self.now = self.now.max(timer.due);
        Some(timer.tick)
    }

    /// Move the clock forward without firing anything. The clock never runs
    /// backwards.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

impl Scheduler for ManualScheduler {
    type Handle = TimerId;

    fn schedule(&mut self, delay: Duration, tick: Tick) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due: self.now + delay,
            tick,
        });
        id
    }

    fn cancel(&mut self, handle: TimerId) {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != handle);
        if self.timers.len() < before {
            self.cancelled += 1;
        }
    }
}
