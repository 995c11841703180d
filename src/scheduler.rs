//! Cancellable tick scheduling
//!
//! The reveal renderer never sleeps or spawns timers itself. It asks a
//! [`Scheduler`] for a tick and keeps the returned handle, so a restart or a
//! disposal can cancel exactly the timer it owns.

mod delay_queue;
mod manual;

pub use delay_queue::DelayQueueScheduler;
pub use manual::{ManualScheduler, TimerId};

use std::time::Duration;

/// A scheduled reveal step, tagged with the render generation that asked for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tick {
    pub generation: u64,
}

/// Owner of cancellable timers
pub trait Scheduler {
    /// Handle returned by [`Scheduler::schedule`], consumed by [`Scheduler::cancel`]
    type Handle;

    /// Arrange for `tick` to be delivered after `delay`
    fn schedule(&mut self, delay: Duration, tick: Tick) -> Self::Handle;

    /// Cancel a pending timer. Cancelling a timer that already fired is a no-op.
    fn cancel(&mut self, handle: Self::Handle);
}
