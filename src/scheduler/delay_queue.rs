//! Tokio-backed scheduler built on [`DelayQueue`]

use super::{Scheduler, Tick};
use futures::StreamExt;
use std::time::Duration;
use tokio_util::time::delay_queue::{Expired, Key};
use tokio_util::time::DelayQueue;

/// Scheduler whose timers live in a tokio [`DelayQueue`].
///
/// Must be created and polled inside a tokio runtime.
#[derive(Debug, Default)]
pub struct DelayQueueScheduler {
    queue: DelayQueue<Tick>,
}

impl DelayQueueScheduler {
    pub fn new() -> Self {
        Self {
            queue: DelayQueue::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Wait for the next expired tick.
    ///
    /// Resolves to `None` immediately when nothing is scheduled, so callers
    /// inside `select!` should guard the branch with a `Some(..)` pattern.
    pub async fn next_expired(&mut self) -> Option<Tick> {
        self.queue.next().await.map(Expired::into_inner)
    }
}

impl Scheduler for DelayQueueScheduler {
    type Handle = Key;

    fn schedule(&mut self, delay: Duration, tick: Tick) -> Key {
        self.queue.insert(tick, delay)
    }

    fn cancel(&mut self, handle: Key) {
        // Already-expired keys are gone from the queue; ignore them.
        let _ = self.queue.try_remove(&handle);
    }
}
