//! Effects produced by renderer transitions

use crate::scheduler::Tick;
use std::sync::Arc;
use std::time::Duration;

/// A prefix of a source text, cut on a `char` boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix {
    text: Arc<str>,
    len: usize,
}

impl Prefix {
    pub(crate) fn new(text: Arc<str>, len: usize) -> Self {
        let len = len.min(text.len());
        Self { text, len }
    }

    pub fn as_str(&self) -> &str {
        self.text.get(..self.len).unwrap_or_default()
    }

    /// Byte length of the prefix
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether this prefix is the whole source text
    pub fn is_complete(&self) -> bool {
        self.len == self.text.len()
    }
}

/// Effects to be executed after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealEffect {
    /// Cancel the pending tick, if any
    CancelTick,

    /// Ask the scheduler for the next tick
    ScheduleTick { delay: Duration, tick: Tick },

    /// Show a new prefix
    Emit(Prefix),

    /// Fire the completion callback of `generation`
    Complete { generation: u64 },
}
