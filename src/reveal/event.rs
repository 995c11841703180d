//! Events driving the renderer

use crate::scheduler::Tick;
use std::sync::Arc;
use std::time::Duration;

/// Events that trigger renderer transitions
#[derive(Debug, Clone)]
pub enum RevealEvent {
    /// Start (or restart) revealing `text`
    Render {
        text: Arc<str>,
        speed: Duration,
        generation: u64,
    },

    /// A scheduled tick fired
    Tick(Tick),

    /// The owning view discarded the renderer
    Dispose,
}
