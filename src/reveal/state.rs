//! Renderer state types

use std::sync::Arc;
use std::time::Duration;

/// Renderer state for the text currently owned by a renderer instance
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RevealState {
    /// Nothing rendered yet
    #[default]
    Idle,

    /// Prefixes are being emitted on a fixed cadence
    Revealing {
        text: Arc<str>,
        /// Byte length of the revealed prefix, always on a `char` boundary
        shown: usize,
        /// Characters revealed per tick
        step: usize,
        delay: Duration,
        generation: u64,
    },

    /// Full text shown; terminal for this text
    Settled { text: Arc<str>, generation: u64 },

    /// Owner discarded the renderer; terminal for the instance
    Disposed,
}

impl RevealState {
    pub fn name(&self) -> &'static str {
        match self {
            RevealState::Idle => "idle",
            RevealState::Revealing { .. } => "revealing",
            RevealState::Settled { .. } => "settled",
            RevealState::Disposed => "disposed",
        }
    }

    /// The prefix currently on screen
    pub fn shown_text(&self) -> &str {
        match self {
            RevealState::Revealing { text, shown, .. } => text.get(..*shown).unwrap_or_default(),
            RevealState::Settled { text, .. } => text.as_ref(),
            RevealState::Idle | RevealState::Disposed => "",
        }
    }

    /// Generation of the render call that owns this state, if any
    pub fn generation(&self) -> Option<u64> {
        match self {
            RevealState::Revealing { generation, .. } | RevealState::Settled { generation, .. } => {
                Some(*generation)
            }
            RevealState::Idle | RevealState::Disposed => None,
        }
    }

    pub fn is_revealing(&self) -> bool {
        matches!(self, RevealState::Revealing { .. })
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, RevealState::Settled { .. })
    }

    pub fn is_disposed(&self) -> bool {
        matches!(self, RevealState::Disposed)
    }
}
