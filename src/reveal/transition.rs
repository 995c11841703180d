//! Pure renderer transition function
//!
//! Given the same state and event this always yields the same new state and
//! effects. Timers, callbacks and output happen in the executor.

use super::effect::{Prefix, RevealEffect};
use super::event::RevealEvent;
use super::state::RevealState;
use crate::scheduler::Tick;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Delays below this reveal several characters per tick
pub const BATCH_THRESHOLD: Duration = Duration::from_millis(3);

/// Characters per tick below [`BATCH_THRESHOLD`]
pub const BATCH_SIZE: usize = 3;

/// Result of a renderer transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: RevealState,
    pub effects: Vec<RevealEffect>,
}

impl TransitionResult {
    pub fn new(state: RevealState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: RevealEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = RevealEffect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors surfaced by the renderer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevealError {
    #[error("Renderer has been disposed")]
    Disposed,
    #[error("Reveal was restarted or disposed before it settled")]
    Superseded,
}

/// Characters revealed per tick for a given inter-tick delay
pub fn step_for(speed: Duration) -> usize {
    if speed < BATCH_THRESHOLD {
        BATCH_SIZE
    } else {
        1
    }
}

/// Byte offset `step` characters past `from`, clamped to the end of `text`
pub(crate) fn advance_boundary(text: &str, from: usize, step: usize) -> usize {
    text.get(from..)
        .and_then(|rest| rest.char_indices().nth(step).map(|(idx, _)| from + idx))
        .unwrap_or(text.len())
}

pub fn transition(
    state: &RevealState,
    event: RevealEvent,
) -> Result<TransitionResult, RevealError> {
    match (state, event) {
        // ============================================================
        // Disposal
        // ============================================================
        (RevealState::Disposed, RevealEvent::Render { .. }) => Err(RevealError::Disposed),

        (RevealState::Disposed, RevealEvent::Tick(_) | RevealEvent::Dispose) => {
            Ok(TransitionResult::new(RevealState::Disposed))
        }

        (_, RevealEvent::Dispose) => {
            Ok(TransitionResult::new(RevealState::Disposed).with_effect(RevealEffect::CancelTick))
        }

        // ============================================================
        // Render / restart
        // ============================================================
        (_, RevealEvent::Render {
            text,
            speed,
            generation,
        }) => {
            let reset = [
                RevealEffect::CancelTick,
                RevealEffect::Emit(Prefix::new(text.clone(), 0)),
            ];

            if text.is_empty() {
                return Ok(TransitionResult::new(RevealState::Settled { text, generation })
                    .with_effects(reset)
                    .with_effect(RevealEffect::Complete { generation }));
            }

            Ok(TransitionResult::new(RevealState::Revealing {
                text,
                shown: 0,
                step: step_for(speed),
                delay: speed,
                generation,
            })
            .with_effects(reset)
            .with_effect(RevealEffect::ScheduleTick {
                delay: speed,
                tick: Tick { generation },
            }))
        }

        // ============================================================
        // Ticks
        // ============================================================
        (
            RevealState::Revealing {
                text,
                shown,
                step,
                delay,
                generation,
            },
            RevealEvent::Tick(tick),
        ) if tick.generation == *generation => {
            let next = advance_boundary(text, *shown, *step);
            let prefix = Prefix::new(Arc::clone(text), next);

            if prefix.is_complete() {
                Ok(TransitionResult::new(RevealState::Settled {
                    text: Arc::clone(text),
                    generation: *generation,
                })
                .with_effect(RevealEffect::Emit(prefix))
                .with_effect(RevealEffect::Complete {
                    generation: *generation,
                }))
            } else {
                Ok(TransitionResult::new(RevealState::Revealing {
                    text: Arc::clone(text),
                    shown: next,
                    step: *step,
                    delay: *delay,
                    generation: *generation,
                })
                .with_effect(RevealEffect::Emit(prefix))
                .with_effect(RevealEffect::ScheduleTick {
                    delay: *delay,
                    tick,
                }))
            }
        }

        // Stale generation, or a tick after settling: nothing to do
        (state, RevealEvent::Tick(_)) => Ok(TransitionResult::new(state.clone())),
    }
}
