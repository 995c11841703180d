//! Chat data model
//!
//! Messages are a tagged variant (`user` / `assistant`) with a fixed field
//! set. A session is append-only; deletion belongs to the store.

mod message;
mod session;

pub use message::{Message, RenderState, Sender};
pub use session::{ChatSession, DEFAULT_TITLE, EMPTY_PREVIEW, GREETING, PREVIEW_CHARS};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Message is empty")]
    EmptyMessage,
    #[error("No unanswered message to send again")]
    NothingToRetry,
    #[error("Message not found: {0}")]
    MessageNotFound(String),
    #[error("Message {id} is {actual:?}, expected {expected:?}")]
    InvalidRenderState {
        id: String,
        expected: RenderState,
        actual: RenderState,
    },
}

/// Cut `text` to at most `max` characters, marking the cut with "..."
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}
