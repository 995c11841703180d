//! Inference error types

use std::time::Duration;
use thiserror::Error;

/// What the user sees when the inference collaborator fails
pub const USER_NOTICE: &str =
    "I'm having trouble reaching my medical knowledge right now. Please try again in a moment.";

const UNREACHABLE: &str = "I'm having trouble reaching my medical knowledge right now.";

/// Inference failure. `message` is for logs only.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct InferenceError {
    pub kind: InferenceErrorKind,
    pub message: String,
    /// Wait requested by the collaborator before asking again
    pub retry_after: Option<Duration>,
}

impl InferenceError {
    pub fn new(kind: InferenceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retry_after: None,
        }
    }

    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        Self::new(InferenceErrorKind::from_status(status), message)
    }

    pub fn with_retry_after(mut self, duration: Duration) -> Self {
        self.retry_after = Some(duration);
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(InferenceErrorKind::Network, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(InferenceErrorKind::Unknown, message)
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// Notice for the user. Only the requested wait is passed on; details
    /// stay in the logs.
    pub fn user_notice(&self) -> String {
        match self.retry_after {
            Some(delay) => {
                let seconds = (delay.as_secs() + u64::from(delay.subsec_nanos() > 0)).max(1);
                let unit = if seconds == 1 { "second" } else { "seconds" };
                format!("{UNREACHABLE} Please try again in {seconds} {unit}.")
            }
            None => USER_NOTICE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceErrorKind {
    /// Timeouts, refused connections, broken bodies
    Network,
    /// 429
    RateLimit,
    /// 5xx
    ServerError,
    /// 401, 403
    Auth,
    /// 400
    InvalidRequest,
    Unknown,
}

impl InferenceErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Auth,
            429 => Self::RateLimit,
            400 => Self::InvalidRequest,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Network | Self::RateLimit | Self::ServerError)
    }
}
