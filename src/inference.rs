//! Inference collaborator
//!
//! Turns the latest user message plus the prior turns into reply text.

mod canned;
mod error;
mod http;

pub use canned::CannedResponder;
pub use error::{InferenceError, InferenceErrorKind, USER_NOTICE};
pub use http::HttpInferenceClient;

use crate::chat::{Message, Sender};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// One prior turn of the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    pub role: Sender,
    pub content: String,
}

impl From<&Message> for Turn {
    fn from(message: &Message) -> Self {
        Self {
            role: message.sender(),
            content: message.text().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InferenceRequest {
    pub message: String,
    pub history: Vec<Turn>,
}

impl InferenceRequest {
    pub fn new(message: impl Into<String>, history: Vec<Turn>) -> Self {
        Self {
            message: message.into(),
            history,
        }
    }
}

/// Client for reply generation
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn respond(&self, request: &InferenceRequest) -> Result<String, InferenceError>;

    /// Name used in logs
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: InferenceClient + ?Sized> InferenceClient for Arc<T> {
    async fn respond(&self, request: &InferenceRequest) -> Result<String, InferenceError> {
        (**self).respond(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Logging wrapper for inference clients
pub struct LoggingClient {
    inner: Arc<dyn InferenceClient>,
    name: String,
}

impl LoggingClient {
    pub fn new(inner: Arc<dyn InferenceClient>) -> Self {
        let name = inner.name().to_string();
        Self { inner, name }
    }
}

#[async_trait]
impl InferenceClient for LoggingClient {
    async fn respond(&self, request: &InferenceRequest) -> Result<String, InferenceError> {
        let start = std::time::Instant::now();
        let result = self.inner.respond(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    client = %self.name,
                    duration_ms = %duration.as_millis(),
                    history = request.history.len(),
                    reply_chars = reply.chars().count(),
                    "Inference request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    client = %self.name,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    retryable = e.is_retryable(),
                    "Inference request failed"
                );
            }
        }

        result
    }

    fn name(&self) -> &str {
        &self.name
    }
}
