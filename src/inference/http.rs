//! HTTP inference client
//!
//! POSTs `{"message", "history"}` as JSON and expects `{"response"}` back.

use super::{InferenceClient, InferenceError, InferenceErrorKind, InferenceRequest};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct InferenceReply {
    response: String,
}

pub struct HttpInferenceClient {
    client: Client,
    endpoint: String,
}

impl HttpInferenceClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InferenceError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn classify_error(status: StatusCode, body: &str) -> InferenceError {
    let err = InferenceError::from_status(status.as_u16(), format!("HTTP {status}: {body}"));
    match retry_after(body) {
        Some(delay) if err.kind == InferenceErrorKind::RateLimit => err.with_retry_after(delay),
        _ => err,
    }
}

fn retry_after(body: &str) -> Option<Duration> {
    let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
    let seconds = parsed
        .get("error")
        .and_then(|e| e.get("retry_after"))
        .and_then(serde_json::Value::as_f64)?;
    Duration::try_from_secs_f64(seconds).ok()
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    async fn respond(&self, request: &InferenceRequest) -> Result<String, InferenceError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    InferenceError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    InferenceError::network(format!("Connection failed: {e}"))
                } else {
                    InferenceError::unknown(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| InferenceError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(classify_error(status, &body));
        }

        let reply: InferenceReply = serde_json::from_str(&body).map_err(|e| {
            InferenceError::unknown(format!("Failed to parse response: {e} - body: {body}"))
        })?;

        if reply.response.trim().is_empty() {
            return Err(InferenceError::unknown("Empty response"));
        }
        Ok(reply.response)
    }

    fn name(&self) -> &str {
        &self.endpoint
    }
}
