//! Offline responder with keyword-selected answers

use super::{InferenceClient, InferenceError, InferenceRequest};
use async_trait::async_trait;

const HEADACHE_REPLY: &str = "Based on your symptoms, you may be experiencing a tension headache. \
This could be caused by stress, dehydration, or eye strain. I recommend drinking water, taking a \
short break from screens, and resting in a dark, quiet room. If the pain persists for more than \
24 hours or becomes severe, please consult a healthcare professional.";

const SORE_THROAT_REPLY: &str = "It sounds like you may have a sore throat, possibly due to a \
viral infection like a cold. I suggest drinking warm liquids, gargling with salt water, and \
resting your voice. If you develop a fever over 101°F or the pain is severe, please seek medical \
advice.";

const NEED_DETAIL_REPLY: &str = "I need more specific information about your symptoms to provide \
accurate advice. Could you please provide more details about what you are experiencing?";

/// Answers from a fixed table; never fails
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedResponder;

impl CannedResponder {
    pub fn new() -> Self {
        Self
    }

    pub fn reply_for(message: &str) -> &'static str {
        let lowered = message.to_lowercase();
        if lowered.contains("headache") {
            HEADACHE_REPLY
        } else if lowered.contains("sore throat") {
            SORE_THROAT_REPLY
        } else {
            NEED_DETAIL_REPLY
        }
    }
}

#[async_trait]
impl InferenceClient for CannedResponder {
    async fn respond(&self, request: &InferenceRequest) -> Result<String, InferenceError> {
        Ok(Self::reply_for(&request.message).to_string())
    }

    fn name(&self) -> &str {
        "canned"
    }
}
