//! Symptom checker: one consultation wired to inference and storage
//!
//! `submit` appends the user message and asks the inference collaborator for
//! a reply, which comes back pending. `reveal` hands it to a renderer and
//! `finish` settles it and persists the whole conversation. A reveal that
//! stops early gives the reply back as pending.

use crate::chat::{ChatError, ChatSession};
use crate::inference::{InferenceClient, InferenceError, InferenceRequest, Turn};
use crate::mood::MoodTag;
use crate::reveal::{Completion, RevealError, RevealHandle};
use crate::store::{ChatStore, StoreError, Storage};
use crate::wellness::WellnessError;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompanionError {
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error("{}", .0.user_notice())]
    Inference(#[source] InferenceError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Wellness(#[from] WellnessError),
    #[error(transparent)]
    Reveal(#[from] RevealError),
}

impl From<InferenceError> for CompanionError {
    fn from(e: InferenceError) -> Self {
        Self::Inference(e)
    }
}

impl CompanionError {
    /// Whether trying the same thing again may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Inference(e) => e.is_retryable(),
            Self::Store(StoreError::Sqlite(_) | StoreError::LockPoisoned) => true,
            _ => false,
        }
    }

    /// How long the inference collaborator asked us to wait, if it did
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Inference(e) => e.retry_after,
            _ => None,
        }
    }
}

/// A reply ready to be revealed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub message_id: String,
    pub text: String,
    /// Mood of the user message that prompted it
    pub mood: MoodTag,
}

pub struct SymptomChecker {
    session: ChatSession,
    storage: Arc<dyn Storage>,
    inference: Arc<dyn InferenceClient>,
    /// Whether the store already holds this chat
    persisted: bool,
}

impl SymptomChecker {
    pub(crate) fn new(
        session: ChatSession,
        storage: Arc<dyn Storage>,
        inference: Arc<dyn InferenceClient>,
        persisted: bool,
    ) -> Self {
        Self {
            session,
            storage,
            inference,
            persisted,
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn id(&self) -> &str {
        self.session.id()
    }

    /// Avatar mood for the conversation so far
    pub fn mood(&self) -> MoodTag {
        self.session.mood()
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Send a user message and fetch the reply.
    ///
    /// On inference failure the user message stays in the conversation and
    /// the error carries only the user notice. Sending the same text again
    /// while it is still unanswered asks again without a duplicate.
    pub async fn submit(&mut self, text: &str) -> Result<Reply, CompanionError> {
        if self.session.unanswered_user_text() != Some(text.trim()) {
            self.session.push_user(text)?;
        }
        self.ask().await
    }

    /// Ask again for the trailing unanswered user message
    pub async fn retry(&mut self) -> Result<Reply, CompanionError> {
        if self.session.unanswered_user_text().is_none() {
            return Err(ChatError::NothingToRetry.into());
        }
        self.ask().await
    }

    /// Request a reply to the last message, which must be from the user.
    /// The reply is appended as pending.
    async fn ask(&mut self) -> Result<Reply, CompanionError> {
        let (message, history) = match self.session.messages().split_last() {
            Some((last, earlier)) if last.is_user() => (
                last.text().to_string(),
                earlier.iter().map(Turn::from).collect::<Vec<_>>(),
            ),
            _ => return Err(ChatError::NothingToRetry.into()),
        };
        let mood = self.session.mood();

        tracing::info!(
            chat_id = %self.session.id(),
            mood = %mood,
            history = history.len(),
            "Symptom message submitted"
        );

        let request = InferenceRequest::new(message, history);
        let text = match self.inference.respond(&request).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    chat_id = %self.session.id(),
                    error = %e.message,
                    retryable = e.is_retryable(),
                    retry_after = ?e.retry_after,
                    "No reply for symptom message"
                );
                return Err(e.into());
            }
        };

        let message_id = self.session.push_reply(text.clone())?.id().to_string();

        Ok(Reply {
            message_id,
            text,
            mood,
        })
    }

    /// Mark a pending reply as owned by a renderer
    pub fn begin_reveal(&mut self, message_id: &str) -> Result<(), CompanionError> {
        self.session.start_reveal(message_id)?;
        Ok(())
    }

    /// Hand a reply back after its renderer stopped early
    pub fn abandon(&mut self, message_id: &str) -> Result<(), CompanionError> {
        self.session.abandon_reveal(message_id)?;
        tracing::debug!(chat_id = %self.session.id(), message_id, "Reveal abandoned");
        Ok(())
    }

    /// Start revealing a pending reply on `renderer`.
    ///
    /// If the renderer refuses, the reply stays pending.
    pub fn reveal(
        &mut self,
        renderer: &RevealHandle,
        message_id: &str,
        speed: Duration,
    ) -> Result<Completion, CompanionError> {
        let text = self
            .session
            .message(message_id)
            .ok_or_else(|| ChatError::MessageNotFound(message_id.to_string()))?
            .text()
            .to_string();
        self.begin_reveal(message_id)?;

        match renderer.render(text, speed) {
            Ok(completion) => Ok(completion),
            Err(e) => {
                self.abandon(message_id)?;
                Err(e.into())
            }
        }
    }

    /// Wait for a reveal started by [`Self::reveal`], then settle and save.
    ///
    /// A reveal that was superseded or disposed leaves the reply pending.
    pub async fn finish(
        &mut self,
        message_id: &str,
        completion: Completion,
    ) -> Result<(), CompanionError> {
        if let Err(e) = completion.wait().await {
            self.abandon(message_id)?;
            return Err(e.into());
        }
        self.settle(message_id).await
    }

    /// Mark a revealed reply as settled and save the conversation
    pub async fn settle(&mut self, message_id: &str) -> Result<(), CompanionError> {
        self.session.settle(message_id)?;
        self.persist().await
    }

    /// Write the full message sequence: create on first save, update after
    pub async fn persist(&mut self) -> Result<(), CompanionError> {
        let document = self.session.to_document();
        let id = self.session.id();

        if self.persisted {
            self.storage.update_chat(id, &document).await?;
        } else {
            self.storage
                .create_chat(self.session.owner(), id, &document)
                .await?;
            self.persisted = true;
        }

        tracing::debug!(chat_id = %id, messages = document.messages.len(), "Chat saved");
        Ok(())
    }
}
