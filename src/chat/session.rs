//! Chat session: the ordered message list of one consultation

use super::message::{Message, RenderState, Sender};
use super::{truncate_chars, ChatError};
use crate::mood::{classify, MoodTag};
use crate::store::{ChatDocument, MessageRecord, StoreError, StoredChat};
use chrono::{DateTime, Utc};

/// Opening line of every new consultation
pub const GREETING: &str = "Hello, I am your personal healthcare companion. \
Please describe your symptoms, and I will try to help.";

pub const DEFAULT_TITLE: &str = "New consultation";

/// Preview shown before the user has said anything
pub const EMPTY_PREVIEW: &str = "Start a new health conversation...";

/// Maximum preview length in characters
pub const PREVIEW_CHARS: usize = 100;

const TITLE_WORDS: usize = 6;
const TITLE_CHARS: usize = 48;

/// Append-only message list owned by one user
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: String,
    owner: String,
    title: String,
    messages: Vec<Message>,
    created_at: DateTime<Utc>,
}

impl ChatSession {
    /// Start a consultation with the assistant greeting already shown
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner: owner.into(),
            title: DEFAULT_TITLE.to_string(),
            messages: vec![Message::new(
                Sender::Assistant,
                GREETING.to_string(),
                RenderState::Settled,
            )],
            created_at: Utc::now(),
        }
    }

    /// Rebuild a session from a validated stored document
    pub fn from_stored(stored: StoredChat) -> Result<Self, StoreError> {
        stored.document.validate()?;

        let messages = stored
            .document
            .messages
            .into_iter()
            .map(|record| Message::restore(record.id, record.sender, record.text, record.created_at))
            .collect();

        Ok(Self {
            id: stored.id,
            owner: stored.owner,
            title: stored.document.title,
            messages,
            created_at: stored.created_at,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn message(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id() == id)
    }

    /// Append a user message. User messages are settled on arrival.
    pub fn push_user(&mut self, text: &str) -> Result<&Message, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        if self.title == DEFAULT_TITLE && !self.messages.iter().any(Message::is_user) {
            self.title = title_from(text);
        }

        self.messages.push(Message::new(
            Sender::User,
            text.to_string(),
            RenderState::Settled,
        ));
        Ok(self.last())
    }

    /// Append an assistant reply waiting for a renderer
    pub fn push_reply(&mut self, text: impl Into<String>) -> Result<&Message, ChatError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        self.messages
            .push(Message::new(Sender::Assistant, text, RenderState::Pending));
        Ok(self.last())
    }

    /// Hand a pending reply to a renderer. Only one renderer may own it.
    pub fn start_reveal(&mut self, id: &str) -> Result<(), ChatError> {
        self.transition_message(id, RenderState::Pending, RenderState::Revealing)
    }

    /// Take a reply back from a renderer that stopped before the end, so
    /// another one can reveal it.
    pub fn abandon_reveal(&mut self, id: &str) -> Result<(), ChatError> {
        self.transition_message(id, RenderState::Revealing, RenderState::Pending)
    }

    /// Record that the renderer finished. Happens exactly once per reply.
    pub fn settle(&mut self, id: &str) -> Result<(), ChatError> {
        self.transition_message(id, RenderState::Revealing, RenderState::Settled)
    }

    pub fn latest_user_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.is_user())
            .map(Message::text)
    }

    /// The trailing user message when no reply follows it yet
    pub fn unanswered_user_text(&self) -> Option<&str> {
        self.messages
            .last()
            .filter(|m| m.is_user())
            .map(Message::text)
    }

    /// Short preview derived from the latest user message
    pub fn preview(&self) -> String {
        self.latest_user_text()
            .map_or_else(|| EMPTY_PREVIEW.to_string(), |text| truncate_chars(text, PREVIEW_CHARS))
    }

    /// Mood of the latest user message
    pub fn mood(&self) -> MoodTag {
        self.latest_user_text().map_or(MoodTag::Neutral, classify)
    }

    /// Document handed to the persistence collaborator
    pub fn to_document(&self) -> ChatDocument {
        ChatDocument {
            title: self.title.clone(),
            preview: self.preview(),
            messages: self
                .messages
                .iter()
                .map(|m| MessageRecord {
                    id: m.id().to_string(),
                    sender: m.sender(),
                    text: m.text().to_string(),
                    created_at: m.created_at(),
                })
                .collect(),
        }
    }

    fn last(&self) -> &Message {
        // Only called right after a push
        &self.messages[self.messages.len() - 1]
    }

    fn transition_message(
        &mut self,
        id: &str,
        from: RenderState,
        to: RenderState,
    ) -> Result<(), ChatError> {
        let message = self
            .messages
            .iter_mut()
            .find(|m| m.id() == id)
            .ok_or_else(|| ChatError::MessageNotFound(id.to_string()))?;

        if message.render_state() != from {
            return Err(ChatError::InvalidRenderState {
                id: id.to_string(),
                expected: from,
                actual: message.render_state(),
            });
        }
        message.set_render_state(to);
        Ok(())
    }
}

/// Title from the first few words of the opening user message
fn title_from(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().take(TITLE_WORDS).collect();
    let title = truncate_chars(&words.join(" "), TITLE_CHARS);

    let mut chars = title.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => DEFAULT_TITLE.to_string(),
    }
}
