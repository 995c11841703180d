//! Persistence boundary
//!
//! The document store is an external collaborator. This module fixes the
//! document shape it receives, validates documents coming back, and defines
//! the traits the rest of the crate talks to.

mod schema;
mod sqlite;

pub use sqlite::Database;

use crate::chat::{Sender, PREVIEW_CHARS};
use crate::wellness::{CheckIn, EmergencyProfile, JournalEntry};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Malformed document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    #[error("Chat not found: {0}")]
    ChatNotFound(String),
    #[error("Chat already exists: {0}")]
    ChatExists(String),
    #[error("Database lock poisoned")]
    LockPoisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One message as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    #[serde(default = "new_record_id")]
    pub id: String,
    pub sender: Sender,
    pub text: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Chat document: the full ordered message list plus list-view metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatDocument {
    pub title: String,
    pub preview: String,
    pub messages: Vec<MessageRecord>,
}

impl ChatDocument {
    /// Check the invariants every stored chat must satisfy
    pub fn validate(&self) -> StoreResult<()> {
        if self.title.trim().is_empty() {
            return Err(StoreError::InvalidDocument("empty title".to_string()));
        }
        if self.preview.chars().count() > PREVIEW_CHARS {
            return Err(StoreError::InvalidDocument(format!(
                "preview longer than {PREVIEW_CHARS} characters"
            )));
        }
        if let Some(pos) = self.messages.iter().position(|m| m.text.trim().is_empty()) {
            return Err(StoreError::InvalidDocument(format!(
                "message {pos} has no text"
            )));
        }
        Ok(())
    }
}

/// A chat as loaded back from the store
#[derive(Debug, Clone)]
pub struct StoredChat {
    pub id: String,
    pub owner: String,
    pub document: ChatDocument,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row of the chat history list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatSummary {
    pub id: String,
    pub title: String,
    pub preview: String,
    pub updated_at: DateTime<Utc>,
}

/// A check-in as recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInRecord {
    pub checkin: CheckIn,
    pub recorded_at: DateTime<Utc>,
}

/// Storage for chat documents
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Create a chat under `id`
    async fn create_chat(&self, owner: &str, id: &str, document: &ChatDocument)
        -> StoreResult<()>;

    /// Replace the document of an existing chat
    async fn update_chat(&self, id: &str, document: &ChatDocument) -> StoreResult<()>;

    async fn load_chat(&self, id: &str) -> StoreResult<StoredChat>;

    /// Chats of `owner`, most recently updated first
    async fn list_chats(&self, owner: &str) -> StoreResult<Vec<ChatSummary>>;

    async fn delete_chat(&self, id: &str) -> StoreResult<()>;
}

/// Storage for journal, check-ins and the emergency profile
#[async_trait]
pub trait WellnessStore: Send + Sync {
    async fn add_journal_entry(&self, owner: &str, entry: &JournalEntry) -> StoreResult<()>;

    /// Journal of `owner`, newest first
    async fn journal_entries(&self, owner: &str) -> StoreResult<Vec<JournalEntry>>;

    async fn record_checkin(
        &self,
        owner: &str,
        checkin: &CheckIn,
        at: DateTime<Utc>,
    ) -> StoreResult<()>;

    /// Check-ins of `owner`, newest first
    async fn checkins(&self, owner: &str) -> StoreResult<Vec<CheckInRecord>>;

    async fn save_emergency_profile(
        &self,
        owner: &str,
        profile: &EmergencyProfile,
    ) -> StoreResult<()>;

    async fn emergency_profile(&self, owner: &str) -> StoreResult<Option<EmergencyProfile>>;
}

/// Combined storage trait for convenience
pub trait Storage: ChatStore + WellnessStore {}
impl<T: ChatStore + WellnessStore> Storage for T {}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: ChatStore + ?Sized> ChatStore for Arc<T> {
    async fn create_chat(
        &self,
        owner: &str,
        id: &str,
        document: &ChatDocument,
    ) -> StoreResult<()> {
        (**self).create_chat(owner, id, document).await
    }

    async fn update_chat(&self, id: &str, document: &ChatDocument) -> StoreResult<()> {
        (**self).update_chat(id, document).await
    }

    async fn load_chat(&self, id: &str) -> StoreResult<StoredChat> {
        (**self).load_chat(id).await
    }

    async fn list_chats(&self, owner: &str) -> StoreResult<Vec<ChatSummary>> {
        (**self).list_chats(owner).await
    }

    async fn delete_chat(&self, id: &str) -> StoreResult<()> {
        (**self).delete_chat(id).await
    }
}

#[async_trait]
impl<T: WellnessStore + ?Sized> WellnessStore for Arc<T> {
    async fn add_journal_entry(&self, owner: &str, entry: &JournalEntry) -> StoreResult<()> {
        (**self).add_journal_entry(owner, entry).await
    }

    async fn journal_entries(&self, owner: &str) -> StoreResult<Vec<JournalEntry>> {
        (**self).journal_entries(owner).await
    }

    async fn record_checkin(
        &self,
        owner: &str,
        checkin: &CheckIn,
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        (**self).record_checkin(owner, checkin, at).await
    }

    async fn checkins(&self, owner: &str) -> StoreResult<Vec<CheckInRecord>> {
        (**self).checkins(owner).await
    }

    async fn save_emergency_profile(
        &self,
        owner: &str,
        profile: &EmergencyProfile,
    ) -> StoreResult<()> {
        (**self).save_emergency_profile(owner, profile).await
    }

    async fn emergency_profile(&self, owner: &str) -> StoreResult<Option<EmergencyProfile>> {
        (**self).emergency_profile(owner).await
    }
}
