//! Signed-in user context
//!
//! A [`UserSession`] is created at sign-in and consumed at sign-out. Every
//! view is constructed from it, so nothing reads the current user from a
//! global.

use crate::chat::ChatSession;
use crate::companion::{CompanionError, SymptomChecker};
use crate::inference::InferenceClient;
use crate::store::{ChatStore, ChatSummary, StoreError, Storage, WellnessStore};
use crate::wellness::{CheckIn, EmergencyProfile, JournalEntry};
use chrono::Utc;
use std::sync::Arc;

/// Who is signed in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub uid: String,
    pub display_name: Option<String>,
    pub anonymous: bool,
}

impl UserIdentity {
    pub fn named(uid: impl Into<String>) -> Self {
        let uid = uid.into();
        Self {
            display_name: Some(uid.clone()),
            uid,
            anonymous: false,
        }
    }

    /// Demo identity with a fresh uid
    pub fn anonymous() -> Self {
        Self {
            uid: format!("anon-{}", uuid::Uuid::new_v4()),
            display_name: None,
            anonymous: true,
        }
    }

    pub fn greeting_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or("Guest")
    }
}

pub struct UserSession {
    identity: UserIdentity,
    storage: Arc<dyn Storage>,
    inference: Arc<dyn InferenceClient>,
}

impl UserSession {
    pub fn sign_in(
        identity: UserIdentity,
        storage: Arc<dyn Storage>,
        inference: Arc<dyn InferenceClient>,
    ) -> Self {
        tracing::info!(
            uid = %identity.uid,
            anonymous = identity.anonymous,
            inference = %inference.name(),
            "Signed in"
        );
        Self {
            identity,
            storage,
            inference,
        }
    }

    pub fn identity(&self) -> &UserIdentity {
        &self.identity
    }

    pub fn uid(&self) -> &str {
        &self.identity.uid
    }

    // ==================== Consultations ====================

    /// Start a new consultation. Nothing is stored until the first reply settles.
    pub fn new_consultation(&self) -> SymptomChecker {
        SymptomChecker::new(
            ChatSession::new(self.uid()),
            Arc::clone(&self.storage),
            Arc::clone(&self.inference),
            false,
        )
    }

    /// Reopen a stored consultation of this user
    pub async fn resume_consultation(&self, id: &str) -> Result<SymptomChecker, CompanionError> {
        let stored = self.storage.load_chat(id).await?;
        if stored.owner != self.identity.uid {
            return Err(StoreError::ChatNotFound(id.to_string()).into());
        }
        let session = ChatSession::from_stored(stored)?;
        Ok(SymptomChecker::new(
            session,
            Arc::clone(&self.storage),
            Arc::clone(&self.inference),
            true,
        ))
    }

    /// History list, most recent first
    pub async fn consultations(&self) -> Result<Vec<ChatSummary>, CompanionError> {
        Ok(self.storage.list_chats(self.uid()).await?)
    }

    pub async fn delete_consultation(&self, id: &str) -> Result<(), CompanionError> {
        let stored = self.storage.load_chat(id).await?;
        if stored.owner != self.identity.uid {
            return Err(StoreError::ChatNotFound(id.to_string()).into());
        }
        self.storage.delete_chat(id).await?;
        tracing::info!(uid = %self.uid(), chat_id = %id, "Consultation deleted");
        Ok(())
    }

    // ==================== Wellness ====================

    pub async fn write_journal(&self, content: &str) -> Result<JournalEntry, CompanionError> {
        let entry = JournalEntry::compose(content, Utc::now())?;
        self.storage.add_journal_entry(self.uid(), &entry).await?;
        tracing::info!(uid = %self.uid(), mood = %entry.mood, "Journal entry saved");
        Ok(entry)
    }

    /// Journal entries, newest first
    pub async fn journal(&self) -> Result<Vec<JournalEntry>, CompanionError> {
        Ok(self.storage.journal_entries(self.uid()).await?)
    }

    /// Validate and store a check-in
    pub async fn record_checkin(&self, physical: u8, mental: u8) -> Result<CheckIn, CompanionError> {
        let checkin = CheckIn::new(physical, mental)?;
        self.storage
            .record_checkin(self.uid(), &checkin, Utc::now())
            .await?;
        tracing::info!(
            uid = %self.uid(),
            physical,
            mental,
            mood = %checkin.mood(),
            "Check-in recorded"
        );
        Ok(checkin)
    }

    pub async fn save_emergency_profile(
        &self,
        profile: EmergencyProfile,
    ) -> Result<EmergencyProfile, CompanionError> {
        let profile = profile.normalized();
        self.storage
            .save_emergency_profile(self.uid(), &profile)
            .await?;
        Ok(profile)
    }

    /// Saved profile, or an empty one
    pub async fn emergency_profile(&self) -> Result<EmergencyProfile, CompanionError> {
        Ok(self
            .storage
            .emergency_profile(self.uid())
            .await?
            .unwrap_or_default())
    }

    pub fn sign_out(self) {
        tracing::info!(uid = %self.identity.uid, "Signed out");
    }
}
