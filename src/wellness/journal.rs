//! Mood journal entries

use super::WellnessError;
use crate::mood::{classify, MoodTag};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub content: String,
    /// Mood computed when the entry was written
    pub mood: MoodTag,
    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Compose an entry from free text. Blank text is rejected.
    pub fn compose(content: &str, now: DateTime<Utc>) -> Result<Self, WellnessError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(WellnessError::EmptyJournalEntry);
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.to_string(),
            mood: classify(content),
            created_at: now,
        })
    }

    /// Date as shown in the journal list, e.g. "May 2, 2025"
    pub fn display_date(&self) -> String {
        self.created_at.format("%b %-d, %Y").to_string()
    }
}
