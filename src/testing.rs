//! Mock implementations for testing
//!
//! In-memory storage and a scripted inference client.

use crate::inference::{InferenceClient, InferenceError, InferenceRequest};
use crate::store::{
    ChatDocument, ChatStore, ChatSummary, CheckInRecord, StoreError, StoreResult, StoredChat,
    WellnessStore,
};
use crate::wellness::{CheckIn, EmergencyProfile, JournalEntry};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

// ============================================================================
// Mock Inference
// ============================================================================

/// Inference client that returns queued replies
pub struct MockInference {
    replies: Mutex<VecDeque<Result<String, InferenceError>>>,
    requests: Mutex<Vec<InferenceRequest>>,
}

impl MockInference {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_reply(&self, reply: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(reply.into()));
    }

    pub fn queue_error(&self, error: InferenceError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    /// Recorded requests, oldest first
    pub fn requests(&self) -> Vec<InferenceRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockInference {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceClient for MockInference {
    async fn respond(&self, request: &InferenceRequest) -> Result<String, InferenceError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(InferenceError::network("No mock reply queued")))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ============================================================================
// In-Memory Storage
// ============================================================================

struct ChatRow {
    owner: String,
    document: ChatDocument,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    /// Write order, newest highest
    seq: u64,
}

#[derive(Default)]
struct Tables {
    chats: HashMap<String, ChatRow>,
    journal: Vec<(String, JournalEntry)>,
    checkins: Vec<(String, CheckInRecord)>,
    profiles: HashMap<String, EmergencyProfile>,
    seq: u64,
}

/// In-memory storage with write-failure injection
#[derive(Default)]
pub struct InMemoryStorage {
    tables: Mutex<Tables>,
    fail_writes: AtomicBool,
    chat_writes: Mutex<Vec<String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later write fail
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Chat writes in order, as `create:<id>` / `update:<id>`
    pub fn chat_writes(&self) -> Vec<String> {
        self.chat_writes.lock().unwrap().clone()
    }

    pub fn document(&self, id: &str) -> Option<ChatDocument> {
        self.tables
            .lock()
            .unwrap()
            .chats
            .get(id)
            .map(|row| row.document.clone())
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::LockPoisoned);
        }
        Ok(())
    }
}

#[async_trait]
impl ChatStore for InMemoryStorage {
    async fn create_chat(
        &self,
        owner: &str,
        id: &str,
        document: &ChatDocument,
    ) -> StoreResult<()> {
        self.check_writable()?;
        document.validate()?;

        let mut tables = self.tables.lock().unwrap();
        if tables.chats.contains_key(id) {
            return Err(StoreError::ChatExists(id.to_string()));
        }
        tables.seq += 1;
        let now = Utc::now();
        let row = ChatRow {
            owner: owner.to_string(),
            document: document.clone(),
            created_at: now,
            updated_at: now,
            seq: tables.seq,
        };
        tables.chats.insert(id.to_string(), row);
        self.chat_writes.lock().unwrap().push(format!("create:{id}"));
        Ok(())
    }

    async fn update_chat(&self, id: &str, document: &ChatDocument) -> StoreResult<()> {
        self.check_writable()?;
        document.validate()?;

        let mut tables = self.tables.lock().unwrap();
        tables.seq += 1;
        let seq = tables.seq;
        let row = tables
            .chats
            .get_mut(id)
            .ok_or_else(|| StoreError::ChatNotFound(id.to_string()))?;
        row.document = document.clone();
        row.updated_at = Utc::now();
        row.seq = seq;
        self.chat_writes.lock().unwrap().push(format!("update:{id}"));
        Ok(())
    }

    async fn load_chat(&self, id: &str) -> StoreResult<StoredChat> {
        let tables = self.tables.lock().unwrap();
        let row = tables
            .chats
            .get(id)
            .ok_or_else(|| StoreError::ChatNotFound(id.to_string()))?;
        Ok(StoredChat {
            id: id.to_string(),
            owner: row.owner.clone(),
            document: row.document.clone(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    async fn list_chats(&self, owner: &str) -> StoreResult<Vec<ChatSummary>> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<_> = tables
            .chats
            .iter()
            .filter(|(_, row)| row.owner == owner)
            .collect();
        rows.sort_by(|a, b| b.1.seq.cmp(&a.1.seq));

        Ok(rows
            .into_iter()
            .map(|(id, row)| ChatSummary {
                id: id.clone(),
                title: row.document.title.clone(),
                preview: row.document.preview.clone(),
                updated_at: row.updated_at,
            })
            .collect())
    }

    async fn delete_chat(&self, id: &str) -> StoreResult<()> {
        self.check_writable()?;
        self.tables
            .lock()
            .unwrap()
            .chats
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::ChatNotFound(id.to_string()))
    }
}

#[async_trait]
impl WellnessStore for InMemoryStorage {
    async fn add_journal_entry(&self, owner: &str, entry: &JournalEntry) -> StoreResult<()> {
        self.check_writable()?;
        self.tables
            .lock()
            .unwrap()
            .journal
            .push((owner.to_string(), entry.clone()));
        Ok(())
    }

    async fn journal_entries(&self, owner: &str) -> StoreResult<Vec<JournalEntry>> {
        let tables = self.tables.lock().unwrap();
        let mut entries: Vec<_> = tables
            .journal
            .iter()
            .rev()
            .filter(|(o, _)| o == owner)
            .map(|(_, entry)| entry.clone())
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    async fn record_checkin(
        &self,
        owner: &str,
        checkin: &CheckIn,
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        self.check_writable()?;
        self.tables.lock().unwrap().checkins.push((
            owner.to_string(),
            CheckInRecord {
                checkin: *checkin,
                recorded_at: at,
            },
        ));
        Ok(())
    }

    async fn checkins(&self, owner: &str) -> StoreResult<Vec<CheckInRecord>> {
        let tables = self.tables.lock().unwrap();
        let mut records: Vec<_> = tables
            .checkins
            .iter()
            .rev()
            .filter(|(o, _)| o == owner)
            .map(|(_, record)| record.clone())
            .collect();
        records.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(records)
    }

    async fn save_emergency_profile(
        &self,
        owner: &str,
        profile: &EmergencyProfile,
    ) -> StoreResult<()> {
        self.check_writable()?;
        self.tables
            .lock()
            .unwrap()
            .profiles
            .insert(owner.to_string(), profile.clone());
        Ok(())
    }

    async fn emergency_profile(&self, owner: &str) -> StoreResult<Option<EmergencyProfile>> {
        Ok(self.tables.lock().unwrap().profiles.get(owner).cloned())
    }
}
