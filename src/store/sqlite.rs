//! SQLite-backed store
//!
//! Chat documents are stored whole as JSON; journal entries, check-ins and
//! the emergency profile get their own tables.

use super::schema::SCHEMA;
use super::{
    ChatDocument, ChatStore, ChatSummary, CheckInRecord, StoreError, StoreResult, StoredChat,
    WellnessStore,
};
use crate::mood::MoodTag;
use crate::wellness::{CheckIn, EmergencyProfile, JournalEntry};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open an in-memory database
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    // ==================== Chat Operations ====================

    pub fn insert_chat(&self, owner: &str, id: &str, document: &ChatDocument) -> StoreResult<()> {
        document.validate()?;
        let json = serde_json::to_string(document)?;
        let now = timestamp(Utc::now());

        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO chats (id, owner, document, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![id, owner, json, now],
        )?;
        if inserted == 0 {
            return Err(StoreError::ChatExists(id.to_string()));
        }
        Ok(())
    }

    pub fn replace_chat(&self, id: &str, document: &ChatDocument) -> StoreResult<()> {
        document.validate()?;
        let json = serde_json::to_string(document)?;

        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE chats SET document = ?1, updated_at = ?2 WHERE id = ?3",
            params![json, timestamp(Utc::now()), id],
        )?;
        if updated == 0 {
            return Err(StoreError::ChatNotFound(id.to_string()));
        }
        Ok(())
    }

    pub fn get_chat(&self, id: &str) -> StoreResult<StoredChat> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT id, owner, document, created_at, updated_at FROM chats WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::ChatNotFound(id.to_string()),
                other => StoreError::Sqlite(other),
            })?;

        let (id, owner, json, created_at, updated_at) = row;
        let document: ChatDocument = serde_json::from_str(&json)?;
        document.validate()?;

        Ok(StoredChat {
            id,
            owner,
            document,
            created_at: parse_datetime(&created_at),
            updated_at: parse_datetime(&updated_at),
        })
    }

    pub fn chat_summaries(&self, owner: &str) -> StoreResult<Vec<ChatSummary>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, document, updated_at FROM chats
             WHERE owner = ?1
             ORDER BY updated_at DESC, rowid DESC",
        )?;

        let rows = stmt.query_map(params![owner], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            let (id, json, updated_at) = row?;
            let document: ChatDocument = serde_json::from_str(&json)?;
            summaries.push(ChatSummary {
                id,
                title: document.title,
                preview: document.preview,
                updated_at: parse_datetime(&updated_at),
            });
        }
        Ok(summaries)
    }

    pub fn remove_chat(&self, id: &str) -> StoreResult<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM chats WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(StoreError::ChatNotFound(id.to_string()));
        }
        Ok(())
    }

    // ==================== Wellness Operations ====================

    pub fn insert_journal_entry(&self, owner: &str, entry: &JournalEntry) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO journal_entries (id, owner, content, mood, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.id,
                owner,
                entry.content,
                entry.mood.as_str(),
                timestamp(entry.created_at)
            ],
        )?;
        Ok(())
    }

    pub fn get_journal_entries(&self, owner: &str) -> StoreResult<Vec<JournalEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, content, mood, created_at FROM journal_entries
             WHERE owner = ?1
             ORDER BY created_at DESC, rowid DESC",
        )?;

        let entries = stmt
            .query_map(params![owner], |row| {
                Ok(JournalEntry {
                    id: row.get(0)?,
                    content: row.get(1)?,
                    mood: MoodTag::parse(&row.get::<_, String>(2)?),
                    created_at: parse_datetime(&row.get::<_, String>(3)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn insert_checkin(
        &self,
        owner: &str,
        checkin: &CheckIn,
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO checkins (owner, physical, mental, recorded_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                owner,
                checkin.physical.get(),
                checkin.mental.get(),
                timestamp(at)
            ],
        )?;
        Ok(())
    }

    pub fn get_checkins(&self, owner: &str) -> StoreResult<Vec<CheckInRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT physical, mental, recorded_at FROM checkins
             WHERE owner = ?1
             ORDER BY recorded_at DESC, id DESC",
        )?;

        let rows = stmt
            .query_map(params![owner], |row| {
                Ok((
                    row.get::<_, u8>(0)?,
                    row.get::<_, u8>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(physical, mental, recorded_at)| {
                let checkin = CheckIn::new(physical, mental)
                    .map_err(|e| StoreError::InvalidDocument(e.to_string()))?;
                Ok(CheckInRecord {
                    checkin,
                    recorded_at: parse_datetime(&recorded_at),
                })
            })
            .collect()
    }

    pub fn upsert_emergency_profile(
        &self,
        owner: &str,
        profile: &EmergencyProfile,
    ) -> StoreResult<()> {
        let json = serde_json::to_string(profile)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO emergency_profiles (owner, profile, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(owner) DO UPDATE SET profile = excluded.profile, updated_at = excluded.updated_at",
            params![owner, json, timestamp(Utc::now())],
        )?;
        Ok(())
    }

    pub fn get_emergency_profile(&self, owner: &str) -> StoreResult<Option<EmergencyProfile>> {
        let conn = self.conn()?;
        let json: Option<String> = conn
            .query_row(
                "SELECT profile FROM emergency_profiles WHERE owner = ?1",
                params![owner],
                |row| row.get(0),
            )
            .optional()?;

        json.map(|json| serde_json::from_str(&json).map_err(StoreError::from))
            .transpose()
    }
}

#[async_trait]
impl ChatStore for Database {
    async fn create_chat(
        &self,
        owner: &str,
        id: &str,
        document: &ChatDocument,
    ) -> StoreResult<()> {
        self.insert_chat(owner, id, document)
    }

    async fn update_chat(&self, id: &str, document: &ChatDocument) -> StoreResult<()> {
        self.replace_chat(id, document)
    }

    async fn load_chat(&self, id: &str) -> StoreResult<StoredChat> {
        self.get_chat(id)
    }

    async fn list_chats(&self, owner: &str) -> StoreResult<Vec<ChatSummary>> {
        self.chat_summaries(owner)
    }

    async fn delete_chat(&self, id: &str) -> StoreResult<()> {
        self.remove_chat(id)
    }
}

#[async_trait]
impl WellnessStore for Database {
    async fn add_journal_entry(&self, owner: &str, entry: &JournalEntry) -> StoreResult<()> {
        self.insert_journal_entry(owner, entry)
    }

    async fn journal_entries(&self, owner: &str) -> StoreResult<Vec<JournalEntry>> {
        self.get_journal_entries(owner)
    }

    async fn record_checkin(
        &self,
        owner: &str,
        checkin: &CheckIn,
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        self.insert_checkin(owner, checkin, at)
    }

    async fn checkins(&self, owner: &str) -> StoreResult<Vec<CheckInRecord>> {
        self.get_checkins(owner)
    }

    async fn save_emergency_profile(
        &self,
        owner: &str,
        profile: &EmergencyProfile,
    ) -> StoreResult<()> {
        self.upsert_emergency_profile(owner, profile)
    }

    async fn emergency_profile(&self, owner: &str) -> StoreResult<Option<EmergencyProfile>> {
        self.get_emergency_profile(owner)
    }
}

/// Fixed-width so that text ordering matches time ordering
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}
