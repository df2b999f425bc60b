use crate::error::{Result, ScribeError};
use crate::storage::filters::{ChatFilter, MessageFilter, StorageStats};
use crate::storage::traits::Storage;
use crate::types::{ChatMessage, ChatMessageId, MessageId, Session, SessionId, TranscriptMessage};
use redb::{
    Database, MultimapTableDefinition, ReadableMultimapTable, ReadableTable, TableDefinition,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// Table definitions
const SESSIONS: TableDefinition<&[u8; 16], &[u8]> = TableDefinition::new("sessions");
const MESSAGES: TableDefinition<&[u8; 16], &[u8]> = TableDefinition::new("messages");
const CHAT: TableDefinition<&[u8; 16], &[u8]> = TableDefinition::new("chat");

// Secondary indexes: session id -> owned record ids
const MESSAGES_BY_SESSION: MultimapTableDefinition<&[u8; 16], &[u8; 16]> =
    MultimapTableDefinition::new("messages_by_session");
const CHAT_BY_SESSION: MultimapTableDefinition<&[u8; 16], &[u8; 16]> =
    MultimapTableDefinition::new("chat_by_session");

// Metadata table
const META: TableDefinition<&str, &[u8]> = TableDefinition::new("meta");

/// Current schema version.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;
const SCHEMA_VERSION_KEY: &str = "schema_version";

/// Redb-based storage implementation
pub struct RedbStorage {
    db: Arc<Database>,
    path: PathBuf,
}

impl RedbStorage {
    /// Open or create a database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ScribeError::Validation(format!("Failed to create directory: {}", e))
            })?;
        }

        let is_new = !path.exists();
        let db = Database::create(&path)?;

        if is_new {
            // New database: initialize all tables and write schema version
            let write_txn = db.begin_write()?;
            {
                let _ = write_txn.open_table(SESSIONS)?;
                let _ = write_txn.open_table(MESSAGES)?;
                let _ = write_txn.open_table(CHAT)?;
                let _ = write_txn.open_multimap_table(MESSAGES_BY_SESSION)?;
                let _ = write_txn.open_multimap_table(CHAT_BY_SESSION)?;
                let mut meta = write_txn.open_table(META)?;
                meta.insert(
                    SCHEMA_VERSION_KEY,
                    CURRENT_SCHEMA_VERSION.to_string().as_bytes(),
                )?;
            }
            write_txn.commit()?;
        } else {
            // Existing database: check schema version, then ensure tables exist
            Self::check_schema_version(&db)?;
            let write_txn = db.begin_write()?;
            {
                let _ = write_txn.open_table(SESSIONS)?;
                let _ = write_txn.open_table(MESSAGES)?;
                let _ = write_txn.open_table(CHAT)?;
                let _ = write_txn.open_multimap_table(MESSAGES_BY_SESSION)?;
                let _ = write_txn.open_multimap_table(CHAT_BY_SESSION)?;
                let _ = write_txn.open_table(META)?;
            }
            write_txn.commit()?;
        }

        Ok(Self {
            db: Arc::new(db),
            path,
        })
    }

    /// Check schema version. Returns error if migration is needed.
    fn check_schema_version(db: &Database) -> Result<()> {
        let read_txn = db.begin_read()?;
        let version = {
            let table = read_txn.open_table(META).ok();
            table
                .and_then(|t| {
                    t.get(SCHEMA_VERSION_KEY).ok().flatten().and_then(|v| {
                        std::str::from_utf8(v.value())
                            .ok()
                            .and_then(|s| s.parse::<u32>().ok())
                    })
                })
                .unwrap_or(CURRENT_SCHEMA_VERSION)
        };

        match version.cmp(&CURRENT_SCHEMA_VERSION) {
            std::cmp::Ordering::Equal => Ok(()),
            std::cmp::Ordering::Less => Err(ScribeError::Validation(format!(
                "Database schema v{} is older than current v{}. Migration required.",
                version, CURRENT_SCHEMA_VERSION
            ))),
            std::cmp::Ordering::Greater => Err(ScribeError::Validation(format!(
                "Database schema v{} is newer than this binary v{}. Upgrade scribe.",
                version, CURRENT_SCHEMA_VERSION
            ))),
        }
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Helper to convert UUID to byte array
    fn uuid_to_bytes(id: &uuid::Uuid) -> [u8; 16] {
        *id.as_bytes()
    }

    fn serialize_session(session: &Session) -> Result<Vec<u8>> {
        bincode::serialize(session).map_err(ScribeError::from)
    }

    fn deserialize_session(bytes: &[u8]) -> Result<Session> {
        bincode::deserialize(bytes).map_err(ScribeError::from)
    }

    fn serialize_message(message: &TranscriptMessage) -> Result<Vec<u8>> {
        bincode::serialize(message).map_err(ScribeError::from)
    }

    fn deserialize_message(bytes: &[u8]) -> Result<TranscriptMessage> {
        bincode::deserialize(bytes).map_err(ScribeError::from)
    }

    fn serialize_chat(message: &ChatMessage) -> Result<Vec<u8>> {
        bincode::serialize(message).map_err(ScribeError::from)
    }

    fn deserialize_chat(bytes: &[u8]) -> Result<ChatMessage> {
        bincode::deserialize(bytes).map_err(ScribeError::from)
    }

    fn message_matches_filter(message: &TranscriptMessage, filter: &MessageFilter) -> bool {
        if message.session_id != filter.session_id {
            return false;
        }
        if let Some(is_final) = filter.is_final {
            if message.is_final != is_final {
                return false;
            }
        }
        if let Some(after) = filter.after {
            if message.timestamp < after {
                return false;
            }
        }
        true
    }

    /// Fetch every message owned by the filter's session that matches,
    /// unsorted and unpaged.
    fn collect_messages(&self, filter: &MessageFilter) -> Result<Vec<TranscriptMessage>> {
        let read_txn = self.db.begin_read()?;
        let messages_table = read_txn.open_table(MESSAGES)?;
        let index = read_txn.open_multimap_table(MESSAGES_BY_SESSION)?;

        let session_bytes = Self::uuid_to_bytes(&filter.session_id);
        let message_ids: Vec<[u8; 16]> = index
            .get(&session_bytes)?
            .map(|r| r.map(|g| *g.value()))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut messages = Vec::new();
        for id_bytes in &message_ids {
            if let Some(bytes) = messages_table.get(id_bytes)? {
                let message = Self::deserialize_message(bytes.value())?;
                if Self::message_matches_filter(&message, filter) {
                    messages.push(message);
                }
            }
        }
        Ok(messages)
    }
}

impl Storage for RedbStorage {
    fn put_session(&self, session: &Session) -> Result<()> {
        let session_bytes = Self::serialize_session(session)?;
        let id_bytes = Self::uuid_to_bytes(&session.id);

        let write_txn = self.db.begin_write()?;
        {
            let mut sessions_table = write_txn.open_table(SESSIONS)?;
            sessions_table.insert(&id_bytes, session_bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn get_session(&self, id: SessionId) -> Result<Option<Session>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SESSIONS)?;
        let id_bytes = Self::uuid_to_bytes(&id);

        if let Some(bytes) = table.get(&id_bytes)? {
            Ok(Some(Self::deserialize_session(bytes.value())?))
        } else {
            Ok(None)
        }
    }

    fn list_sessions(&self) -> Result<Vec<Session>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SESSIONS)?;

        let mut sessions = Vec::new();
        for item in table.iter()? {
            let (_, value) = item?;
            sessions.push(Self::deserialize_session(value.value())?);
        }

        // Newest first
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    fn delete_session(&self, id: SessionId) -> Result<()> {
        let id_bytes = Self::uuid_to_bytes(&id);
        let write_txn = self.db.begin_write()?;

        {
            let mut sessions_table = write_txn.open_table(SESSIONS)?;
            if sessions_table.remove(&id_bytes)?.is_none() {
                return Err(ScribeError::SessionNotFound(id));
            }
        }

        // Cascade: transcript messages owned by the session
        let message_ids: Vec<[u8; 16]> = {
            let mut index = write_txn.open_multimap_table(MESSAGES_BY_SESSION)?;
            let ids = index
                .remove_all(&id_bytes)?
                .map(|r| r.map(|g| *g.value()))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            ids
        };
        {
            let mut messages_table = write_txn.open_table(MESSAGES)?;
            for message_id in &message_ids {
                messages_table.remove(message_id)?;
            }
        }

        // Cascade: chat history owned by the session
        let chat_ids: Vec<[u8; 16]> = {
            let mut index = write_txn.open_multimap_table(CHAT_BY_SESSION)?;
            let ids = index
                .remove_all(&id_bytes)?
                .map(|r| r.map(|g| *g.value()))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            ids
        };
        {
            let mut chat_table = write_txn.open_table(CHAT)?;
            for chat_id in &chat_ids {
                chat_table.remove(chat_id)?;
            }
        }

        write_txn.commit()?;
        Ok(())
    }

    fn put_message(&self, message: &TranscriptMessage) -> Result<()> {
        let message_bytes = Self::serialize_message(message)?;
        let id_bytes = Self::uuid_to_bytes(&message.id);
        let session_bytes = Self::uuid_to_bytes(&message.session_id);

        let write_txn = self.db.begin_write()?;
        {
            let mut messages_table = write_txn.open_table(MESSAGES)?;
            messages_table.insert(&id_bytes, message_bytes.as_slice())?;
        }
        {
            let mut index = write_txn.open_multimap_table(MESSAGES_BY_SESSION)?;
            index.insert(&session_bytes, &id_bytes)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn get_message(&self, id: MessageId) -> Result<Option<TranscriptMessage>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MESSAGES)?;
        let id_bytes = Self::uuid_to_bytes(&id);

        if let Some(bytes) = table.get(&id_bytes)? {
            Ok(Some(Self::deserialize_message(bytes.value())?))
        } else {
            Ok(None)
        }
    }

    fn list_messages(&self, filter: MessageFilter) -> Result<Vec<TranscriptMessage>> {
        let mut messages = self.collect_messages(&filter)?;

        // Newest first
        messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Ok(messages
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .collect())
    }

    fn count_messages(&self, filter: MessageFilter) -> Result<u64> {
        Ok(self.collect_messages(&filter)?.len() as u64)
    }

    fn put_chat_message(&self, message: &ChatMessage) -> Result<()> {
        let chat_bytes = Self::serialize_chat(message)?;
        let id_bytes = Self::uuid_to_bytes(&message.id);
        let session_bytes = Self::uuid_to_bytes(&message.session_id);

        let write_txn = self.db.begin_write()?;
        {
            let mut chat_table = write_txn.open_table(CHAT)?;
            chat_table.insert(&id_bytes, chat_bytes.as_slice())?;
        }
        {
            let mut index = write_txn.open_multimap_table(CHAT_BY_SESSION)?;
            index.insert(&session_bytes, &id_bytes)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn get_chat_message(&self, id: ChatMessageId) -> Result<Option<ChatMessage>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CHAT)?;
        let id_bytes = Self::uuid_to_bytes(&id);

        if let Some(bytes) = table.get(&id_bytes)? {
            Ok(Some(Self::deserialize_chat(bytes.value())?))
        } else {
            Ok(None)
        }
    }

    fn list_chat_messages(&self, filter: ChatFilter) -> Result<Vec<ChatMessage>> {
        let read_txn = self.db.begin_read()?;
        let chat_table = read_txn.open_table(CHAT)?;
        let index = read_txn.open_multimap_table(CHAT_BY_SESSION)?;

        let session_bytes = Self::uuid_to_bytes(&filter.session_id);
        let chat_ids: Vec<[u8; 16]> = index
            .get(&session_bytes)?
            .map(|r| r.map(|g| *g.value()))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut messages = Vec::new();
        for id_bytes in &chat_ids {
            if let Some(bytes) = chat_table.get(id_bytes)? {
                messages.push(Self::deserialize_chat(bytes.value())?);
            }
        }

        // Newest first
        messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Ok(messages
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .collect())
    }

    fn put_metadata(&self, key: &str, value: &[u8]) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut meta_table = write_txn.open_table(META)?;
            meta_table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn get_metadata(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let meta_table = read_txn.open_table(META)?;

        match meta_table.get(key)? {
            Some(value) => Ok(Some(value.value().to_vec())),
            None => Ok(None),
        }
    }

    fn compact(&self) -> Result<()> {
        // redb handles compaction automatically
        // This is a no-op but kept for API compatibility
        Ok(())
    }

    fn stats(&self) -> Result<StorageStats> {
        let read_txn = self.db.begin_read()?;
        let sessions_table = read_txn.open_table(SESSIONS)?;
        let messages_table = read_txn.open_table(MESSAGES)?;
        let chat_table = read_txn.open_table(CHAT)?;

        let mut session_count = 0u64;
        let mut sessions_by_status = HashMap::new();
        for item in sessions_table.iter()? {
            let (_, value) = item?;
            let session = Self::deserialize_session(value.value())?;
            session_count += 1;
            *sessions_by_status.entry(session.status).or_insert(0) += 1;
        }

        let mut message_count = 0u64;
        let mut final_message_count = 0u64;
        for item in messages_table.iter()? {
            let (_, value) = item?;
            let message = Self::deserialize_message(value.value())?;
            message_count += 1;
            if message.is_final {
                final_message_count += 1;
            }
        }

        let chat_count = chat_table.iter()?.count() as u64;

        let db_size_bytes = std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0);

        Ok(StorageStats {
            session_count,
            message_count,
            chat_count,
            final_message_count,
            interim_message_count: message_count - final_message_count,
            sessions_by_status,
            db_size_bytes,
        })
    }

    fn snapshot(&self, path: &Path) -> Result<()> {
        std::fs::copy(&self.path, path)
            .map_err(|e| ScribeError::Validation(format!("Failed to create snapshot: {}", e)))?;
        Ok(())
    }
}
