use crate::error::Result;
use crate::storage::filters::{ChatFilter, MessageFilter, StorageStats};
use crate::types::{ChatMessage, ChatMessageId, MessageId, Session, SessionId, TranscriptMessage};
use std::path::Path;

/// Storage trait for the session store
pub trait Storage: Send + Sync {
    // === Session Operations ===

    /// Store a session (insert or update)
    fn put_session(&self, session: &Session) -> Result<()>;

    /// Retrieve a session by ID
    fn get_session(&self, id: SessionId) -> Result<Option<Session>>;

    /// List all sessions, newest first
    fn list_sessions(&self) -> Result<Vec<Session>>;

    /// Delete a session and every transcript and chat message it owns.
    /// The cascade runs in a single write transaction.
    fn delete_session(&self, id: SessionId) -> Result<()>;

    // === Transcript Messages ===

    /// Store a transcript message (insert or update)
    fn put_message(&self, message: &TranscriptMessage) -> Result<()>;

    /// Retrieve a transcript message by ID
    fn get_message(&self, id: MessageId) -> Result<Option<TranscriptMessage>>;

    /// List messages matching the filter, newest first
    fn list_messages(&self, filter: MessageFilter) -> Result<Vec<TranscriptMessage>>;

    /// Count messages matching the filter (limit/offset ignored)
    fn count_messages(&self, filter: MessageFilter) -> Result<u64>;

    // === Chat Messages ===

    /// Store a chat turn (insert or update)
    fn put_chat_message(&self, message: &ChatMessage) -> Result<()>;

    /// Retrieve a chat turn by ID
    fn get_chat_message(&self, id: ChatMessageId) -> Result<Option<ChatMessage>>;

    /// List chat turns matching the filter, newest first
    fn list_chat_messages(&self, filter: ChatFilter) -> Result<Vec<ChatMessage>>;

    // === Metadata ===

    /// Store metadata key-value pair
    fn put_metadata(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Retrieve metadata by key
    fn get_metadata(&self, key: &str) -> Result<Option<Vec<u8>>>;

    // === Maintenance ===

    /// Compact the database (redb does this automatically, but exposed for control)
    fn compact(&self) -> Result<()>;

    /// Get database statistics
    fn stats(&self) -> Result<StorageStats>;

    /// Create a file-level backup/snapshot
    fn snapshot(&self, path: &Path) -> Result<()>;
}
