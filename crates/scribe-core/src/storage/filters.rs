use crate::types::{SessionId, SessionStatus};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Default page size for transcript message queries.
pub const DEFAULT_MESSAGE_LIMIT: usize = 100;
/// Hard cap on transcript message page size.
pub const MAX_MESSAGE_LIMIT: usize = 1000;
/// Default page size for chat history queries.
pub const DEFAULT_CHAT_LIMIT: usize = 50;
/// Hard cap on chat history page size.
pub const MAX_CHAT_LIMIT: usize = 100;

/// Filter criteria for querying transcript messages.
/// Results are always newest first.
#[derive(Debug, Clone)]
pub struct MessageFilter {
    pub session_id: SessionId,
    pub is_final: Option<bool>,
    /// Only messages with `timestamp >= after`.
    pub after: Option<DateTime<Utc>>,
    pub limit: usize,
    pub offset: usize,
}

impl MessageFilter {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            is_final: None,
            after: None,
            limit: DEFAULT_MESSAGE_LIMIT,
            offset: 0,
        }
    }

    /// Restrict to final (or interim) messages.
    pub fn with_is_final(mut self, is_final: bool) -> Self {
        self.is_final = Some(is_final);
        self
    }

    /// Restrict to final messages.
    pub fn final_only(self) -> Self {
        self.with_is_final(true)
    }

    /// Restrict to messages transcribed at or after `time`.
    pub fn after(mut self, time: DateTime<Utc>) -> Self {
        self.after = Some(time);
        self
    }

    /// Page size, capped at [`MAX_MESSAGE_LIMIT`].
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.min(MAX_MESSAGE_LIMIT);
        self
    }

    /// Skip the first N results.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

/// Filter criteria for querying chat history.
/// Results are always newest first.
#[derive(Debug, Clone)]
pub struct ChatFilter {
    pub session_id: SessionId,
    pub limit: usize,
    pub offset: usize,
}

impl ChatFilter {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            limit: DEFAULT_CHAT_LIMIT,
            offset: 0,
        }
    }

    /// Page size, capped at [`MAX_CHAT_LIMIT`].
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.min(MAX_CHAT_LIMIT);
        self
    }

    /// Skip the first N results.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

/// Storage statistics
#[derive(Debug, Clone)]
pub struct StorageStats {
    pub session_count: u64,
    pub message_count: u64,
    pub chat_count: u64,
    pub final_message_count: u64,
    pub interim_message_count: u64,
    pub sessions_by_status: HashMap<SessionStatus, u64>,
    pub db_size_bytes: u64,
}
