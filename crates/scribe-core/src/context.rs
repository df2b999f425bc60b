//! Context selection for chat requests.
//!
//! The answer engine works on whatever bounded set of transcript messages
//! the caller hands it; this module is that caller-side selection. Two
//! modes match the request surface: a trailing time window over final
//! messages, or an explicit id list.

use crate::error::Result;
use crate::storage::{MessageFilter, Storage, MAX_MESSAGE_LIMIT};
use crate::types::{MessageId, SessionId, TranscriptMessage};
use chrono::{Duration, Utc};

/// Default trailing window, in minutes.
pub const DEFAULT_WINDOW_MINUTES: i64 = 5;

/// How a chat request picks its context.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextQuery {
    /// Final messages from the last `minutes`, newest first.
    Recent { minutes: i64 },

    /// The session's messages restricted to these ids, in storage order
    /// (newest first).
    Explicit { ids: Vec<MessageId> },
}

impl Default for ContextQuery {
    fn default() -> Self {
        ContextQuery::Recent {
            minutes: DEFAULT_WINDOW_MINUTES,
        }
    }
}

/// Resolve a context query against storage.
///
/// The returned order is what the engine will see; note that newest-first
/// order feeds the timing strategy's positional first/last reading.
pub fn select_context<S: Storage + ?Sized>(
    storage: &S,
    session_id: SessionId,
    query: &ContextQuery,
) -> Result<Vec<TranscriptMessage>> {
    match query {
        ContextQuery::Recent { minutes } => {
            let cutoff = Utc::now() - Duration::minutes(*minutes);
            storage.list_messages(MessageFilter::new(session_id).final_only().after(cutoff))
        }
        ContextQuery::Explicit { ids } => {
            let messages = storage
                .list_messages(MessageFilter::new(session_id).with_limit(MAX_MESSAGE_LIMIT))?;
            Ok(messages
                .into_iter()
                .filter(|m| ids.contains(&m.id))
                .collect())
        }
    }
}
