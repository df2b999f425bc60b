pub mod api;
pub mod context;
pub mod engine;
pub mod error;
pub mod storage;
pub mod types;

pub use api::{ChatExchange, Scribe, ScribeOptions};
pub use context::{select_context, ContextQuery, DEFAULT_WINDOW_MINUTES};
pub use engine::{answer, Answer, Intent};
pub use error::{Result, ScribeError};
pub use storage::{
    ChatFilter, MessageFilter, RedbStorage, Storage, StorageStats, CURRENT_SCHEMA_VERSION,
    DEFAULT_CHAT_LIMIT, DEFAULT_MESSAGE_LIMIT, MAX_CHAT_LIMIT, MAX_MESSAGE_LIMIT,
};
pub use types::*;
