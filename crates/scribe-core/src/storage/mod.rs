mod filters;
mod redb_storage;
mod traits;

#[cfg(test)]
mod tests;

pub use filters::{
    ChatFilter, MessageFilter, StorageStats, DEFAULT_CHAT_LIMIT, DEFAULT_MESSAGE_LIMIT,
    MAX_CHAT_LIMIT, MAX_MESSAGE_LIMIT,
};
pub use redb_storage::{RedbStorage, CURRENT_SCHEMA_VERSION};
pub use traits::Storage;
