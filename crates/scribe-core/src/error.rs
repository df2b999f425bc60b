use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, ScribeError>;

#[derive(Debug, Error)]
pub enum ScribeError {
    #[error("Storage error: {0}")]
    Storage(#[from] redb::Error),

    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Storage operation error: {0}")]
    StorageOperation(#[from] redb::StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Transcript message not found: {0}")]
    MessageNotFound(Uuid),

    #[error("Chat message not found: {0}")]
    ChatMessageNotFound(Uuid),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
