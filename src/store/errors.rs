//! # File Store Errors
//!
//! Error types for the file storage core.
//!
//! The store returns every failure as a typed result; nothing is logged or
//! swallowed internally. Callers map these to user-facing responses.

use thiserror::Error;
use uuid::Uuid;

/// Result type for file store operations
pub type FileStoreResult<T> = Result<T, FileStoreError>;

/// File storage errors
#[derive(Debug, Clone, Error)]
pub enum FileStoreError {
    /// No file with the requested name. Deliberately identical for "unknown
    /// user" and "unknown file" so callers cannot probe user existence.
    #[error("File not found")]
    NotFound,

    /// A stored index record failed to deserialize. Fatal for the operation:
    /// treating this as "absent" would orphan the blobs the record names.
    #[error("Corrupt index record for user {user_id}: {reason}")]
    CorruptIndex { user_id: Uuid, reason: String },

    /// Underlying engine/transaction failure. The transaction rolls back
    /// fully; prior state is untouched.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl FileStoreError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            FileStoreError::NotFound => 404,
            FileStoreError::CorruptIndex { .. } => 500,
            FileStoreError::Storage(_) => 500,
        }
    }

    /// Returns whether this error should be logged at warn level
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

impl From<redb::TransactionError> for FileStoreError {
    fn from(e: redb::TransactionError) -> Self {
        FileStoreError::Storage(e.to_string())
    }
}

impl From<redb::TableError> for FileStoreError {
    fn from(e: redb::TableError) -> Self {
        FileStoreError::Storage(e.to_string())
    }
}

impl From<redb::StorageError> for FileStoreError {
    fn from(e: redb::StorageError) -> Self {
        FileStoreError::Storage(e.to_string())
    }
}

impl From<redb::CommitError> for FileStoreError {
    fn from(e: redb::CommitError) -> Self {
        FileStoreError::Storage(e.to_string())
    }
}

impl From<redb::DatabaseError> for FileStoreError {
    fn from(e: redb::DatabaseError) -> Self {
        FileStoreError::Storage(e.to_string())
    }
}
