//! # Auth Errors
//!
//! Error types for the authentication module.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication errors
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Bad username or password (generic - don't leak whether the username
    /// exists)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Username already registered
    #[error("Username already taken")]
    UsernameTaken,

    /// Username fails validation
    #[error("Username must be 3 to 20 alphanumeric characters")]
    InvalidUsername,

    /// Password does not meet requirements
    #[error("Password does not meet requirements: {0}")]
    WeakPassword(String),

    /// Bearer token missing, malformed, or unknown
    #[error("Invalid access token")]
    InvalidToken,

    /// Password hashing failed
    #[error("Internal error: password hashing failed")]
    HashingFailed,

    /// A stored user or token record failed to deserialize
    #[error("Corrupt auth record: {0}")]
    CorruptRecord(String),

    /// Storage operation failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::InvalidUsername => 400,
            AuthError::WeakPassword(_) => 400,
            AuthError::InvalidCredentials => 401,
            AuthError::InvalidToken => 401,
            AuthError::UsernameTaken => 409,
            AuthError::HashingFailed => 500,
            AuthError::CorruptRecord(_) => 500,
            AuthError::Storage(_) => 500,
        }
    }

    /// Returns whether this error should be logged at warn level
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

impl From<redb::TransactionError> for AuthError {
    fn from(e: redb::TransactionError) -> Self {
        AuthError::Storage(e.to_string())
    }
}

impl From<redb::TableError> for AuthError {
    fn from(e: redb::TableError) -> Self {
        AuthError::Storage(e.to_string())
    }
}

impl From<redb::StorageError> for AuthError {
    fn from(e: redb::StorageError) -> Self {
        AuthError::Storage(e.to_string())
    }
}

impl From<redb::CommitError> for AuthError {
    fn from(e: redb::CommitError) -> Self {
        AuthError::Storage(e.to_string())
    }
}

impl From<redb::DatabaseError> for AuthError {
    fn from(e: redb::DatabaseError) -> Self {
        AuthError::Storage(e.to_string())
    }
}
