//! # User Records
//!
//! User model and username validation. Stored records are keyed by username
//! in the `users` table; the id generated at registration is the stable key
//! the file store is scoped by.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use uuid::Uuid;

use super::errors::{AuthError, AuthResult};

/// Stored user record.
///
/// The password hash is part of the persisted record but must never reach
/// an HTTP response; response types are built separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier, generated once at registration
    pub id: Uuid,

    /// Login name (unique, 3-20 alphanumeric characters)
    pub username: String,

    /// Argon2id password hash (never plaintext)
    pub password_hash: String,
}

/// Signup/login request body
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

fn username_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("^[A-Za-z0-9]{3,20}$").expect("valid regex"))
}

/// Validate a username: 3 to 20 alphanumeric characters.
pub fn validate_username(username: &str) -> AuthResult<()> {
    if username_pattern().is_match(username) {
        Ok(())
    } else {
        Err(AuthError::InvalidUsername)
    }
}
