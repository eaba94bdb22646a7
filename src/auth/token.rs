//! # Token Records
//!
//! Issued access tokens, stored in the `tokens` table keyed by the SHA-256
//! hash of the raw token. The raw token leaves the process exactly once, in
//! the login response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored record for one issued access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRecord {
    /// User this token authenticates
    pub user_id: Uuid,

    /// When the token was issued. No TTL is enforced here; the field exists
    /// so a lifecycle layer can add one.
    pub created_at: DateTime<Utc>,
}

impl TokenRecord {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_record_round_trip() {
        let record = TokenRecord::new(Uuid::new_v4());

        let json = serde_json::to_vec(&record).unwrap();
        let back: TokenRecord = serde_json::from_slice(&json).unwrap();

        assert_eq!(back.user_id, record.user_id);
        assert_eq!(back.created_at, record.created_at);
    }
}
