//! # Auth Store
//!
//! redb-backed storage for users and issued tokens. The database handle is
//! opened once at startup and lives for the whole process; each operation
//! takes one transaction.

use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};
use uuid::Uuid;

use super::crypto::{generate_token, hash_password, hash_token, verify_password, PasswordPolicy};
use super::errors::{AuthError, AuthResult};
use super::token::TokenRecord;
use super::user::{validate_username, User};

/// username → serialized `User`
const USERS_TABLE: TableDefinition<&str, Vec<u8>> = TableDefinition::new("users");

/// SHA-256 token hash → serialized `TokenRecord`
const TOKENS_TABLE: TableDefinition<&str, Vec<u8>> = TableDefinition::new("tokens");

/// User and token storage backed by redb.
pub struct AuthStore {
    db: Database,
    password_policy: PasswordPolicy,
}

impl AuthStore {
    /// Open (or create) the auth database and ensure both tables exist.
    pub fn open(path: impl AsRef<Path>) -> AuthResult<Self> {
        Self::open_with_policy(path, PasswordPolicy::default())
    }

    /// Open with a custom password policy.
    pub fn open_with_policy(path: impl AsRef<Path>, policy: PasswordPolicy) -> AuthResult<Self> {
        let db = Database::create(path)?;

        let txn = db.begin_write()?;
        {
            txn.open_table(USERS_TABLE)?;
            txn.open_table(TOKENS_TABLE)?;
        }
        txn.commit()?;

        Ok(Self {
            db,
            password_policy: policy,
        })
    }

    /// Register a new user.
    ///
    /// Validates the username (3-20 alphanumeric characters) and password
    /// policy, rejects taken usernames, and persists the record with the
    /// password stored only as an Argon2id hash. Check-and-insert runs in
    /// one write transaction, so two concurrent registrations of the same
    /// name cannot both succeed.
    pub fn register(&self, username: &str, password: &str) -> AuthResult<User> {
        validate_username(username)?;
        self.password_policy.validate(password)?;

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: hash_password(password)?,
        };

        let txn = self.db.begin_write()?;
        {
            let mut users = txn.open_table(USERS_TABLE)?;

            if users.get(username)?.is_some() {
                return Err(AuthError::UsernameTaken);
            }

            let encoded =
                serde_json::to_vec(&user).map_err(|e| AuthError::Storage(e.to_string()))?;
            users.insert(username, encoded)?;
        }
        txn.commit()?;

        Ok(user)
    }

    /// Log a user in, issuing a fresh access token.
    ///
    /// Unknown usernames and wrong passwords both fail with
    /// `InvalidCredentials`. On success the raw token is returned to the
    /// caller and only its hash is persisted.
    pub fn login(&self, username: &str, password: &str) -> AuthResult<String> {
        let txn = self.db.begin_write()?;
        let token = {
            let users = txn.open_table(USERS_TABLE)?;

            let user = {
                let raw = users.get(username)?.ok_or(AuthError::InvalidCredentials)?;
                decode_user(&raw.value())?
            };

            if !verify_password(password, &user.password_hash)? {
                return Err(AuthError::InvalidCredentials);
            }

            let token = generate_token();
            let record = TokenRecord::new(user.id);
            let encoded =
                serde_json::to_vec(&record).map_err(|e| AuthError::Storage(e.to_string()))?;

            let mut tokens = txn.open_table(TOKENS_TABLE)?;
            let token_key = hash_token(&token);
            tokens.insert(token_key.as_str(), encoded)?;

            token
        };
        txn.commit()?;

        Ok(token)
    }

    /// Resolve an access token to the user id it authenticates.
    pub fn validate_token(&self, token: &str) -> AuthResult<Uuid> {
        if token.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let txn = self.db.begin_read()?;
        let tokens = txn.open_table(TOKENS_TABLE)?;

        let token_key = hash_token(token);
        let raw = tokens
            .get(token_key.as_str())?
            .ok_or(AuthError::InvalidToken)?;

        let record: TokenRecord = serde_json::from_slice(&raw.value())
            .map_err(|e| AuthError::CorruptRecord(e.to_string()))?;

        Ok(record.user_id)
    }

    /// Look up a user record by username.
    pub fn find_user(&self, username: &str) -> AuthResult<Option<User>> {
        let txn = self.db.begin_read()?;
        let users = txn.open_table(USERS_TABLE)?;

        match users.get(username)? {
            None => Ok(None),
            Some(raw) => Ok(Some(decode_user(&raw.value())?)),
        }
    }
}

fn decode_user(raw: &[u8]) -> AuthResult<User> {
    serde_json::from_slice(raw).map_err(|e| AuthError::CorruptRecord(e.to_string()))
}
