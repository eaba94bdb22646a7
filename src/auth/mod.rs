//! # Authentication Module
//!
//! User registration, login, and bearer-token resolution for cubby.
//!
//! Users and issued tokens live in their own redb database, separate from
//! the file store. Passwords are stored only as Argon2id hashes; tokens are
//! opaque 256-bit random values, stored at rest only as SHA-256 hashes.
//!
//! The file routes trust the `Uuid` this module resolves a token to; no
//! authorization happens below this layer.

mod crypto;
mod errors;
mod store;
mod token;
mod user;

pub use crypto::{generate_token, hash_password, hash_token, verify_password, PasswordPolicy};
pub use errors::{AuthError, AuthResult};
pub use store::AuthStore;
pub use token::TokenRecord;
pub use user::{validate_username, CredentialsRequest, User};
