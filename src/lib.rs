//! cubby - A minimal authenticated per-user file-storage service
//!
//! Users register and log in to obtain a bearer token, then list, upload,
//! download, and delete files in their own namespace. File state lives in
//! an embedded transactional key-value store (redb); the index record for a
//! user and the blobs it references are always mutated in the same commit.

pub mod auth;
pub mod cli;
pub mod http_server;
pub mod store;
