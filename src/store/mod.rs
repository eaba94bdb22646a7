//! File storage subsystem for cubby
//!
//! The store holds the canonical persistent state of every user's files in a
//! single redb database with two tables:
//!
//! - `user_index`: user id → serialized [`UserIndex`] (one record per user)
//! - `blobs`: content id → raw file bytes (one record per stored file)
//!
//! Every operation runs inside exactly one redb transaction and commits the
//! index record and its referenced blob together, or not at all. redb gives
//! each transaction a snapshot of the database, so readers never observe a
//! half-applied put or delete.
//!
//! # Invariants Enforced
//!
//! - Every content id named by an index entry has a live blob while the
//!   entry exists; removing the entry removes the blob in the same commit
//! - No blob is referenced by more than one (user, file name) pair
//! - A corrupt index record is surfaced as an error, never read as "absent"
//! - Content ids are random, never content-derived, never reused

mod errors;
mod files;
mod record;

pub use errors::{FileStoreError, FileStoreResult};
pub use files::FileStore;
pub use record::{FileDescriptor, UserIndex};
