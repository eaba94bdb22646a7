//! Index record types
//!
//! A user's files are tracked by a single [`UserIndex`] record keyed by the
//! user id: a mapping from file name to [`FileDescriptor`]. Records are
//! stored as self-describing JSON so every descriptor field survives a
//! save/load cycle unchanged.
//!
//! Decoding failure is a [`FileStoreError::CorruptIndex`], never "absent":
//! an index record that cannot be read still owns blob records, and reading
//! it as empty would orphan them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::{FileStoreError, FileStoreResult};

/// Metadata for one stored file, owned by exactly one index entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Blob table key. Random, allocated once per logical file and kept
    /// across content updates; never derived from name or content.
    pub content_id: Uuid,

    /// MIME type supplied by the uploader, stored verbatim
    pub content_type: String,

    /// Byte length of the stored content, recomputed on every put
    pub content_length: u64,
}

impl FileDescriptor {
    /// Create a descriptor for a new logical file with a fresh content id
    pub fn new(content_type: impl Into<String>, content_length: u64) -> Self {
        Self {
            content_id: Uuid::new_v4(),
            content_type: content_type.into(),
            content_length,
        }
    }
}

/// Per-user file index: file name → descriptor.
///
/// Materializes lazily on first upload and persists for the life of the
/// user. A `BTreeMap` keeps listings name-sorted and deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIndex {
    pub files: BTreeMap<String, FileDescriptor>,
}

impl UserIndex {
    /// Serialize the index for storage
    pub fn encode(&self) -> FileStoreResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| FileStoreError::Storage(e.to_string()))
    }

    /// Deserialize an index record read from storage.
    ///
    /// A malformed record is `CorruptIndex`, not an empty index.
    pub fn decode(user_id: Uuid, raw: &[u8]) -> FileStoreResult<Self> {
        serde_json::from_slice(raw).map_err(|e| FileStoreError::CorruptIndex {
            user_id,
            reason: e.to_string(),
        })
    }
}
