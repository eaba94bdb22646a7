//! Transactional file operations
//!
//! [`FileStore`] owns the long-lived handle to the files database, opened
//! once at startup. Each operation acquires one redb transaction, reads the
//! caller's index record, and for put/delete mutates the index and blob
//! tables inside the same commit.
//!
//! Concurrency is delegated entirely to redb: write transactions are
//! serialized by the engine, read transactions see a snapshot. Two
//! concurrent puts to the same (user, name) therefore serialize to exactly
//! one complete outcome, and operations for different users need no
//! coordination here.

use std::path::Path;

use redb::{Database, ReadableTable, Table, TableDefinition};
use uuid::Uuid;

use super::errors::{FileStoreError, FileStoreResult};
use super::record::{FileDescriptor, UserIndex};

/// user id (hyphenated UUID) → serialized `UserIndex`
const USER_INDEX_TABLE: TableDefinition<&str, Vec<u8>> = TableDefinition::new("user_index");

/// content id (hyphenated UUID) → raw file bytes
const BLOB_TABLE: TableDefinition<&str, Vec<u8>> = TableDefinition::new("blobs");

/// Load a user's index record, distinguishing "no record" from "unreadable
/// record". Absent is not an error; callers decide what it means.
fn load_index<T>(table: &T, user_id: Uuid) -> FileStoreResult<Option<UserIndex>>
where
    T: ReadableTable<&'static str, Vec<u8>>,
{
    let key = user_id.to_string();
    match table.get(key.as_str())? {
        None => Ok(None),
        Some(raw) => UserIndex::decode(user_id, &raw.value()).map(Some),
    }
}

/// Overwrite a user's index record within the active transaction.
fn save_index(
    table: &mut Table<'_, &'static str, Vec<u8>>,
    user_id: Uuid,
    index: &UserIndex,
) -> FileStoreResult<()> {
    let key = user_id.to_string();
    table.insert(key.as_str(), index.encode()?)?;
    Ok(())
}

/// Transactional per-user file store backed by redb.
pub struct FileStore {
    db: Database,
}

impl FileStore {
    /// Open (or create) the files database and ensure both tables exist.
    ///
    /// Tables are created eagerly so read-only transactions never observe a
    /// missing table.
    pub fn open(path: impl AsRef<Path>) -> FileStoreResult<Self> {
        let db = Database::create(path)?;

        let txn = db.begin_write()?;
        {
            txn.open_table(USER_INDEX_TABLE)?;
            txn.open_table(BLOB_TABLE)?;
        }
        txn.commit()?;

        Ok(Self { db })
    }

    /// List the file names in a user's index, name-sorted.
    ///
    /// A user with no index record lists the same as a user with an empty
    /// one: `[]`.
    pub fn list(&self, user_id: Uuid) -> FileStoreResult<Vec<String>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(USER_INDEX_TABLE)?;

        match load_index(&table, user_id)? {
            None => Ok(Vec::new()),
            Some(index) => Ok(index.files.into_keys().collect()),
        }
    }

    /// Fetch a file's bytes and stored content type.
    ///
    /// `NotFound` is identical whether the user has no index at all or the
    /// index has no such name.
    pub fn get(&self, user_id: Uuid, file_name: &str) -> FileStoreResult<(Vec<u8>, String)> {
        let txn = self.db.begin_read()?;
        let index_table = txn.open_table(USER_INDEX_TABLE)?;

        let index = load_index(&index_table, user_id)?.ok_or(FileStoreError::NotFound)?;
        let descriptor = index.files.get(file_name).ok_or(FileStoreError::NotFound)?;

        let blob_table = txn.open_table(BLOB_TABLE)?;
        let content_key = descriptor.content_id.to_string();
        let blob = blob_table.get(content_key.as_str())?.ok_or_else(|| {
            FileStoreError::Storage(format!(
                "index references missing blob {}",
                descriptor.content_id
            ))
        })?;

        // AccessGuard::value() hands back an owned copy, so callers never
        // see engine-internal buffers.
        Ok((blob.value(), descriptor.content_type.clone()))
    }

    /// Store a file under the user's name, creating or overwriting.
    ///
    /// A new name allocates a fresh content id; an existing name keeps its
    /// content id and the blob is overwritten in place. Index and blob
    /// writes land in one atomic commit.
    pub fn put(
        &self,
        user_id: Uuid,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> FileStoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut index_table = txn.open_table(USER_INDEX_TABLE)?;

            let mut index = load_index(&index_table, user_id)?.unwrap_or_default();

            let content_id = match index.files.get_mut(file_name) {
                Some(descriptor) => {
                    descriptor.content_type = content_type.to_string();
                    descriptor.content_length = bytes.len() as u64;
                    descriptor.content_id
                }
                None => {
                    let descriptor = FileDescriptor::new(content_type, bytes.len() as u64);
                    let content_id = descriptor.content_id;
                    index.files.insert(file_name.to_string(), descriptor);
                    content_id
                }
            };

            save_index(&mut index_table, user_id, &index)?;

            let mut blob_table = txn.open_table(BLOB_TABLE)?;
            let content_key = content_id.to_string();
            blob_table.insert(content_key.as_str(), bytes.to_vec())?;
        }
        txn.commit()?;

        Ok(())
    }

    /// Remove a file from the user's index and delete its blob.
    ///
    /// Deleting for a user with no index record is a no-op success; a known
    /// user without the named file is `NotFound`. Index and blob removal
    /// commit together.
    pub fn delete(&self, user_id: Uuid, file_name: &str) -> FileStoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut index_table = txn.open_table(USER_INDEX_TABLE)?;

            let mut index = match load_index(&index_table, user_id)? {
                Some(index) => index,
                // No index record: nothing to delete, nothing to report.
                None => return Ok(()),
            };

            let descriptor = index
                .files
                .remove(file_name)
                .ok_or(FileStoreError::NotFound)?;

            save_index(&mut index_table, user_id, &index)?;

            let mut blob_table = txn.open_table(BLOB_TABLE)?;
            let content_key = descriptor.content_id.to_string();
            blob_table.remove(content_key.as_str())?;
        }
        txn.commit()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> FileStore {
        FileStore::open(dir.path().join("files.redb")).unwrap()
    }

    /// Read a user's raw index back out of the table, bypassing the ops.
    fn read_index(store: &FileStore, user_id: Uuid) -> Option<UserIndex> {
        let txn = store.db.begin_read().unwrap();
        let table = txn.open_table(USER_INDEX_TABLE).unwrap();
        load_index(&table, user_id).unwrap()
    }

    fn blob_exists(store: &FileStore, content_id: Uuid) -> bool {
        let txn = store.db.begin_read().unwrap();
        let table = txn.open_table(BLOB_TABLE).unwrap();
        let key = content_id.to_string();
        table.get(key.as_str()).unwrap().is_some()
    }

    #[test]
    fn test_put_then_get_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let user = Uuid::new_v4();

        store
            .put(user, "hello.txt", "text/plain", b"hello world")
            .unwrap();

        let (bytes, content_type) = store.get(user, "hello.txt").unwrap();
        assert_eq!(bytes, b"hello world");
        assert_eq!(content_type, "text/plain");
    }

    #[test]
    fn test_get_unknown_user_and_unknown_file_look_identical() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let known = Uuid::new_v4();
        let unknown = Uuid::new_v4();

        store.put(known, "a.txt", "text/plain", b"a").unwrap();

        let err_no_user = store.get(unknown, "a.txt").unwrap_err();
        let err_no_file = store.get(known, "b.txt").unwrap_err();
        assert_eq!(err_no_user.to_string(), err_no_file.to_string());
        assert!(matches!(err_no_user, FileStoreError::NotFound));
        assert!(matches!(err_no_file, FileStoreError::NotFound));
    }

    #[test]
    fn test_overwrite_reuses_content_id() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let user = Uuid::new_v4();

        store.put(user, "f", "text/plain", b"one").unwrap();
        let before = read_index(&store, user).unwrap().files["f"].clone();

        store.put(user, "f", "application/json", b"twotwo").unwrap();
        let after = read_index(&store, user).unwrap().files["f"].clone();

        assert_eq!(after.content_id, before.content_id);
        assert_eq!(after.content_type, "application/json");
        assert_eq!(after.content_length, 6);

        let (bytes, content_type) = store.get(user, "f").unwrap();
        assert_eq!(bytes, b"twotwo");
        assert_eq!(content_type, "application/json");
    }

    #[test]
    fn test_content_length_comes_from_the_bytes() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let user = Uuid::new_v4();

        store.put(user, "f", "text/plain", &[0u8; 1234]).unwrap();
        assert_eq!(
            read_index(&store, user).unwrap().files["f"].content_length,
            1234
        );
    }

    #[test]
    fn test_delete_removes_index_entry_and_blob() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let user = Uuid::new_v4();

        store.put(user, "f", "text/plain", b"data").unwrap();
        let content_id = read_index(&store, user).unwrap().files["f"].content_id;
        assert!(blob_exists(&store, content_id));

        store.delete(user, "f").unwrap();

        assert!(read_index(&store, user).unwrap().files.is_empty());
        assert!(!blob_exists(&store, content_id));
        assert!(matches!(
            store.get(user, "f"),
            Err(FileStoreError::NotFound)
        ));
    }

    #[test]
    fn test_delete_for_user_with_no_index_is_noop_success() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store.delete(Uuid::new_v4(), "anything").unwrap();
    }

    #[test]
    fn test_delete_unknown_name_under_existing_index_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let user = Uuid::new_v4();

        store.put(user, "present", "text/plain", b"x").unwrap();

        assert!(matches!(
            store.delete(user, "missing"),
            Err(FileStoreError::NotFound)
        ));
        // The failed delete must not have touched the existing file
        assert_eq!(store.list(user).unwrap(), ["present"]);
    }

    #[test]
    fn test_recreate_after_delete_gets_fresh_content_id() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let user = Uuid::new_v4();

        store.put(user, "f", "text/plain", b"v1").unwrap();
        let first = read_index(&store, user).unwrap().files["f"].content_id;

        store.delete(user, "f").unwrap();
        store.put(user, "f", "text/plain", b"v2").unwrap();
        let second = read_index(&store, user).unwrap().files["f"].content_id;

        assert_ne!(first, second);
    }

    #[test]
    fn test_list_never_seen_user_is_empty_not_error() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        assert!(store.list(Uuid::new_v4()).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_index_surfaces_on_every_operation() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let user = Uuid::new_v4();

        // Plant a record that is not a UserIndex
        let txn = store.db.begin_write().unwrap();
        {
            let mut table = txn.open_table(USER_INDEX_TABLE).unwrap();
            let key = user.to_string();
            table.insert(key.as_str(), b"{broken".to_vec()).unwrap();
        }
        txn.commit().unwrap();

        assert!(matches!(
            store.list(user),
            Err(FileStoreError::CorruptIndex { .. })
        ));
        assert!(matches!(
            store.get(user, "f"),
            Err(FileStoreError::CorruptIndex { .. })
        ));
        assert!(matches!(
            store.put(user, "f", "text/plain", b"x"),
            Err(FileStoreError::CorruptIndex { .. })
        ));
        assert!(matches!(
            store.delete(user, "f"),
            Err(FileStoreError::CorruptIndex { .. })
        ));
    }
}
