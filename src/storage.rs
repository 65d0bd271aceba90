//! Device key-value storage
//!
//! Values are JSON-encoded strings under fixed keys, mirroring what the
//! mobile app keeps in its async storage. The file store rewrites the
//! whole document on every mutation (read-modify-replace, last write
//! wins).

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{ClientError, Result};

/// Session token
pub const TOKEN_KEY: &str = "userToken";
/// Serialized [`SessionUser`](crate::models::SessionUser)
pub const USER_KEY: &str = "user";
pub const COMMENTS_KEY: &str = "video_comments";
pub const DRAWINGS_KEY: &str = "video_drawings";
pub const TASKS_KEY: &str = "video_tasks";

/// File name of the on-disk store inside the data directory
pub const STORE_FILE: &str = "storage.json";

/// String key-value storage
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Read and decode a JSON value
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>
    where
        Self: Sized,
    {
        match self.get_item(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Encode and store a JSON value
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()>
    where
        Self: Sized,
    {
        let raw = serde_json::to_string(value)?;
        self.set_item(key, &raw)
    }
}

/// JSON document on disk holding every key
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store at `<dir>/storage.json`. The directory is created lazily.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(STORE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            ClientError::Storage(format!("corrupt store {}: {e}", self.path.display()))
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), keys = entries.len(), "Store written");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// In-process store for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| ClientError::Storage("memory store poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.get_item(TOKEN_KEY).unwrap().is_none());
        store.set_item(TOKEN_KEY, "token_1_1").unwrap();
        assert_eq!(store.get_item(TOKEN_KEY).unwrap().as_deref(), Some("token_1_1"));
        store.remove_item(TOKEN_KEY).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path().join("nested"));
        store.set_json(COMMENTS_KEY, &vec![1, 2, 3]).unwrap();
        store.set_item(TOKEN_KEY, "abc").unwrap();

        let reopened = FileStore::in_dir(dir.path().join("nested"));
        let comments: Vec<i32> = reopened.get_json(COMMENTS_KEY).unwrap().unwrap();
        assert_eq!(comments, vec![1, 2, 3]);
        assert_eq!(reopened.get_item(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn file_store_remove_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        store.set_item(TOKEN_KEY, "t").unwrap();
        store.set_item(USER_KEY, "{}").unwrap();
        store.remove_item(TOKEN_KEY).unwrap();
        assert!(store.get_item(TOKEN_KEY).unwrap().is_none());
        assert!(store.get_item(USER_KEY).unwrap().is_some());
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        std::fs::write(store.path(), "not json").unwrap();
        assert!(matches!(store.get_item(USER_KEY), Err(ClientError::Storage(_))));
    }

    #[test]
    fn bad_json_value_fails_decode() {
        let store = MemoryStore::new();
        store.set_item(USER_KEY, "{oops").unwrap();
        let decoded: Result<Option<Vec<u8>>> = store.get_json(USER_KEY);
        assert!(matches!(decoded, Err(ClientError::Json(_))));
    }
}
