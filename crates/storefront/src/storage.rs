//! Local durable key/value storage.
//!
//! The storefront persists exactly two keys: [`CART_KEY`] and [`ADMIN_KEY`].
//! Values are strings; callers own the encoding.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Key holding the JSON-encoded cart.
pub const CART_KEY: &str = "cart";

/// Key holding `"true"` while an admin is logged in.
pub const ADMIN_KEY: &str = "isAdmin";

/// Errors from the local storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key contains characters that cannot be stored.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// Synchronous string key/value storage.
pub trait LocalStorage {
    /// Read a key. `Ok(None)` when it was never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a key. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` for storage. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl LocalStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;
        // Write-then-rename so a crash never leaves half a cart behind.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory storage for tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

impl<S: LocalStorage + ?Sized> LocalStorage for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("harafish-storage-{name}-{}", std::process::id()))
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = temp_dir("roundtrip");
        let storage = FileStorage::new(&dir);

        assert_eq!(storage.get(CART_KEY).unwrap(), None);
        storage.set(CART_KEY, "{}").unwrap();
        assert_eq!(storage.get(CART_KEY).unwrap().as_deref(), Some("{}"));
        storage.remove(CART_KEY).unwrap();
        storage.remove(CART_KEY).unwrap();
        assert_eq!(storage.get(CART_KEY).unwrap(), None);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_file_storage_rejects_path_keys() {
        let storage = FileStorage::new(temp_dir("keys"));
        assert!(matches!(
            storage.get("../etc/passwd"),
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        storage.set(ADMIN_KEY, "true").unwrap();
        assert_eq!(storage.get(ADMIN_KEY).unwrap().as_deref(), Some("true"));
        storage.remove(ADMIN_KEY).unwrap();
        assert_eq!(storage.get(ADMIN_KEY).unwrap(), None);
    }
}
