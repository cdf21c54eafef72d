use super::files::{atomic_write, read_file};
use crate::error::PersistenceError;
use std::path::PathBuf;
use std::sync::Arc;
#[cfg(test)]
use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

/// Whole-document string storage addressed by key
pub trait KeyValueStore {
    /// Stored value, `None` if the key was never written
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    /// Replace the stored value
    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).set(key, value)
    }
}

/// One JSON file per key inside the data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        read_file(self.path_for(key)).map_err(|source| PersistenceError::Read {
            key: key.to_string(),
            source,
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        atomic_write(self.path_for(key), value).map_err(|source| PersistenceError::Write {
            key: key.to_string(),
            source,
        })
    }
}

/// In-process store for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    read_only: Mutex<bool>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following write fail, to exercise error paths
    pub fn set_read_only(&self, read_only: bool) {
        *self.read_only.lock().unwrap_or_else(PoisonError::into_inner) = read_only;
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        if *self.read_only.lock().unwrap_or_else(PoisonError::into_inner) {
            return Err(PersistenceError::Write {
                key: key.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "store is read-only"),
            });
        }
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
