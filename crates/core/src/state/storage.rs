use std::collections::HashMap;
use std::error::Error;
use std::sync::{PoisonError, RwLock};

/// Errors reported by a [`Storage`] or while encoding stored values.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The storage backend failed.
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn Error + Send + Sync>),
    /// A value could not be encoded.
    #[error("failed to encode value: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl StorageError {
    /// Wraps a backend error.
    #[inline]
    pub fn backend<E: Error + Send + Sync + 'static>(err: E) -> Self {
        Self::Backend(Box::new(err))
    }
}

/// A key-value store for persisted client state.
///
/// Keys and values are plain strings. Implementations must be safe to
/// share between threads.
pub trait Storage: Send + Sync {
    /// Reads the value under `key`, `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes the value under `key`. Removing a missing key is not an
    /// error.
    fn clear(&self, key: &str) -> Result<(), StorageError>;
}

/// An in-process [`Storage`] that forgets everything on drop.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values =
            self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StorageError> {
        let mut values =
            self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}
