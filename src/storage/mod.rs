//! Storage
//!
//! Durable key-value storage for the cart, modelled on browser local storage:
//! string keys, string payloads, synchronous writes.

use std::io;

use mockall::automock;
use rustc_hash::FxHashMap;
use thiserror::Error;

mod file;

pub use file::FileStorage;

/// Key under which the cart's course snapshots are stored.
pub const CART_STORAGE_KEY: &str = "enrolledCourses";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying IO failure
    #[error("storage unavailable: {0}")]
    Io(#[from] io::Error),

    /// Writing the value would exceed the storage quota.
    #[error("storage quota exceeded: {requested} bytes requested, {limit} bytes allowed")]
    QuotaExceeded {
        /// Quota in bytes
        limit: usize,

        /// Bytes the store would hold after the write
        requested: usize,
    },

    /// Key can't be stored by this backend.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Synchronous key-value storage.
#[automock]
pub trait CartStorage: Send {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend can't be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend can't be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend can't be written.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage with an optional byte quota.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: FxHashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Unbounded in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// In-memory storage holding at most `quota` bytes of keys and values.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: FxHashMap::default(),
            quota: Some(quota),
        }
    }

    fn used_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(existing, value)| existing.len() + value.len())
            .sum()
    }
}

impl CartStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(limit) = self.quota {
            let requested = self.used_without(key) + key.len() + value.len();

            if requested > limit {
                return Err(StorageError::QuotaExceeded { limit, requested });
            }
        }

        self.entries.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);

        Ok(())
    }
}
