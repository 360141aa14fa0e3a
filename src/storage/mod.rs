//! Key/value persistence backends.
//!
//! The document store only needs "read the string under a key" and "replace
//! the string under a key". [`FileStorage`] keeps one JSON file per key in a
//! data directory; [`MemoryStorage`] keeps everything in-process for tests.

mod file;
mod memory;

pub use file::FileStorage;
pub(crate) use file::atomic_write;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Storage key holding the serialized document.
pub const STORAGE_KEY: &str = "websync-categories";

/// Storage key holding the persisted theme choice.
pub const THEME_KEY: &str = "websync-theme";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Minimal string key/value store.
pub trait Storage {
    /// Read the value stored under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

impl<S: Storage + ?Sized> Storage for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}
