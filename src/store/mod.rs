//! Persistent Store Module
//!
//! The synchronous key-value facility the cache sits on top of. The engine
//! receives one at construction, so tests can hand it an in-memory double
//! and the server a file-backed one.

mod file;
mod memory;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

// == Store Error ==
/// Failures a persistent store can report on write.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store's own size bound would be exceeded
    #[error("Quota exceeded: {used} of {quota} bytes in use, {requested} more requested")]
    QuotaExceeded {
        used: usize,
        quota: usize,
        requested: usize,
    },

    /// Backing file could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Backing file is not a JSON object of strings
    #[error("Corrupt store file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

// == Key Value Store ==
/// Synchronous string key-value store.
///
/// No atomicity is provided across keys.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&mut self, key: &str, value: String) -> Result<(), StoreError>;

    /// Removes `key`. Removing a missing key is a no-op.
    fn remove_item(&mut self, key: &str) -> Result<(), StoreError>;

    /// Every key currently set, in no guaranteed order.
    fn keys(&self) -> Vec<String>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove_item(key)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }
}
