//! Batch Operations Module
//!
//! Loops over the single-key operations of anything implementing [`CacheOps`].

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::cache::engine::{ReadOptions, WriteOptions};
use crate::error::Result;

/// The single-key operations batch helpers are built from.
pub trait CacheOps {
    fn set_with<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
        options: WriteOptions,
    ) -> Result<()>;

    fn get_with<T: DeserializeOwned>(
        &mut self,
        key: &str,
        options: ReadOptions,
    ) -> Result<Option<T>>;

    fn remove(&mut self, key: &str) -> Result<()>;
}

/// One key/value pair of a batch write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry<T> {
    pub key: String,
    pub value: T,
}

impl<T> BatchEntry<T> {
    pub fn new(key: impl Into<String>, value: T) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Writes every entry in order, stopping at the first error.
///
/// Entries written before the failure stay written.
pub fn batch_set<C, T>(cache: &mut C, entries: &[BatchEntry<T>], options: WriteOptions) -> Result<()>
where
    C: CacheOps,
    T: Serialize,
{
    for entry in entries {
        cache.set_with(&entry.key, &entry.value, options)?;
    }
    Ok(())
}

/// Reads every key, returning results in input order.
pub fn batch_get<C, T, K>(cache: &mut C, keys: &[K], options: ReadOptions) -> Result<Vec<Option<T>>>
where
    C: CacheOps,
    T: DeserializeOwned,
    K: AsRef<str>,
{
    keys.iter()
        .map(|key| cache.get_with(key.as_ref(), options))
        .collect()
}

/// Removes every key. Missing keys are skipped silently.
pub fn batch_remove<C, K>(cache: &mut C, keys: &[K]) -> Result<()>
where
    C: CacheOps,
    K: AsRef<str>,
{
    for key in keys {
        cache.remove(key.as_ref())?;
    }
    Ok(())
}
