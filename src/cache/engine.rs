//! Storage Engine Module
//!
//! Bounded-size cache over an injected [`KeyValueStore`], combining the codec
//! pipeline with LRU eviction.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::batch::{self, CacheOps};
use crate::cache::codec::{self, Cipher};
use crate::cache::query::{self, Condition};
use crate::cache::record::{Record, StoredValue};
use crate::cache::{CacheStats, LruIndex, UsageTracker};
use crate::config::EngineConfig;
use crate::error::{CacheError, Result};
use crate::store::KeyValueStore;

// == Options ==
/// Codec stages applied by a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    pub compress: bool,
    pub encrypt: bool,
}

impl WriteOptions {
    /// Plain canonical JSON, no codec stages.
    pub fn plain() -> Self {
        Self {
            compress: false,
            encrypt: false,
        }
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            compress: true,
            encrypt: true,
        }
    }
}

/// Codec stages reversed by a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    pub decompress: bool,
    pub decrypt: bool,
}

impl ReadOptions {
    pub fn plain() -> Self {
        Self {
            decompress: false,
            decrypt: false,
        }
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            decompress: true,
            decrypt: true,
        }
    }
}

// == Storage Engine ==
/// Eviction-aware cache over a persistent store.
///
/// Every persisted record lives under `key_prefix + key`. The LRU index holds
/// exactly the logical keys that have a record; the sum of record sizes is
/// kept within `max_size_bytes` by evicting from the index tail before each
/// write.
#[derive(Debug)]
pub struct StorageEngine<S> {
    store: S,
    config: EngineConfig,
    cipher: Cipher,
    lru: LruIndex,
    usage: UsageTracker,
    stats: CacheStats,
}

impl<S: KeyValueStore> StorageEngine<S> {
    // == Constructor ==
    /// Creates an engine over `store`.
    ///
    /// Records already present in the namespace are indexed by their write
    /// timestamp, oldest at the eviction end.
    pub fn new(store: S, config: EngineConfig) -> Result<Self> {
        let cipher = Cipher::new(config.secret.as_bytes())?;
        if config.uses_placeholder_secret() {
            warn!("Using the placeholder secret; encrypted records are not protected");
        }

        let mut engine = Self {
            store,
            config,
            cipher,
            lru: LruIndex::new(),
            usage: UsageTracker::new(),
            stats: CacheStats::new(),
        };
        engine.rebuild_index();
        Ok(engine)
    }

    fn rebuild_index(&mut self) {
        let mut seeded: Vec<(u64, String)> = self
            .keys()
            .into_iter()
            .map(|key| {
                let written_at = self
                    .store
                    .get_item(&self.storage_key(&key))
                    .and_then(|raw| Record::from_json(&raw).ok())
                    .map_or(0, |record| record.timestamp);
                (written_at, key)
            })
            .collect();

        // Newest first, each pushed behind the previous
        seeded.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        for (_, key) in &seeded {
            self.lru.push_oldest(key);
        }

        if !seeded.is_empty() {
            debug!("Indexed {} existing records", seeded.len());
        }
    }

    // == Set ==
    /// Stores `value` compressed and encrypted.
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        self.set_with(key, value, WriteOptions::default())
    }

    /// Stores `value` with the chosen codec stages.
    ///
    /// Compression runs before encryption. Least recently used records are
    /// evicted until the new record fits; a record that cannot fit is
    /// rejected with [`CacheError::CapacityExceeded`].
    pub fn set_with<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
        options: WriteOptions,
    ) -> Result<()> {
        let text = if options.compress {
            codec::compress(value)?
        } else {
            serde_json::to_string(value)?
        };

        let stored = if options.encrypt {
            StoredValue::Encrypted(self.cipher.encrypt(text.as_bytes())?)
        } else {
            StoredValue::Plain(text)
        };

        let serialized = Record::new(stored).to_json()?;
        self.enforce_size_limit(key, serialized.len())?;

        let size = serialized.len();
        let storage_key = self.storage_key(key);
        self.store.set_item(&storage_key, serialized)?;
        self.lru.touch(key);
        self.usage.track(key);

        debug!(
            "Set '{}' ({} bytes, compress={}, encrypt={})",
            key, size, options.compress, options.encrypt
        );
        Ok(())
    }

    // == Get ==
    /// Reads and fully decodes `key`. A missing key is `Ok(None)`.
    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>> {
        self.get_with(key, ReadOptions::default())
    }

    /// Reads `key`, reversing the chosen codec stages.
    ///
    /// Decryption runs before decompression and a failed tag check is always
    /// an error. With `decrypt` off, an encrypted record decodes as its
    /// envelope object; with `decompress` off, a compressed payload decodes
    /// as its `lz4:` string.
    pub fn get_with<T: DeserializeOwned>(
        &mut self,
        key: &str,
        options: ReadOptions,
    ) -> Result<Option<T>> {
        let Some(raw) = self.store.get_item(&self.storage_key(key)) else {
            self.stats.record_miss();
            return Ok(None);
        };

        self.lru.touch(key);
        self.stats.record_hit();

        let record = Record::from_json(&raw)?;
        let text = match record.value {
            StoredValue::Encrypted(envelope) if options.decrypt => {
                self.cipher.decrypt_text(&envelope).map_err(|e| {
                    warn!("Record '{}' failed authentication", key);
                    e
                })?
            }
            StoredValue::Encrypted(envelope) => serde_json::to_string(&envelope)?,
            StoredValue::Plain(text) => text,
        };

        let value = if options.decompress {
            codec::decompress(&text)?
        } else if codec::is_compressed(&text) {
            // Left compressed, the payload reads back as its marked text
            serde_json::from_value(Value::String(text))?
        } else {
            serde_json::from_str(&text)?
        };
        Ok(Some(value))
    }

    // == Remove ==
    /// Deletes `key`. Removing a missing key is a no-op.
    ///
    /// The index is only updated once the store has dropped the record.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        let storage_key = self.storage_key(key);
        self.store.remove_item(&storage_key)?;
        self.lru.remove(key);
        Ok(())
    }

    // == Has ==
    /// Whether `key` has a record. Does not affect recency.
    pub fn has(&self, key: &str) -> bool {
        self.store.get_item(&self.storage_key(key)).is_some()
    }

    // == Size Limit ==
    fn enforce_size_limit(&mut self, key: &str, candidate: usize) -> Result<()> {
        let budget = self.config.max_size_bytes;
        if candidate > budget {
            warn!(
                "Rejecting '{}': {} bytes can never fit in {} bytes",
                key, candidate, budget
            );
            return Err(CacheError::CapacityExceeded {
                needed: candidate,
                budget,
            });
        }

        // The record being replaced does not count against the new one
        let mut current = self.total_size().saturating_sub(self.record_size(key));

        while current + candidate > budget {
            let Some(victim) = self.lru.pop_least_recent() else {
                warn!(
                    "Rejecting '{}': {} bytes still in use with nothing left to evict",
                    key, current
                );
                return Err(CacheError::CapacityExceeded {
                    needed: candidate,
                    budget,
                });
            };

            let victim_size = self.record_size(&victim);
            let storage_key = self.storage_key(&victim);
            if let Err(e) = self.store.remove_item(&storage_key) {
                // Still stored, so it stays first in line
                self.lru.push_oldest(&victim);
                return Err(e.into());
            }
            if victim != key {
                current = current.saturating_sub(victim_size);
            }
            self.stats.record_eviction();
            debug!("Evicted '{}' to make room for '{}'", victim, key);
        }
        Ok(())
    }

    /// Sum of the byte lengths of every record in the namespace.
    pub fn total_size(&self) -> usize {
        self.keys().iter().map(|key| self.record_size(key)).sum()
    }

    fn record_size(&self, key: &str) -> usize {
        self.store
            .get_item(&self.storage_key(key))
            .map_or(0, |raw| raw.len())
    }

    // == Query ==
    /// Decodes every record and keeps those matching all `conditions`.
    pub fn select_query(&mut self, conditions: &[Condition]) -> Result<Vec<Value>> {
        let keys = self.keys();
        let records: Vec<Value> =
            batch::batch_get::<_, Value, _>(self, &keys[..], ReadOptions::default())?
                .into_iter()
                .flatten()
                .collect();
        Ok(query::select(records, conditions))
    }

    // == Introspection ==
    /// Logical keys of every record in the namespace.
    pub fn keys(&self) -> Vec<String> {
        self.store
            .keys()
            .into_iter()
            .filter_map(|k| k.strip_prefix(&self.config.key_prefix).map(str::to_string))
            .collect()
    }

    /// Number of writes to `key` since the engine was created.
    pub fn usage_count(&self, key: &str) -> u64 {
        self.usage.count(key)
    }

    /// Keys from least to most recently used.
    pub fn eviction_order(&self) -> Vec<String> {
        self.lru.eviction_order().map(str::to_string).collect()
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.keys().len();
        stats.total_bytes = self.total_size();
        stats
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Direct store access. Writes made here bypass the index and budget.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.config.key_prefix, key)
    }
}

impl<S: KeyValueStore> CacheOps for StorageEngine<S> {
    fn set_with<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
        options: WriteOptions,
    ) -> Result<()> {
        StorageEngine::set_with(self, key, value, options)
    }

    fn get_with<T: DeserializeOwned>(
        &mut self,
        key: &str,
        options: ReadOptions,
    ) -> Result<Option<T>> {
        StorageEngine::get_with(self, key, options)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        StorageEngine::remove(self, key)
    }
}
