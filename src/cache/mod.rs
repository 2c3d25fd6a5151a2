//! Cache Module
//!
//! Eviction-aware storage engine with a compress/encrypt codec pipeline,
//! plus the batch and query layers built on top of it.

pub mod batch;
pub mod codec;
mod engine;
mod lru;
pub mod query;
mod record;
mod usage;


// Re-export public types
pub use batch::{batch_get, batch_remove, batch_set, BatchEntry, CacheOps};
pub use codec::{Cipher, EncryptedEnvelope};
pub use engine::{ReadOptions, StorageEngine, WriteOptions};
pub use lru::LruIndex;
pub use query::{select, Condition, Operator};
pub use record::{current_timestamp_ms, Record, StoredValue};
pub use usage::{CacheStats, UsageTracker};
