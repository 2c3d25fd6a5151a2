//! tinydb - A small embedded key-value cache
//!
//! Layers LRU eviction under a byte budget, transparent compression,
//! authenticated encryption and a minimal query language over a
//! synchronous persistent key-value store.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;

pub use api::AppState;
pub use cache::{Condition, Operator, ReadOptions, StorageEngine, WriteOptions};
pub use config::{Config, EngineConfig};
pub use error::{CacheError, Result};
pub use store::{FileStore, KeyValueStore, MemoryStore};
