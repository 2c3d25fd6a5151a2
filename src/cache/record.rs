//! Record Module
//!
//! The persisted wire shape: `{"value": <envelope>, "timestamp": <millis>}`.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::cache::codec::EncryptedEnvelope;
use crate::error::Result;

// == Stored Value ==
/// The envelope half of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    /// AEAD output as an object
    Encrypted(EncryptedEnvelope),
    /// Compressed text or canonical JSON text
    Plain(String),
}

// == Record ==
/// One persisted entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub value: StoredValue,
    /// Write time (Unix milliseconds)
    pub timestamp: u64,
}

impl Record {
    /// Wraps `value` stamped with the current time.
    pub fn new(value: StoredValue) -> Self {
        Self {
            value,
            timestamp: current_timestamp_ms(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
