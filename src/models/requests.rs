//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;
use serde_json::Value;

use crate::cache::{BatchEntry, Condition, ReadOptions, WriteOptions};

fn default_true() -> bool {
    true
}

/// Validates a logical key, returning an error message if it is unusable.
pub fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    None
}

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: Any JSON value
/// - `compress` / `encrypt`: Codec stages, both on by default
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub key: String,
    pub value: Value,
    #[serde(default = "default_true")]
    pub compress: bool,
    #[serde(default = "default_true")]
    pub encrypt: bool,
}

impl SetRequest {
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }

    pub fn options(&self) -> WriteOptions {
        WriteOptions {
            compress: self.compress,
            encrypt: self.encrypt,
        }
    }
}

/// Query string for reads (`?decompress=false&decrypt=false`)
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ReadParams {
    #[serde(default = "default_true")]
    pub decompress: bool,
    #[serde(default = "default_true")]
    pub decrypt: bool,
}

impl Default for ReadParams {
    fn default() -> Self {
        Self {
            decompress: true,
            decrypt: true,
        }
    }
}

impl From<ReadParams> for ReadOptions {
    fn from(params: ReadParams) -> Self {
        ReadOptions {
            decompress: params.decompress,
            decrypt: params.decrypt,
        }
    }
}

/// Request body for POST /batch/set
#[derive(Debug, Clone, Deserialize)]
pub struct BatchSetRequest {
    pub entries: Vec<BatchEntry<Value>>,
    #[serde(default = "default_true")]
    pub compress: bool,
    #[serde(default = "default_true")]
    pub encrypt: bool,
}

impl BatchSetRequest {
    pub fn validate(&self) -> Option<String> {
        self.entries.iter().find_map(|entry| validate_key(&entry.key))
    }

    pub fn options(&self) -> WriteOptions {
        WriteOptions {
            compress: self.compress,
            encrypt: self.encrypt,
        }
    }
}

/// Request body for POST /batch/get and POST /batch/remove
#[derive(Debug, Clone, Deserialize)]
pub struct KeysRequest {
    pub keys: Vec<String>,
    #[serde(default = "default_true")]
    pub decompress: bool,
    #[serde(default = "default_true")]
    pub decrypt: bool,
}

impl KeysRequest {
    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            decompress: self.decompress,
            decrypt: self.decrypt,
        }
    }
}

/// Request body for POST /query
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_request_defaults() {
        let json = r#"{"key": "test", "value": {"a": 1}}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, "test");
        assert_eq!(req.value["a"], 1);
        assert_eq!(req.options(), WriteOptions::default());
    }

    #[test]
    fn test_set_request_codec_flags() {
        let json = r#"{"key": "test", "value": "hello", "compress": false, "encrypt": false}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.options(), WriteOptions::plain());
    }

    #[test]
    fn test_validate_empty_key() {
        let req = SetRequest {
            key: "".to_string(),
            value: Value::Null,
            compress: true,
            encrypt: true,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_batch_set_validates_every_key() {
        let json = r#"{"entries": [{"key": "a", "value": 1}, {"key": "", "value": 2}]}"#;
        let req: BatchSetRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_query_request_without_conditions() {
        let req: QueryRequest = serde_json::from_str("{}").unwrap();
        assert!(req.conditions.is_empty());
    }

    #[test]
    fn test_read_params_into_options() {
        let params = ReadParams {
            decompress: false,
            decrypt: true,
        };
        let options: ReadOptions = params.into();
        assert!(!options.decompress);
        assert!(options.decrypt);
    }
}
