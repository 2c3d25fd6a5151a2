//! Configuration Module
//!
//! Handles loading and managing engine and server configuration from environment variables.

use std::env;
use std::path::PathBuf;

// == Defaults ==
/// Default namespace prefix for persisted keys
pub const DEFAULT_KEY_PREFIX: &str = "tinydb_";

/// Default byte budget (1 MiB)
pub const DEFAULT_MAX_SIZE_BYTES: usize = 1024 * 1024;

/// Non-secret placeholder key. Exactly 32 bytes so it is valid AES-256 key material.
pub const PLACEHOLDER_SECRET: &str = "tinydb-insecure-placeholder-key!";

/// Settings the storage engine is constructed with.
///
/// Fixed for the lifetime of the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Prefix prepended to every logical key before it reaches the store
    pub key_prefix: String,
    /// Budget for the sum of persisted record sizes, in bytes
    pub max_size_bytes: usize,
    /// AES-256 key material (32 bytes)
    pub secret: String,
}

impl EngineConfig {
    /// Returns a copy with a different byte budget.
    pub fn with_max_size(mut self, max_size_bytes: usize) -> Self {
        self.max_size_bytes = max_size_bytes;
        self
    }

    /// Returns a copy with a different key prefix.
    pub fn with_prefix(mut self, key_prefix: impl Into<String>) -> Self {
        self.key_prefix = key_prefix.into();
        self
    }

    /// Returns a copy with different key material.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }

    /// True when the built-in placeholder key is still in use.
    pub fn uses_placeholder_secret(&self) -> bool {
        self.secret == PLACEHOLDER_SECRET
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            secret: PLACEHOLDER_SECRET.to_string(),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Engine settings
    pub engine: EngineConfig,
    /// JSON file backing the persistent store
    pub data_file: PathBuf,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `TINYDB_PREFIX` - Key prefix (default: "tinydb_")
    /// - `TINYDB_MAX_SIZE` - Byte budget (default: 1048576)
    /// - `TINYDB_SECRET` - 32-byte encryption secret (default: placeholder)
    /// - `TINYDB_DATA_FILE` - Backing file (default: "tinydb.json")
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            engine: EngineConfig {
                key_prefix: env::var("TINYDB_PREFIX").unwrap_or(defaults.engine.key_prefix),
                max_size_bytes: env::var("TINYDB_MAX_SIZE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.engine.max_size_bytes),
                secret: env::var("TINYDB_SECRET").unwrap_or(defaults.engine.secret),
            },
            data_file: env::var("TINYDB_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_file),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            data_file: PathBuf::from("tinydb.json"),
            server_port: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.engine.key_prefix, "tinydb_");
        assert_eq!(config.engine.max_size_bytes, 1_048_576);
        assert!(config.engine.uses_placeholder_secret());
        assert_eq!(config.data_file, PathBuf::from("tinydb.json"));
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_placeholder_is_aes256_sized() {
        assert_eq!(PLACEHOLDER_SECRET.len(), 32);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("TINYDB_PREFIX");
        env::remove_var("TINYDB_MAX_SIZE");
        env::remove_var("TINYDB_SECRET");
        env::remove_var("TINYDB_DATA_FILE");
        env::remove_var("SERVER_PORT");

        let config = Config::from_env();
        assert_eq!(config.engine.key_prefix, DEFAULT_KEY_PREFIX);
        assert_eq!(config.engine.max_size_bytes, DEFAULT_MAX_SIZE_BYTES);
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_engine_config_builders() {
        let config = EngineConfig::default()
            .with_max_size(200)
            .with_prefix("app_")
            .with_secret("0123456789abcdef0123456789abcdef");

        assert_eq!(config.max_size_bytes, 200);
        assert_eq!(config.key_prefix, "app_");
        assert!(!config.uses_placeholder_secret());
    }
}
