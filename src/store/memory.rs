//! In-memory store with an optional byte quota.

use std::collections::BTreeMap;

use super::{KeyValueStore, StoreError};

/// `BTreeMap`-backed store.
///
/// With a quota set it behaves like a size-bounded host store: a write that
/// would push the summed value lengths past the quota is refused.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Creates an unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store refusing writes beyond `quota` bytes of values.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            items: BTreeMap::new(),
            quota: Some(quota),
        }
    }

    /// Sum of stored value lengths.
    pub fn used_bytes(&self) -> usize {
        self.items.values().map(String::len).sum()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            let replaced = self.items.get(key).map_or(0, String::len);
            let used = self.used_bytes() - replaced;
            if used + value.len() > quota {
                return Err(StoreError::QuotaExceeded {
                    used,
                    quota,
                    requested: value.len(),
                });
            }
        }
        self.items.insert(key.to_string(), value);
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        self.items.remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.items.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let mut store = MemoryStore::new();
        store.set_item("a", "1".to_string()).unwrap();

        assert_eq!(store.get_item("a"), Some("1".to_string()));
        assert_eq!(store.keys(), vec!["a".to_string()]);

        store.remove_item("a").unwrap();
        assert!(store.get_item("a").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut store = MemoryStore::new();
        assert!(store.remove_item("missing").is_ok());
    }

    #[test]
    fn test_quota_refuses_oversized_write() {
        let mut store = MemoryStore::with_quota(10);
        store.set_item("a", "12345".to_string()).unwrap();

        let result = store.set_item("b", "123456".to_string());
        assert!(matches!(result, Err(StoreError::QuotaExceeded { .. })));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_quota_counts_replacement_once() {
        let mut store = MemoryStore::with_quota(10);
        store.set_item("a", "1234567890".to_string()).unwrap();

        // Overwriting frees the old value first
        assert!(store.set_item("a", "0987654321".to_string()).is_ok());
        assert_eq!(store.used_bytes(), 10);
    }
}
