//! JSON-file backed store.
//!
//! The whole map lives in memory and is written through to disk on every
//! mutation, so a crash loses at most the write in flight.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{KeyValueStore, StoreError};

/// Store persisted as a single JSON object of string values.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let items = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Opened file store {} with {} items", path.display(), items.len());
        Ok(Self { path, items })
    }

    // Writes to a sibling temp file then renames over the target.
    fn persist(&self) -> Result<(), StoreError> {
        let text = serde_json::to_string(&self.items)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        let previous = self.items.insert(key.to_string(), value);
        if let Err(e) = self.persist() {
            // Keep memory consistent with disk
            match previous {
                Some(old) => self.items.insert(key.to_string(), old),
                None => self.items.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        let Some(removed) = self.items.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.persist() {
            self.items.insert(key.to_string(), removed);
            return Err(e);
        }
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
    fn test_open_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("db.json")).unwrap();
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");

        {
            let mut store = FileStore::open(&path).unwrap();
            store.set_item("a", "1".to_string()).unwrap();
            store.set_item("b", "2".to_string()).unwrap();
            store.remove_item("a").unwrap();
        }

        let store = FileStore::open(&path).unwrap();
        assert!(store.get_item("a").is_none());
        assert_eq!(store.get_item("b"), Some("2".to_string()));
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            FileStore::open(&path),
            Err(StoreError::Corrupt(_))
        ));
    }

    #[test]
    fn test_failed_write_leaves_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();

        let mut store = FileStore::open(sub.join("db.json")).unwrap();
        store.set_item("a", "1".to_string()).unwrap();
        fs::remove_dir_all(&sub).unwrap();

        assert!(matches!(store.remove_item("a"), Err(StoreError::Io(_))));
        assert_eq!(store.get_item("a"), Some("1".to_string()));

        assert!(store.set_item("a", "2".to_string()).is_err());
        assert!(store.set_item("b", "3".to_string()).is_err());
        assert_eq!(store.get_item("a"), Some("1".to_string()));
        assert!(store.get_item("b").is_none());
    }
}
