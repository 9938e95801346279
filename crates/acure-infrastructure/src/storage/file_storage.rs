use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use acure_core::Result;
use acure_core::storage::KeyValueStorage;

use super::atomic_json::AtomicJsonFile;
use super::{check_quota, poisoned};

/// Persistent storage backed by a single JSON object on disk.
///
/// The whole map is held in memory and written through on every mutation.
/// A mutation that fails to persist is rolled back in memory.
pub struct FileStorage {
    file: AtomicJsonFile<BTreeMap<String, String>>,
    entries: RwLock<BTreeMap<String, String>>,
    capacity: usize,
}

impl FileStorage {
    /// Opens (or lazily creates) the store at `path`.
    pub fn open(path: PathBuf, capacity: usize) -> Result<Self> {
        let file: AtomicJsonFile<BTreeMap<String, String>> = AtomicJsonFile::new(path);
        let entries = file.load()?.unwrap_or_default();
        tracing::debug!(
            "Opened local storage at {} with {} entries",
            file.path().display(),
            entries.len()
        );

        Ok(Self {
            file,
            entries: RwLock::new(entries),
            capacity,
        })
    }

    fn mutate<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> Result<()>,
    {
        let mut entries = self.entries.write().map_err(poisoned)?;
        let mut next = entries.clone();
        f(&mut next)?;
        self.file.save(&next)?;
        *entries = next;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.mutate(|entries| {
            check_quota(entries, self.capacity, key, value)?;
            entries.insert(key.to_string(), value.to_string());
            Ok(())
        })
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        {
            let entries = self.entries.read().map_err(poisoned)?;
            if !entries.contains_key(key) {
                return Ok(());
            }
        }
        self.mutate(|entries| {
            entries.remove(key);
            Ok(())
        })
    }

    fn keys(&self) -> Result<Vec<String>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.keys().cloned().collect())
    }

    fn clear(&self) -> Result<()> {
        self.mutate(|entries| {
            entries.clear();
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("local_storage.json");

        {
            let storage = FileStorage::open(path.clone(), 1_000).unwrap();
            storage.set_item("scan_a", "{}").unwrap();
            storage.set_item("userToken", "tok").unwrap();
            storage.remove_item("userToken").unwrap();
        }

        let reopened = FileStorage::open(path, 1_000).unwrap();
        assert_eq!(reopened.keys().unwrap(), vec!["scan_a"]);
        assert_eq!(reopened.get_item("scan_a").unwrap(), Some("{}".to_string()));
    }

    #[test]
    fn test_quota_failure_is_not_persisted() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("local_storage.json");

        let storage = FileStorage::open(path.clone(), 8).unwrap();
        storage.set_item("k", "small").unwrap();
        assert!(storage.set_item("big", "too large").unwrap_err().is_quota_exceeded());

        let reopened = FileStorage::open(path, 8).unwrap();
        assert_eq!(reopened.keys().unwrap(), vec!["k"]);
    }
}
