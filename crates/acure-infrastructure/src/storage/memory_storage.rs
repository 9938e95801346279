use std::collections::BTreeMap;
use std::sync::RwLock;

use acure_core::Result;
use acure_core::storage::KeyValueStorage;

use super::{check_quota, poisoned, total_size};

/// Volatile storage with a character quota.
///
/// Used in tests and for sessions that should not outlive the process.
#[derive(Debug)]
pub struct MemoryStorage {
    entries: RwLock<BTreeMap<String, String>>,
    capacity: usize,
}

impl MemoryStorage {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Characters currently in use.
    pub fn used(&self) -> usize {
        self.entries.read().map(|e| total_size(&e)).unwrap_or(0)
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new(acure_core::config::CacheSettings::default().capacity_chars)
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        check_quota(&entries, self.capacity, key, value)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.keys().cloned().collect())
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.clear();
        Ok(())
    }
}
