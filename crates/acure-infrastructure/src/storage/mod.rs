//! Key-value storage backends for the client-local store.
//!
//! Both backends enforce a capacity ceiling counted in characters over keys
//! and values, the way browser local storage does.

mod atomic_json;
mod file_storage;
mod memory_storage;

pub use atomic_json::AtomicJsonFile;
pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;

use std::collections::BTreeMap;

use acure_core::{AcureError, Result};

/// Characters an entry occupies against the quota.
pub(crate) fn entry_size(key: &str, value: &str) -> usize {
    key.chars().count() + value.chars().count()
}

pub(crate) fn total_size(entries: &BTreeMap<String, String>) -> usize {
    entries.iter().map(|(k, v)| entry_size(k, v)).sum()
}

/// Checks whether replacing `key` with `value` stays within `capacity`.
pub(crate) fn check_quota(
    entries: &BTreeMap<String, String>,
    capacity: usize,
    key: &str,
    value: &str,
) -> Result<()> {
    let current = total_size(entries);
    let replaced = entries.get(key).map(|old| entry_size(key, old)).unwrap_or(0);
    let projected = current - replaced + entry_size(key, value);

    if projected > capacity {
        tracing::debug!(
            "Storage quota exceeded writing '{}': {} > {} chars",
            key,
            projected,
            capacity
        );
        return Err(AcureError::StorageQuotaExceeded);
    }
    Ok(())
}

pub(crate) fn poisoned<T>(_: T) -> AcureError {
    AcureError::internal("storage lock poisoned")
}
