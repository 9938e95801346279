//! Local scan result cache.
//!
//! Records live under `scan_<id>` in a [`KeyValueStorage`]. Writes shed the
//! image when a record is oversized, and evict the oldest entries once when
//! the store is full.

use std::sync::Arc;

use acure_core::config::CacheSettings;
use acure_core::scan::{SCAN_KEY_PREFIX, ScanCacheRepository, ScanRecord, scan_key};
use acure_core::storage::KeyValueStorage;
use acure_core::{AcureError, Result};
use chrono::Utc;
use rand::Rng;

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates a time-ordered id: base36 milliseconds followed by a random
/// base36 suffix.
pub fn generate_scan_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}{}", to_base36(millis), suffix)
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

pub struct ScanCache {
    storage: Arc<dyn KeyValueStorage>,
    settings: CacheSettings,
}

impl ScanCache {
    pub fn new(storage: Arc<dyn KeyValueStorage>, settings: CacheSettings) -> Self {
        Self { storage, settings }
    }

    fn serialize(&self, record: &mut ScanRecord) -> Result<String> {
        let json = serde_json::to_string(record)?;
        if json.chars().count() <= self.settings.max_record_chars {
            return Ok(json);
        }

        tracing::warn!(
            "Scan record {:?} exceeds {} chars, dropping image",
            record.id(),
            self.settings.max_record_chars
        );
        record.image_ref.clear();
        Ok(serde_json::to_string(record)?)
    }

    /// Removes the lexicographically smallest scan keys.
    fn evict_oldest(&self) -> Result<usize> {
        let mut keys: Vec<String> = self
            .storage
            .keys()?
            .into_iter()
            .filter(|k| k.starts_with(SCAN_KEY_PREFIX))
            .collect();
        keys.sort();

        let victims: Vec<String> = keys.into_iter().take(self.settings.eviction_batch).collect();
        for key in &victims {
            self.storage.remove_item(key)?;
        }
        tracing::warn!("Storage full, evicted {} cached scans", victims.len());
        Ok(victims.len())
    }
}

impl ScanCacheRepository for ScanCache {
    fn put(&self, mut record: ScanRecord) -> Result<ScanRecord> {
        let id = match record.id() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => generate_scan_id(),
        };
        record.id = Some(id.clone());

        let key = scan_key(&id);
        let json = self.serialize(&mut record)?;

        match self.storage.set_item(&key, &json) {
            Ok(()) => {}
            Err(AcureError::StorageQuotaExceeded) => {
                self.evict_oldest()?;
                self.storage.set_item(&key, &json)?;
            }
            Err(e) => return Err(e),
        }

        tracing::debug!("Cached scan {}", id);
        Ok(record)
    }

    fn get(&self, id: &str) -> Result<Option<ScanRecord>> {
        let Some(raw) = self.storage.get_item(&scan_key(id))? else {
            return Ok(None);
        };

        match serde_json::from_str::<ScanRecord>(&raw) {
            Ok(record) => Ok(Some(record.with_id(id))),
            Err(e) => {
                tracing::error!("Cached scan {} is unreadable: {}", id, e);
                Ok(None)
            }
        }
    }

    fn list(&self) -> Result<Vec<ScanRecord>> {
        let mut ids: Vec<String> = self
            .storage
            .keys()?
            .into_iter()
            .filter_map(|k| k.strip_prefix(SCAN_KEY_PREFIX).map(str::to_string))
            .collect();
        ids.sort_by(|a, b| b.cmp(a));

        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = self.get(&id)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    fn remove(&self, id: &str) -> Result<()> {
        self.storage.remove_item(&scan_key(id))
    }
}
