use std::sync::Arc;

use acure_core::config::CacheSettings;
use acure_core::scan::{Prediction, Recommendations, ScanCacheRepository, ScanRecord};
use acure_core::storage::KeyValueStorage;
use acure_infrastructure::{FileStorage, MemoryStorage, ScanCache};
use tempfile::TempDir;

fn small_record(id: &str) -> ScanRecord {
    ScanRecord::from_predictions(
        vec![Prediction::new("Cyst (Kista)", 0.9)],
        "",
        Recommendations::default(),
    )
    .with_id(id)
}

fn seed_filler(storage: &dyn KeyValueStorage) {
    for i in 0..7 {
        storage
            .set_item(&format!("scan_a{}", i), &"x".repeat(100))
            .unwrap();
    }
    storage.set_item("userToken", "tok").unwrap();
}

#[test]
fn quota_evicts_five_smallest_scan_keys_then_succeeds() {
    let storage = Arc::new(MemoryStorage::new(800));
    seed_filler(storage.as_ref());

    let cache = ScanCache::new(storage.clone(), CacheSettings::default());
    let stored = cache.put(small_record("new")).unwrap();
    assert_eq!(stored.id(), Some("new"));

    let mut keys = storage.keys().unwrap();
    keys.sort();
    assert_eq!(keys, vec!["scan_a5", "scan_a6", "scan_new", "userToken"]);
}

#[test]
fn second_quota_failure_propagates() {
    let storage = Arc::new(MemoryStorage::new(100));
    storage.set_item("scan_old", "x").unwrap();

    let cache = ScanCache::new(storage.clone(), CacheSettings::default());
    let err = cache.put(small_record("new")).unwrap_err();

    assert!(err.is_quota_exceeded());
    // The eviction still happened
    assert!(storage.get_item("scan_old").unwrap().is_none());
}

#[test]
fn file_backed_cache_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("local_storage.json");

    let id = {
        let storage = Arc::new(FileStorage::open(path.clone(), 5_242_880).unwrap());
        let cache = ScanCache::new(storage, CacheSettings::default());
        cache.put(ScanRecord::from_scores(&[0.1, 0.1, 0.6, 0.1, 0.1], "")).unwrap()
    };

    let storage = Arc::new(FileStorage::open(path, 5_242_880).unwrap());
    let cache = ScanCache::new(storage, CacheSettings::default());
    let cached = cache.get(id.id().unwrap()).unwrap().unwrap();

    assert_eq!(cached.dominant_label, "Papules (Jerawat Padat)");
    assert_eq!(cached.recommendations.severity, "Sedang");
}
