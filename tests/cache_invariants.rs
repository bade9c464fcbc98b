use std::fs;

use chrono::{TimeZone, Utc};
use farm_insight_core::cache::{news_cache_ttl, CacheEntry, CacheStore, ManualClock};
use farm_insight_core::types::CacheKey;
use tempfile::tempdir;

fn store(root: &std::path::Path) -> CacheStore<ManualClock> {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
    CacheStore::with_clock(root, news_cache_ttl(), clock).unwrap()
}

fn entry_path(root: &std::path::Path, key: &CacheKey) -> std::path::PathBuf {
    root.join(format!("{}.json", key.file_stem()))
}

#[test]
fn invariant_one_file_per_key_named_by_hash() {
    let dir = tempdir().unwrap();
    let store = store(dir.path());
    let key = CacheKey::for_region("United States");

    store.set(&key, &"payload").unwrap();

    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![format!("{}.json", key.file_stem())]);
    assert_eq!(key.file_stem().len(), 16);
    assert!(key.file_stem().chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn invariant_no_temp_files_left_after_write() {
    let dir = tempdir().unwrap();
    let store = store(dir.path());

    for i in 0..5 {
        store.set(&CacheKey::for_region("Iowa"), &i).unwrap();
    }

    let leftovers = fs::read_dir(dir.path())
        .unwrap()
        .filter(|e| e.as_ref().unwrap().path().extension().map_or(false, |ext| ext == "tmp"))
        .count();
    assert_eq!(leftovers, 0);
}

#[test]
fn corrupt_entry_is_a_miss() {
    let dir = tempdir().unwrap();
    let store = store(dir.path());
    let key = CacheKey::for_region("Iowa");

    store.set(&key, &vec!["ok".to_string()]).unwrap();
    fs::write(entry_path(dir.path(), &key), b"{ not json").unwrap();

    assert!(store.get::<Vec<String>>(&key).is_none());
}

#[test]
fn payload_shape_mismatch_is_a_miss() {
    let dir = tempdir().unwrap();
    let store = store(dir.path());
    let key = CacheKey::for_region("Iowa");

    store.set(&key, &"a string").unwrap();
    assert!(store.get::<Vec<u32>>(&key).is_none());
}

#[test]
fn stored_key_mismatch_is_a_miss() {
    let dir = tempdir().unwrap();
    let store = store(dir.path());
    let key = CacheKey::for_region("Iowa");

    let foreign = CacheEntry::v1(
        CacheKey::for_region("Kansas"),
        7u32,
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
    );
    fs::write(entry_path(dir.path(), &key), serde_json::to_vec(&foreign).unwrap()).unwrap();

    assert!(store.get::<u32>(&key).is_none());
}

#[test]
fn unknown_format_is_a_miss() {
    let dir = tempdir().unwrap();
    let store = store(dir.path());
    let key = CacheKey::for_region("Iowa");

    let stored_at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let mut entry = CacheEntry::v1(key.clone(), 7u32, stored_at);
    entry.format = "cache-entry/99".into();
    fs::write(entry_path(dir.path(), &key), serde_json::to_vec(&entry).unwrap()).unwrap();

    assert!(store.get::<u32>(&key).is_none());
}

#[test]
fn open_creates_missing_root() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let store = CacheStore::open(&nested).unwrap();
    assert!(nested.is_dir());
    assert_eq!(store.root(), nested.as_path());
    assert_eq!(store.ttl(), news_cache_ttl());
}
