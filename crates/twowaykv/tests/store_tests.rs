//! Tests for opening the dual store and the dual-write discipline.

use twowaykv::{DualStore, Entry, StoreConfig};
use twowaykv_storage::{StorageEngine, Transaction};

#[test]
fn opens_both_maps_under_base_dir() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let store = DualStore::open(StoreConfig::new(dir.path())).expect("failed to open store");

    let (forward_rows, reverse_rows) = store.sizes().expect("failed to query sizes");
    assert_eq!((forward_rows, reverse_rows), (0, 0));

    assert!(dir.path().join("keysToValues").is_dir());
    assert!(dir.path().join("valuesToKeys").is_dir());
}

#[test]
fn open_fails_fast_on_unusable_base_dir() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    // A regular file where the base directory should be
    let blocker = dir.path().join("occupied");
    std::fs::write(&blocker, b"x").expect("failed to write blocker file");

    let result = DualStore::open(StoreConfig::new(&blocker));
    assert!(matches!(result, Err(twowaykv::Error::Open(_))));
}

#[test]
fn write_entry_updates_both_maps_byte_exactly() {
    let store = DualStore::open(StoreConfig::in_memory()).expect("failed to open store");

    store.write_entry(&Entry::new("testing", 999)).expect("failed to write entry");

    // Forward row: UTF-8 key bytes -> ASCII decimal value bytes
    let tx = store.forward().begin_read().expect("failed to begin read");
    assert_eq!(tx.get(b"testing").expect("failed to get"), Some(b"999".to_vec()));
    // The value string must not leak into the forward key space
    assert_eq!(tx.get(b"999").expect("failed to get"), None);

    // Reverse row: ASCII decimal value bytes -> UTF-8 key bytes
    let tx = store.reverse().begin_read().expect("failed to begin read");
    assert_eq!(tx.get(b"999").expect("failed to get"), Some(b"testing".to_vec()));
    assert_eq!(tx.get(b"testing").expect("failed to get"), None);
}

#[test]
fn reopen_recovers_entries_in_both_directions() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");

    {
        let store = DualStore::open(StoreConfig::new(dir.path())).expect("failed to open store");
        store.write_entry(&Entry::new("persistedKey", 234_235)).expect("failed to write entry");
    }

    let store = DualStore::open(StoreConfig::new(dir.path())).expect("failed to reopen store");
    let by_key = store.entry_by_key("persistedKey").expect("forward lookup after reopen");
    assert_eq!(by_key.value, 234_235);
    let by_value = store.entry_by_value(234_235).expect("reverse lookup after reopen");
    assert_eq!(by_value.key, "persistedKey");
}

#[test]
fn delete_entry_removes_both_sides() {
    let store = DualStore::open(StoreConfig::in_memory()).expect("failed to open store");
    let entry = Entry::new("doomed", 42);

    store.write_entry(&entry).expect("failed to write entry");
    store.delete_entry(&entry).expect("failed to delete entry");

    assert!(store.entry_by_key("doomed").expect_err("key must be gone").is_not_found());
    assert!(store.entry_by_value(42).expect_err("value must be gone").is_not_found());
    assert_eq!(store.sizes().expect("failed to query sizes"), (0, 0));
}

#[test]
fn staged_batches_flush_as_a_unit() {
    let store = DualStore::open(StoreConfig::in_memory()).expect("failed to open store");

    let (mut forward_tx, mut reverse_tx) = store.begin_batches().expect("failed to begin batches");
    for (i, key) in ["one", "two", "three"].iter().enumerate() {
        twowaykv::stage_entry(&mut forward_tx, &mut reverse_tx, &Entry::new(*key, i as u64 + 1))
            .expect("failed to stage entry");
    }

    // Staged writes are invisible before the flush
    assert!(store.entry_by_key("one").expect_err("not flushed yet").is_not_found());

    forward_tx.commit().expect("failed to flush forward batch");
    reverse_tx.commit().expect("failed to flush reverse batch");

    assert_eq!(store.entry_by_key("three").expect("flushed").value, 3);
    assert_eq!(store.entry_by_value(2).expect("flushed").key, "two");
}

#[test]
fn cancelled_batches_leave_no_partial_effect() {
    let store = DualStore::open(StoreConfig::in_memory()).expect("failed to open store");

    let (mut forward_tx, mut reverse_tx) = store.begin_batches().expect("failed to begin batches");
    twowaykv::stage_entry(&mut forward_tx, &mut reverse_tx, &Entry::new("ghost", 7))
        .expect("failed to stage entry");
    forward_tx.rollback().expect("failed to cancel forward batch");
    reverse_tx.rollback().expect("failed to cancel reverse batch");

    assert_eq!(store.sizes().expect("failed to query sizes"), (0, 0));
}
