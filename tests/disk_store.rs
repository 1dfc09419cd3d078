use std::fs;

use supersequence_dp::{
    cost::Cost, store::DiskStore, CostStore, SuffixPair, SupersequenceError,
};

#[test]
fn values_survive_close_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("durable.db");

    let mut store = DiskStore::create(&path, 4, 4).unwrap();
    for i1 in 0..4 {
        for i2 in 0..4 {
            let digits: Vec<u8> = (0..i1 + i2).map(|k| ((k * 7 + i1) % 10) as u8).collect();
            store.put(SuffixPair::new(i1, i2), Cost::from_prefix(&digits)).unwrap();
        }
    }
    let written = store.size_bytes();
    store.close().unwrap();
    assert!(matches!(
        store.get(SuffixPair::new(0, 0)),
        Err(SupersequenceError::Closed)
    ));
    assert!(matches!(
        store.put(SuffixPair::new(0, 0), Cost::zero()),
        Err(SupersequenceError::Closed)
    ));

    let reopened = DiskStore::open(&path).unwrap();
    assert_eq!(reopened.dims(), (4, 4));
    assert_eq!(reopened.size_bytes(), written);
    for i1 in 0..4 {
        for i2 in 0..4 {
            let digits: Vec<u8> = (0..i1 + i2).map(|k| ((k * 7 + i1) % 10) as u8).collect();
            assert_eq!(reopened.get(SuffixPair::new(i1, i2)).unwrap().digits(), &digits[..]);
        }
    }
    reopened.destroy().unwrap();
    assert!(!path.exists());
}

#[test]
fn out_of_range_pairs_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = DiskStore::create(dir.path().join("range.db"), 2, 3).unwrap();
    assert!(matches!(
        store.put(SuffixPair::new(2, 0), Cost::zero()),
        Err(SupersequenceError::OutOfBounds { rows: 2, cols: 3, .. })
    ));
    assert!(matches!(
        store.get(SuffixPair::new(0, 3)),
        Err(SupersequenceError::OutOfBounds { .. })
    ));
    store.destroy().unwrap();
}

#[test]
fn foreign_file_is_not_a_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foreign.db");
    fs::write(&path, vec![0xAB; 64]).unwrap();
    assert!(matches!(
        DiskStore::open(&path),
        Err(SupersequenceError::CorruptStore(_))
    ));
}

#[test]
fn truncated_store_is_detected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.db");
    let mut created = DiskStore::create(&path, 10, 10).unwrap();
    created.close().unwrap();
    let file = fs::OpenOptions::new().write(true).open(&path).unwrap();
    file.set_len(100).unwrap();
    drop(file);
    assert!(matches!(
        DiskStore::open(&path),
        Err(SupersequenceError::CorruptStore(_))
    ));
}

#[test]
fn destroy_tolerates_an_already_removed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gone.db");
    let store = DiskStore::create(&path, 1, 1).unwrap();
    fs::remove_file(&path).unwrap();
    store.destroy().unwrap();
}

#[test]
fn unindexable_table_leaves_the_path_free() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("oversized.db");
    assert!(DiskStore::create(&path, usize::MAX, usize::MAX).is_err());
    assert!(!path.exists());

    let mut store = DiskStore::create(&path, 1, 1).unwrap();
    store.put(SuffixPair::new(0, 0), Cost::zero()).unwrap();
    assert_eq!(store.get(SuffixPair::new(0, 0)).unwrap(), Cost::zero());
    store.destroy().unwrap();
}
