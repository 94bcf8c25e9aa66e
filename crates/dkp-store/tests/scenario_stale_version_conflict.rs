//! Scenario: a write against a stale version is a conflict
//!
//! The store compares the caller's version with the current content hash.
//! On mismatch nothing is written and the caller gets a retryable conflict.

use std::sync::Arc;

use dkp_store::{DocumentStore, FsDocumentStore, InMemoryDocumentStore, StoreError};

fn exercise(store: Arc<dyn DocumentStore>) {
    let path = "data/player.json";
    let v1 = store.create(path, "[]", "Create").unwrap();

    let first = store.read(path).unwrap();
    assert_eq!(first.version, v1);

    let v2 = store
        .write(path, r#"[{"id":1,"name":"Olli","chars":[]}]"#, &first.version, "Update")
        .unwrap();
    assert_ne!(v1, v2);

    // A second writer still holding v1 loses.
    let err = store
        .write(path, r#"[{"id":2,"name":"Zelma","chars":[]}]"#, &v1, "Update")
        .unwrap_err();
    assert!(err.is_conflict(), "expected conflict, got {err:?}");

    let now = store.read(path).unwrap();
    assert_eq!(now.version, v2, "conflicting write must not land");
    assert!(now.content.contains("Olli"));

    let records = store.history().unwrap();
    assert_eq!(records.len(), 2, "rejected writes are not recorded");
}

#[test]
fn scenario_memory_store_rejects_stale_write() {
    exercise(Arc::new(InMemoryDocumentStore::new()));
}

#[test]
fn scenario_fs_store_rejects_stale_write() {
    let dir = tempfile::tempdir().unwrap();
    exercise(Arc::new(FsDocumentStore::open(dir.path()).unwrap()));
}

#[test]
fn scenario_create_twice_and_write_missing_fail() {
    let store = InMemoryDocumentStore::new();
    let v = store.create("data/raid.json", "[]", "Create").unwrap();
    assert_eq!(
        store.create("data/raid.json", "[]", "Create"),
        Err(StoreError::AlreadyExists {
            path: "data/raid.json".to_string()
        })
    );
    assert!(store
        .write("data/season.json", "[]", &v, "Update")
        .unwrap_err()
        .is_not_found());
}
