//! Persistence tests: blob layout, corrupt data, blobs written by the mobile app
mod common;

use chrono::{TimeZone, Utc};
use common::{assert_same_collection, memory_store, t0};
use mind_backlog::storage::{DEFAULT_STORAGE_KEY, decode_items};
use mind_backlog::{
    FileKeyValueStore, KeyValueStore, ProblemItem, ProblemStatus, ProblemStore, Storage,
};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_blob_layout() {
    let storage = Storage::in_memory();
    let mut done = ProblemItem::start("Write report", "Draft outline", t0());
    done.set_status(ProblemStatus::Completed, t0());
    storage
        .save_all(&[ProblemItem::new("Fix leaking faucet", t0()), done])
        .unwrap();

    let bytes = storage.kv().get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let array = value.as_array().unwrap();
    assert_eq!(array.len(), 2);

    assert_eq!(array[0]["status"], "backlog");
    assert_eq!(array[0]["tasks"], serde_json::json!([]));
    assert!(array[0].get("completedAt").is_none());

    assert_eq!(array[1]["status"], "completed");
    assert_eq!(array[1]["tasks"][0]["text"], "Draft outline");
    assert_eq!(array[1]["tasks"][0]["isDone"], true);
    assert_eq!(array[1]["completedAt"], "2025-10-16T09:00:00Z");
    assert_eq!(array[1]["createdAt"], "2025-10-16T09:00:00Z");
    assert_eq!(array[1]["updatedAt"], "2025-10-16T09:00:00Z");
}

#[test]
fn test_round_trip_preserves_fields_and_order() {
    let storage = Storage::in_memory();
    let mut store = ProblemStore::open(storage.clone()).with_clock(common::stepping_clock());
    let a = store.add("alpha");
    let b = store.add_with_first_step("beta", "first");
    store.append_task(b.id, "second");
    store.set_status(a.id, ProblemStatus::Completed);

    assert_same_collection(store.items(), &storage.load_all());
}

#[test]
fn test_corrupt_blob_starts_empty() {
    let dir = TempDir::new().unwrap();
    let kv = FileKeyValueStore::new(dir.path());
    fs::write(kv.path_for(DEFAULT_STORAGE_KEY), b"\x00\x01 definitely not json").unwrap();

    let storage = Storage::new(Arc::new(kv), DEFAULT_STORAGE_KEY);
    assert!(storage.load_all().is_empty());

    let store = ProblemStore::open(storage);
    assert!(store.is_empty());
}

#[test]
fn test_wrong_shape_starts_empty() {
    let storage = Storage::in_memory();
    for blob in [
        r#"{"items": []}"#,
        r#"[{"id": "not-a-uuid", "problem": "x"}]"#,
        r#"[{"id": "E621E1F8-C36C-495A-93FC-0C247A3E6E5F", "problem": "x", "tasks": [], "status": "doing", "createdAt": 0, "updatedAt": 0}]"#,
    ] {
        storage.write_blob(blob.as_bytes()).unwrap();
        assert!(storage.load_all().is_empty(), "blob should be rejected: {}", blob);
    }
}

#[test]
fn test_carriage_returns_survive_reload() {
    let storage = Storage::in_memory();
    let mut store = ProblemStore::open(storage.clone());
    let item = store.add("line one\r\nline two");
    store.append_task(item.id, "a\rb");

    let loaded = storage.load_all();
    assert_eq!(loaded[0].problem, "line one\r\nline two");
    assert_eq!(loaded[0].tasks[0].text, "a\rb");
    assert_same_collection(store.items(), &loaded);

    let reopened = ProblemStore::open(storage);
    assert_eq!(reopened.items()[0].problem, "line one\r\nline two");
}

#[test]
fn test_out_of_range_timestamps_start_empty() {
    let storage = Storage::in_memory();
    for created_at in ["1e300", "-1e300", "9223372036854775807"] {
        let blob = format!(
            r#"[{{"id": "E621E1F8-C36C-495A-93FC-0C247A3E6E5F", "problem": "x", "tasks": [],
                "status": "backlog", "createdAt": {}, "updatedAt": 0}}]"#,
            created_at
        );
        storage.write_blob(blob.as_bytes()).unwrap();
        assert!(storage.try_load().is_err(), "createdAt {} should be rejected", created_at);
        assert!(storage.load_all().is_empty());
    }
}

#[test]
fn test_corrupt_store_is_overwritten_by_next_mutation() {
    let storage = Storage::in_memory();
    storage.write_blob(b"garbage").unwrap();

    let mut store = ProblemStore::open(storage.clone());
    store.add("fresh start");
    assert_eq!(storage.load_all().len(), 1);
}

#[test]
fn test_reads_mobile_app_blob() {
    let blob = r#"[
        {
            "id": "E621E1F8-C36C-495A-93FC-0C247A3E6E5F",
            "problem": "Fix leaking faucet",
            "tasks": [
                {"id": "C1A2B3C4-0000-4000-8000-000000000001", "task": "Buy washer", "isDone": true},
                {"id": "C1A2B3C4-0000-4000-8000-000000000002", "task": "Replace washer", "isDone": false}
            ],
            "status": "active",
            "createdAt": 782300000,
            "updatedAt": 782300100.5
        },
        {
            "id": "0F8FAD5B-D9CB-469F-A165-70867728950E",
            "problem": "Old worry",
            "tasks": [],
            "status": "completed",
            "completedAt": 782400000,
            "createdAt": 782200000,
            "updatedAt": 782400000
        }
    ]"#;

    let items = decode_items(blob.as_bytes()).unwrap();
    assert_eq!(items.len(), 2);

    let faucet = &items[0];
    assert_eq!(
        faucet.id.to_string(),
        "e621e1f8-c36c-495a-93fc-0c247a3e6e5f"
    );
    assert_eq!(faucet.status, ProblemStatus::Active);
    assert_eq!(faucet.tasks[0].text, "Buy washer");
    assert!(faucet.tasks[0].is_done);
    assert_eq!(faucet.tasks[1].text, "Replace washer");
    // 2001-01-01 + 782300000 s
    assert_eq!(
        faucet.created_at,
        Utc.with_ymd_and_hms(2025, 10, 16, 9, 33, 20).unwrap()
    );
    assert_eq!(faucet.updated_at.timestamp_subsec_millis(), 500);

    assert_eq!(items[1].status, ProblemStatus::Completed);
    assert!(items[1].completed_at.is_some());
}

#[test]
fn test_reencoding_mobile_blob_uses_current_layout() {
    let blob = r#"[{"id": "E621E1F8-C36C-495A-93FC-0C247A3E6E5F", "problem": "p",
        "tasks": [{"id": "C1A2B3C4-0000-4000-8000-000000000001", "task": "t", "isDone": false}],
        "status": "backlog", "createdAt": 0, "updatedAt": 0}]"#;
    let storage = Storage::in_memory();
    storage.write_blob(blob.as_bytes()).unwrap();

    let items = storage.load_all();
    storage.save_all(&items).unwrap();

    let bytes = storage.kv().get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value[0]["tasks"][0]["text"], "t");
    assert!(value[0]["tasks"][0].get("task").is_none());
    assert_eq!(value[0]["createdAt"], "2001-01-01T00:00:00Z");
}

#[test]
fn test_repairs_applied_on_load() {
    let blob = r#"[
        {"id": "E621E1F8-C36C-495A-93FC-0C247A3E6E5F", "problem": "first", "tasks": [],
         "status": "backlog", "createdAt": "2025-01-02T00:00:00Z", "updatedAt": "2025-01-01T00:00:00Z"},
        {"id": "E621E1F8-C36C-495A-93FC-0C247A3E6E5F", "problem": "second\r\nline", "tasks": [],
         "status": "completed", "createdAt": "2025-01-01T00:00:00Z", "updatedAt": "2025-01-03T00:00:00Z"}
    ]"#;

    let items = decode_items(blob.as_bytes()).unwrap();
    assert_ne!(items[0].id, items[1].id);
    assert_eq!(items[0].updated_at, items[0].created_at);
    assert_eq!(items[1].problem, "second\r\nline");
    assert_eq!(items[1].completed_at, Some(items[1].updated_at));
}

#[test]
fn test_custom_key_is_isolated() {
    let dir = TempDir::new().unwrap();
    let default_storage = Storage::in_dir(dir.path(), DEFAULT_STORAGE_KEY);
    let other_storage = Storage::in_dir(dir.path(), "otherProblems");

    let mut store = ProblemStore::open(other_storage.clone());
    store.add("kept apart");

    assert!(default_storage.load_all().is_empty());
    assert_eq!(other_storage.load_all().len(), 1);
    assert!(dir.path().join("otherProblems.json").exists());
}

#[test]
fn test_memory_store_reload_after_external_write() {
    let mut store = memory_store();
    store.add("one");
    store.storage().save_all(&[]).unwrap();
    assert_eq!(store.len(), 1);
    store.reload();
    assert!(store.is_empty());
}
