//! Common test utilities for integration tests
#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use mind_backlog::{BacklogHandler, Clock, Config, ProblemItem, ProblemStore, Storage};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Fixed starting point for test clocks
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 16, 9, 0, 0).unwrap()
}

/// Clock advancing one second per reading, starting just after `t0()`
pub fn stepping_clock() -> Clock {
    let ticks = Mutex::new(0i64);
    Arc::new(move || {
        let mut ticks = ticks.lock().unwrap();
        *ticks += 1;
        t0() + Duration::seconds(*ticks)
    })
}

/// Store over an in-memory key-value store
pub fn memory_store() -> ProblemStore {
    ProblemStore::open(Storage::in_memory()).with_clock(stepping_clock())
}

/// Store over a temporary directory; keep the `TempDir` alive while using it
pub fn file_store() -> (ProblemStore, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = ProblemStore::open(Storage::in_dir(dir.path(), "currtenProblemItems"))
        .with_clock(stepping_clock());
    (store, dir)
}

/// Create a test handler with temporary storage
pub fn get_test_handler() -> (BacklogHandler, TempDir) {
    let dir = TempDir::new().unwrap();
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        ..Config::default()
    };
    (BacklogHandler::new(&config), dir)
}

/// Extract the short ID from a handler response
/// Response format: "... with ID: <id>" optionally followed by " (...)"
pub fn extract_id_from_response(response: &str) -> String {
    let start = response.find("ID: ").expect("response has an ID") + 4;
    response[start..]
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_string()
}

/// Compare two items field by field, not just by id
pub fn assert_same_fields(left: &ProblemItem, right: &ProblemItem) {
    assert_eq!(
        serde_json::to_value(left).unwrap(),
        serde_json::to_value(right).unwrap()
    );
}

pub fn assert_same_collection(left: &[ProblemItem], right: &[ProblemItem]) {
    assert_eq!(left.len(), right.len());
    for (l, r) in left.iter().zip(right) {
        assert_same_fields(l, r);
    }
}
