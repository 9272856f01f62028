//! Durable key-value slot holding the serialized problem collection
//!
//! The whole collection lives under one key as a single JSON array. Every save
//! replaces the blob; there is no per-item persistence and no schema version.

use crate::migration::repair_items;
use crate::problem::ProblemItem;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Key the collection is stored under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "currtenProblemItems";

/// A flat local key-value store
pub trait KeyValueStore: Send + Sync {
    /// Read the bytes stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace whatever is stored under `key`
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;
}

/// Key-value store keeping one file per key inside a directory
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let bytes =
            fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(bytes))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        // Write next to the target, then rename over it
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }
}

/// In-process key-value store
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.entries()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// Serialize a collection into the persisted blob
pub fn encode_items(items: &[ProblemItem]) -> Result<Vec<u8>> {
    serde_json::to_vec(items).context("Failed to encode problem items")
}

/// Decode a persisted blob and repair it
pub fn decode_items(bytes: &[u8]) -> Result<Vec<ProblemItem>> {
    let mut items: Vec<ProblemItem> =
        serde_json::from_slice(bytes).context("Failed to decode problem items")?;
    let report = repair_items(&mut items);
    if !report.is_clean() {
        tracing::warn!(
            duplicate_ids = report.duplicate_ids,
            timestamps = report.timestamps,
            "repaired persisted problem items"
        );
    }
    Ok(items)
}

/// The problem collection's slot in a key-value store
#[derive(Clone)]
pub struct Storage {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl Storage {
    pub fn new(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    /// Storage backed by `<dir>/<key>.json`
    pub fn in_dir(dir: impl AsRef<Path>, key: impl Into<String>) -> Self {
        Self::new(Arc::new(FileKeyValueStore::new(dir)), key)
    }

    /// Storage backed by an in-process map
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryKeyValueStore::new()), DEFAULT_STORAGE_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kv(&self) -> &Arc<dyn KeyValueStore> {
        &self.kv
    }

    /// Read the collection, reporting missing data as `None` and failures as errors
    pub fn try_load(&self) -> Result<Option<Vec<ProblemItem>>> {
        match self.kv.get(&self.key)? {
            Some(bytes) => decode_items(&bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Read the collection; missing or unreadable data yields an empty one
    pub fn load_all(&self) -> Vec<ProblemItem> {
        match self.try_load() {
            Ok(Some(items)) => items,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, "starting from an empty collection: {:#}", e);
                Vec::new()
            }
        }
    }

    /// Replace the stored collection with `items`
    pub fn save_all(&self, items: &[ProblemItem]) -> Result<()> {
        let bytes = encode_items(items)?;
        self.write_blob(&bytes)
    }

    /// Write an already encoded collection
    pub fn write_blob(&self, bytes: &[u8]) -> Result<()> {
        self.kv.set(&self.key, bytes)
    }
}
