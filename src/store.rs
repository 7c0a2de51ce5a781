//! # Log Store
//!
//! Ordered-list persistence behind the drift tracker and weight learner.
//! The engines treat a store as an opaque keyed list with read-all, set, and
//! append semantics; all capping/trimming is done by the engines themselves,
//! never by the store.
//!
//! `MemoryStore` is the in-process default and the testing fake.
//! `JsonFileStore` keeps one pretty-printed JSON file per key under a
//! directory, for small single-writer deployments.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Keyed ordered-list store. Appends must be serialized by the caller side
/// (single writer per key); both built-in stores take an internal lock so
/// in-process concurrent appends stay consistent.
pub trait LogStore {
    /// Read the full list under `key`. Unreadable or mistyped entries are
    /// skipped rather than failing the read.
    fn get<T: DeserializeOwned>(&self, key: &str) -> Vec<T>;

    /// Replace the list under `key`. Best-effort; failures are logged.
    fn set<T: Serialize>(&self, key: &str, items: &[T]);

    /// Append one item to the list under `key`.
    fn append<T: Serialize>(&self, key: &str, item: &T);
}

/// In-memory store: a mutex-guarded map of JSON value lists.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LogStore for MemoryStore {
    fn get<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let map = self.inner.lock().expect("memory store mutex poisoned");
        map.get(key)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| serde_json::from_value(v.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn set<T: Serialize>(&self, key: &str, items: &[T]) {
        let values: Vec<Value> = items
            .iter()
            .filter_map(|item| serde_json::to_value(item).ok())
            .collect();
        let mut map = self.inner.lock().expect("memory store mutex poisoned");
        map.insert(key.to_string(), values);
    }

    fn append<T: Serialize>(&self, key: &str, item: &T) {
        let Ok(value) = serde_json::to_value(item) else {
            warn!(target: "store", key, "unserializable item dropped");
            return;
        };
        let mut map = self.inner.lock().expect("memory store mutex poisoned");
        map.entry(key.to_string()).or_default().push(value);
    }
}

/// File-backed store: `<dir>/<key>.json` holding a JSON array per key.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are engine-chosen identifiers; sanitize anyway so a company id
        // with a path separator cannot escape the store directory.
        let safe: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }

    fn read_values(&self, key: &str) -> Vec<Value> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }

    fn write_values(&self, key: &str, values: &[Value]) {
        if let Err(e) = fs::create_dir_all(&self.dir) {
            warn!(target: "store", key, "store dir: {e:#}");
            return;
        }
        let body = serde_json::to_vec_pretty(values).unwrap_or_default();
        if let Err(e) = fs::write(self.path_for(key), body) {
            warn!(target: "store", key, "write store file: {e:#}");
        }
    }
}

impl LogStore for JsonFileStore {
    fn get<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let _guard = self.lock.lock().expect("file store mutex poisoned");
        self.read_values(key)
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect()
    }

    fn set<T: Serialize>(&self, key: &str, items: &[T]) {
        let values: Vec<Value> = items
            .iter()
            .filter_map(|item| serde_json::to_value(item).ok())
            .collect();
        let _guard = self.lock.lock().expect("file store mutex poisoned");
        self.write_values(key, &values);
    }

    fn append<T: Serialize>(&self, key: &str, item: &T) {
        let Ok(value) = serde_json::to_value(item) else {
            warn!(target: "store", key, "unserializable item dropped");
            return;
        };
        let _guard = self.lock.lock().expect("file store mutex poisoned");
        let mut values = self.read_values(key);
        values.push(value);
        self.write_values(key, &values);
    }
}
