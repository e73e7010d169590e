//! In-memory stores for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use coursebook_core::store::{DocumentStore, SessionStore};

/// An in-memory document store for exercising the engine without a server.
///
/// Holds a path→document fixture map and counts fetches so tests can
/// assert on caching behavior.
#[derive(Default)]
pub struct MemoryStore {
    docs: HashMap<String, Value>,
    fetch_count: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style fixture insertion.
    pub fn with(mut self, path: &str, doc: Value) -> Self {
        self.docs.insert(path.to_string(), doc);
        self
    }

    pub fn insert(&mut self, path: &str, doc: Value) {
        self.docs.insert(path.to_string(), doc);
    }

    /// Number of fetches made against this store.
    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn fetch(&self, path: &str) -> Option<Value> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);
        self.docs.get(path).cloned()
    }
}

/// In-memory session storage.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn put(&self, key: &str, value: String) {
        self.entries.lock().unwrap().insert(key.to_string(), value);
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}
