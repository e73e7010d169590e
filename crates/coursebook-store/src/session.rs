//! File-backed session storage.
//!
//! The CLI plays the role of the browsing session, so the key→string
//! hand-off map lives in a JSON file between invocations. A missing or
//! corrupt file degrades to an empty map; it is never an error.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use coursebook_core::store::SessionStore;

/// Session storage persisted as a single JSON object on disk.
pub struct FileSessionStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileSessionStore {
    /// Open (or lazily create) the session file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn flush(&self, entries: &HashMap<String, String>) {
        let json = match serde_json::to_string_pretty(entries) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("failed to serialize session store: {e}");
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = std::fs::write(&self.path, json) {
            tracing::warn!(path = %self.path.display(), "failed to write session store: {e}");
        }
    }
}

fn load_entries(path: &Path) -> HashMap<String, String> {
    let Ok(raw) = std::fs::read_to_string(path) else {
        return HashMap::new();
    };
    match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %path.display(), "discarding corrupt session file: {e}");
            HashMap::new()
        }
    }
}

impl SessionStore for FileSessionStore {
    fn put(&self, key: &str, value: String) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), value);
        self.flush(&entries);
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap();
        if entries.remove(key).is_some() {
            self.flush(&entries);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileSessionStore::open(&path);
        store.put("quizResults:demo:ch1", r#"{"score":1}"#.to_string());

        let reopened = FileSessionStore::open(&path);
        assert_eq!(
            reopened.get("quizResults:demo:ch1").as_deref(),
            Some(r#"{"score":1}"#)
        );
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::open(dir.path().join("nope.json"));
        assert!(store.get("anything").is_none());
    }

    #[test]
    fn corrupt_file_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileSessionStore::open(&path);
        assert!(store.get("anything").is_none());

        // Writes still work after recovery.
        store.put("k", "v".to_string());
        assert_eq!(store.get("k").as_deref(), Some("v"));
    }
}
