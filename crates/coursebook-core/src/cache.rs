//! Session-scoped memoization of resolved topic documents.

use std::collections::HashMap;

use crate::model::TopicDocument;
use crate::normalize::is_quiz_file;

/// Memoizes resolved topic documents by filename for one course-view
/// session. No TTL, no size bound, no cross-session persistence: course
/// content sets are small and the cache dies with the session.
#[derive(Debug, Default)]
pub struct ContentCache {
    entries: HashMap<String, TopicDocument>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached document.
    ///
    /// Self-healing: an entry at a quiz-suffixed key whose value is not a
    /// quiz with questions is evicted and reported as a miss, so a stale
    /// non-quiz value can never shadow what should resolve as a quiz.
    pub fn get(&mut self, key: &str) -> Option<&TopicDocument> {
        let poisoned = self
            .entries
            .get(key)
            .is_some_and(|doc| is_quiz_file(key) && !doc.is_quiz());
        if poisoned {
            tracing::warn!(key, "evicting non-quiz value cached under quiz key");
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, doc: TopicDocument) {
        self.entries.insert(key.into(), doc);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
