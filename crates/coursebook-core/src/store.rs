//! Storage trait definitions.
//!
//! These seams are implemented by the `coursebook-store` crate: the
//! read-only static document store reached over HTTP, and the key→string
//! session storage used to hand quiz results between surfaces.

use async_trait::async_trait;
use serde_json::Value;

/// A read-only key→document lookup reachable by logical path.
///
/// Resolution never fails loudly: a missing resource, a non-success
/// status, and a parse failure all yield `None` ("absent"). Callers decide
/// their own fallback; absence is expected, not an error.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Resolve a logical path to a parsed document, or `None` if absent.
    async fn fetch(&self, path: &str) -> Option<Value>;
}

/// Key→string storage scoped to the browsing session.
///
/// Used to hand off a serialized [`crate::model::QuizResult`] from the
/// quiz surface to the results surface.
pub trait SessionStore: Send + Sync {
    fn put(&self, key: &str, value: String);
    fn get(&self, key: &str) -> Option<String>;
    fn remove(&self, key: &str);
}
