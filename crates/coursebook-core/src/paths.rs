//! Logical-to-physical path resolution.
//!
//! The document store has gone through two on-disk layouts: the current
//! flattened one (`<slug>/<chapter>/...`) and the legacy nested one
//! (`<slug>/chapters/<chapter>/...`). Each logical resource maps to an
//! ordered candidate list tried in sequence; only after every candidate is
//! absent does the resource count as missing. Adding a third layout is a
//! data change here, not new branching logic.

use serde_json::Value;

use crate::store::DocumentStore;

/// The course index listing all courses.
pub const COURSE_INDEX: &str = "index.json";

/// A course document. The course file never moved between layouts.
pub const COURSE: &str = "{slug}/course.json";

/// A chapter's topic index, flattened then legacy.
pub const TOPIC_INDEX: &[&str] = &[
    "{slug}/{chapter}/topics.json",
    "{slug}/chapters/{chapter}/topics.json",
];

/// A chapter's fallback content document, flattened then legacy.
pub const CHAPTER_CONTENT: &[&str] = &[
    "{slug}/{chapter}/content.json",
    "{slug}/chapters/{chapter}/content.json",
];

/// A chapter's standalone quiz document, flattened then legacy.
pub const CHAPTER_QUIZ: &[&str] = &[
    "{slug}/{chapter}/quiz.json",
    "{slug}/chapters/{chapter}/quiz.json",
];

/// An individual topic file within a chapter, flattened then legacy.
pub const TOPIC_FILE: &[&str] = &[
    "{slug}/{chapter}/{file}",
    "{slug}/chapters/{chapter}/{file}",
];

/// Render a path template by substituting `{name}` placeholders.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in vars {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}

/// Try each candidate template in order, returning the first present
/// document. A final `None` means the resource does not exist in any
/// layout.
pub async fn resolve_first<S: DocumentStore + ?Sized>(
    store: &S,
    templates: &[&str],
    vars: &[(&str, &str)],
) -> Option<Value> {
    for template in templates {
        let path = render(template, vars);
        if let Some(doc) = store.fetch(&path).await {
            return Some(doc);
        }
        tracing::debug!(path, "document absent, trying next layout");
    }
    None
}
