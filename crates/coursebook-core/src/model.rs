//! Core data model types for coursebook.
//!
//! These are the fundamental types the whole system uses to represent
//! courses, chapters, topics, and quizzes. Topic documents are classified
//! once, at parse time, into a tagged [`TopicDocument`]; the rest of the
//! code never inspects raw JSON shapes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Placeholder body rendered when a topic or chapter has no content.
pub const NO_CONTENT: &str = "No content.";

/// One entry of the course index (`index.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSummary {
    /// URL-safe unique identifier, stable across layouts.
    #[serde(alias = "id")]
    pub slug: String,
    /// Human-readable course title.
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A course: the root of the content hierarchy.
///
/// Loaded once per view session. `slug` is not part of the raw document;
/// it is filled in from the requested slug after deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    #[serde(default)]
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

/// A chapter within a course.
///
/// `topics` and `quiz_available` are derived annotations added during
/// course load; they are never part of the raw source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    /// Unique within the course (e.g. "ch1").
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    /// Canonical topic list resolved from the chapter's topic index.
    #[serde(skip)]
    pub topics: Vec<TopicRef>,
    /// Whether a standalone quiz exists for this chapter.
    #[serde(skip)]
    pub quiz_available: bool,
}

/// Reference to a topic file within a chapter.
///
/// `file` is unique within the chapter and doubles as the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRef {
    pub file: String,
    pub title: String,
}

/// A resolved topic document, classified at parse time.
///
/// The source data distinguishes quizzes from plain content purely by the
/// presence of a non-empty question list; that structural check happens
/// exactly once, in [`crate::normalize::classify_document`], and the rest
/// of the system matches on this enum.
#[derive(Debug, Clone, PartialEq)]
pub enum TopicDocument {
    Quiz(Quiz),
    Content(ContentDocument),
}

impl TopicDocument {
    /// True for a quiz document with at least one question.
    pub fn is_quiz(&self) -> bool {
        matches!(self, TopicDocument::Quiz(q) if !q.questions.is_empty())
    }
}

/// A plain content document: either an ordered list of text fragments or a
/// pre-rendered HTML body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDocument {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Vec<String>,
    #[serde(default)]
    pub content_html: Option<String>,
}

impl ContentDocument {
    /// Render the document body.
    ///
    /// Non-empty `content` fragments joined with a double line break win;
    /// otherwise `content_html` is used verbatim; otherwise the literal
    /// placeholder.
    pub fn body(&self) -> String {
        let fragments: Vec<&str> = self
            .content
            .iter()
            .map(|s| s.as_str())
            .filter(|s| !s.trim().is_empty())
            .collect();
        if !fragments.is_empty() {
            return fragments.join("\n\n");
        }
        if let Some(html) = &self.content_html {
            if !html.is_empty() {
                return html.clone();
            }
        }
        NO_CONTENT.to_string()
    }
}

/// Canonical quiz shape. Produced only by the quiz normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    #[serde(default = "default_quiz_title")]
    pub title: String,
    pub questions: Vec<Question>,
}

pub(crate) fn default_quiz_title() -> String {
    "Quiz".to_string()
}

/// A single quiz question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique within the quiz (e.g. "q1").
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: QuestionKind,
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(rename = "correctIndex", default)]
    pub correct_index: usize,
    #[serde(default)]
    pub explanation: String,
}

/// Question kind. Only `single` is scored today; unknown kinds are carried
/// through untouched so new kinds don't break old documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionKind {
    Single,
    Other(String),
}

impl Default for QuestionKind {
    fn default() -> Self {
        QuestionKind::Single
    }
}

impl From<String> for QuestionKind {
    fn from(s: String) -> Self {
        if s == "single" {
            QuestionKind::Single
        } else {
            QuestionKind::Other(s)
        }
    }
}

impl From<QuestionKind> for String {
    fn from(kind: QuestionKind) -> Self {
        match kind {
            QuestionKind::Single => "single".to_string(),
            QuestionKind::Other(s) => s,
        }
    }
}

/// Per-question review entry echoed into a [`QuizResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub selected_index: usize,
    pub correct_index: usize,
    #[serde(default)]
    pub explanation: String,
}

/// The persisted summary of a submitted quiz attempt.
///
/// Created at submission, handed off through the session store, and
/// consumed once by the results surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub title: String,
    pub slug: String,
    pub chapter_id: String,
    pub total: usize,
    pub score: usize,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub results: Vec<QuestionResult>,
}

/// The answer map of an in-flight attempt: question id → selected option
/// index.
pub type AnswerMap = HashMap<String, usize>;
