//! Normalizers for heterogeneous source documents.
//!
//! The static document store carries two generations of data: topic
//! indexes mixing bare filenames with descriptor objects, and quiz
//! documents in two historical shapes. Everything is reconciled here, at
//! the boundary, into the canonical model types.

use serde::Deserialize;
use serde_json::Value;

use crate::model::{
    default_quiz_title, ContentDocument, Question, Quiz, TopicDocument, TopicRef,
};

/// Reserved filename suffix identifying a quiz document.
pub const QUIZ_SUFFIX: &str = "quiz.json";

/// True if the filename identifies a quiz (case-insensitive suffix match).
pub fn is_quiz_file(file: &str) -> bool {
    file.to_ascii_lowercase().ends_with(QUIZ_SUFFIX)
}

/// One raw entry of a topic index: either a bare filename or a partial
/// descriptor object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTopicEntry {
    Name(String),
    Descriptor {
        file: String,
        #[serde(default)]
        title: Option<String>,
    },
}

/// Topic index wrapper: some indexes are a bare array, some nest the array
/// under `topics`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTopicIndex {
    Bare(Vec<RawTopicEntry>),
    Wrapped { topics: Vec<RawTopicEntry> },
}

/// The canonical result of normalizing a topic index: ordinary topics in
/// order, with any quiz entry separated out into its own slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicIndex {
    pub topics: Vec<TopicRef>,
    /// Quiz entry pulled out of the topic sequence, if the index had one.
    /// Quizzes route to a dedicated surface instead of being navigable
    /// topics.
    pub quiz: Option<TopicRef>,
}

/// Normalize a raw topic index document into canonical [`TopicRef`]s.
///
/// Returns an empty index when the document does not look like a topic
/// index at all.
pub fn normalize_topics(raw: &Value) -> TopicIndex {
    let entries = match serde_json::from_value::<RawTopicIndex>(raw.clone()) {
        Ok(RawTopicIndex::Bare(entries)) | Ok(RawTopicIndex::Wrapped { topics: entries }) => {
            entries
        }
        Err(e) => {
            tracing::debug!("unrecognized topic index shape: {e}");
            return TopicIndex::default();
        }
    };

    let mut index = TopicIndex::default();
    for entry in entries {
        let topic = match entry {
            RawTopicEntry::Name(file) => {
                let title = derive_title(&file);
                TopicRef { file, title }
            }
            RawTopicEntry::Descriptor { file, title } => {
                let title = title
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| derive_title(&file));
                TopicRef { file, title }
            }
        };
        if is_quiz_file(&topic.file) {
            index.quiz = Some(topic);
        } else {
            index.topics.push(topic);
        }
    }
    index
}

/// Derive a display title from a topic filename.
///
/// `"03-intro-shell.json"` becomes `"Intro Shell"`: the leading
/// `<digits>-` prefix and the `.json` suffix are stripped, separators
/// become spaces, and each word is title-cased. Idempotent under
/// re-derivation.
pub fn derive_title(file: &str) -> String {
    let mut stem = file;
    if let Some(rest) = strip_suffix_ignore_case(stem, ".json") {
        stem = rest;
    }
    let digits = stem.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 && stem[digits..].starts_with('-') {
        stem = &stem[digits + 1..];
    }

    stem.split(['-', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    if s.len() >= suffix.len() && s[s.len() - suffix.len()..].eq_ignore_ascii_case(suffix) {
        Some(&s[..s.len() - suffix.len()])
    } else {
        None
    }
}

/// Raw quiz document covering both historical shapes.
///
/// Shape (a) carries a top-level `questions` array; shape (b) nests it
/// under `quiz` and may use `choices`/`answerIndex` for the per-question
/// fields. The aliases on [`RawQuestion`] absorb both.
#[derive(Debug, Deserialize)]
struct RawQuizDocument {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    questions: Option<Vec<RawQuestion>>,
    #[serde(default)]
    quiz: Option<RawNestedQuiz>,
}

#[derive(Debug, Deserialize)]
struct RawNestedQuiz {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    questions: Option<Vec<RawQuestion>>,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(default)]
    id: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    question: String,
    #[serde(default, alias = "choices")]
    options: Vec<String>,
    #[serde(rename = "correctIndex", default, alias = "answerIndex")]
    correct_index: usize,
    #[serde(default)]
    explanation: String,
}

impl From<RawQuestion> for Question {
    fn from(raw: RawQuestion) -> Self {
        Question {
            id: raw.id,
            kind: raw.kind.unwrap_or_else(|| "single".to_string()).into(),
            question: raw.question,
            options: raw.options,
            correct_index: raw.correct_index,
            explanation: raw.explanation,
        }
    }
}

/// Reconcile a raw quiz-shaped document into the canonical [`Quiz`].
///
/// Returns `None` when neither historical shape yields a non-empty
/// question list. Applying the normalizer to already-canonical output is a
/// no-op.
pub fn normalize_quiz(raw: &Value) -> Option<Quiz> {
    let doc = match serde_json::from_value::<RawQuizDocument>(raw.clone()) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::debug!("unrecognized quiz shape: {e}");
            return None;
        }
    };

    let nested_title = doc.quiz.as_ref().and_then(|q| q.title.clone());
    let questions = match doc.questions {
        Some(qs) if !qs.is_empty() => qs,
        _ => match doc.quiz.and_then(|q| q.questions) {
            Some(qs) if !qs.is_empty() => qs,
            _ => return None,
        },
    };

    Some(Quiz {
        title: doc
            .title
            .or(nested_title)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(default_quiz_title),
        questions: questions.into_iter().map(Question::from).collect(),
    })
}

/// Classify a fetched topic document.
///
/// The structural check (does this document carry a non-empty question
/// list, directly or nested) happens here and nowhere else. Anything that
/// is not a quiz becomes a content document; a document matching neither
/// shape degrades to an empty content document that renders the
/// placeholder.
pub fn classify_document(raw: &Value) -> TopicDocument {
    if let Some(quiz) = normalize_quiz(raw) {
        return TopicDocument::Quiz(quiz);
    }
    match serde_json::from_value::<ContentDocument>(raw.clone()) {
        Ok(doc) => TopicDocument::Content(doc),
        Err(e) => {
            tracing::debug!("unrecognized content shape: {e}");
            TopicDocument::Content(ContentDocument::default())
        }
    }
}
