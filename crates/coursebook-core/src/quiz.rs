//! The quiz attempt state machine.
//!
//! An attempt moves strictly forward: not-started → in-progress →
//! completed. There is no regression once completed; opening the quiz
//! surface again builds a wholly new attempt with a clean answer map.

use thiserror::Error;

use crate::model::{AnswerMap, Question, QuestionKind, QuestionResult, Quiz, QuizResult};
use crate::normalize::normalize_quiz;
use crate::paths;
use crate::store::{DocumentStore, SessionStore};

/// Lifecycle state of one quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttemptState {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

/// Recoverable failures of the quiz workflow. Each maps to a user-facing
/// prompt; none of them change attempt state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("the quiz has already been started")]
    AlreadyStarted,

    #[error("the quiz is not in progress")]
    NotInProgress,

    #[error("unknown question id: {0}")]
    UnknownQuestion(String),

    #[error("please select an answer before continuing")]
    AnswerRequired { id: String },

    #[error("please answer all questions before submitting ({} unanswered)", missing.len())]
    Unanswered { missing: Vec<String> },
}

/// Outcome of [`QuizAttempt::advance`] in the paginated flow.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Moved on to the question at this index.
    Next(usize),
    /// Was on the last question; the attempt was submitted.
    Submitted(QuizResult),
}

/// The transient state of answering one quiz instance.
///
/// Distinct from the persisted [`QuizResult`] produced at submission.
#[derive(Debug, Clone)]
pub struct QuizAttempt {
    quiz: Quiz,
    slug: String,
    chapter_id: String,
    answers: AnswerMap,
    state: AttemptState,
    current: usize,
}

impl QuizAttempt {
    /// Build an attempt in the not-started state.
    pub fn new(quiz: Quiz, slug: impl Into<String>, chapter_id: impl Into<String>) -> Self {
        Self {
            quiz,
            slug: slug.into(),
            chapter_id: chapter_id.into(),
            answers: AnswerMap::new(),
            state: AttemptState::NotStarted,
            current: 0,
        }
    }

    /// Build an attempt that is already in progress, as the dedicated quiz
    /// surface does: a visit to the page begins the attempt.
    pub fn begin(quiz: Quiz, slug: impl Into<String>, chapter_id: impl Into<String>) -> Self {
        let mut attempt = Self::new(quiz, slug, chapter_id);
        attempt.state = AttemptState::InProgress;
        attempt
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    /// Index of the current question in the paginated flow.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.questions.get(self.current)
    }

    /// Transition not-started → in-progress.
    pub fn start(&mut self) -> Result<(), QuizError> {
        match self.state {
            AttemptState::NotStarted => {
                self.state = AttemptState::InProgress;
                Ok(())
            }
            _ => Err(QuizError::AlreadyStarted),
        }
    }

    /// Record (or overwrite) the answer for a question.
    ///
    /// Only legal while in progress. The selected index is not
    /// bounds-checked against the options here; scoring validates it
    /// implicitly by exact match. Unknown question ids are rejected so the
    /// answer map can never reference a question the quiz does not have.
    pub fn record_answer(&mut self, question_id: &str, selected: usize) -> Result<(), QuizError> {
        if self.state != AttemptState::InProgress {
            return Err(QuizError::NotInProgress);
        }
        if !self.quiz.questions.iter().any(|q| q.id == question_id) {
            return Err(QuizError::UnknownQuestion(question_id.to_string()));
        }
        self.answers.insert(question_id.to_string(), selected);
        Ok(())
    }

    /// Paginated flow: move to the next question, or submit when on the
    /// last one. Blocks (without state change) while the current question
    /// has no recorded answer.
    pub fn advance(&mut self) -> Result<Advance, QuizError> {
        if self.state != AttemptState::InProgress {
            return Err(QuizError::NotInProgress);
        }
        let Some(question) = self.quiz.questions.get(self.current) else {
            return Ok(Advance::Submitted(self.submit()?));
        };
        if !self.answers.contains_key(&question.id) {
            return Err(QuizError::AnswerRequired {
                id: question.id.clone(),
            });
        }
        if self.current + 1 < self.quiz.questions.len() {
            self.current += 1;
            Ok(Advance::Next(self.current))
        } else {
            Ok(Advance::Submitted(self.submit()?))
        }
    }

    /// Current score: count of `single` questions whose recorded answer
    /// exactly matches the correct index. Pure: repeated calls change
    /// nothing.
    pub fn score(&self) -> usize {
        self.quiz
            .questions
            .iter()
            .filter(|q| q.kind == QuestionKind::Single)
            .filter(|q| self.answers.get(&q.id) == Some(&q.correct_index))
            .count()
    }

    /// Submit the attempt.
    ///
    /// Completeness is checked as a single batch: if any question has no
    /// recorded answer the submission blocks, state stays in-progress, and
    /// the missing ids are reported. On success the attempt transitions to
    /// completed and yields the result payload for the review surface.
    pub fn submit(&mut self) -> Result<QuizResult, QuizError> {
        if self.state != AttemptState::InProgress {
            return Err(QuizError::NotInProgress);
        }
        let missing: Vec<String> = self
            .quiz
            .questions
            .iter()
            .filter(|q| !self.answers.contains_key(&q.id))
            .map(|q| q.id.clone())
            .collect();
        if !missing.is_empty() {
            return Err(QuizError::Unanswered { missing });
        }

        let results = self
            .quiz
            .questions
            .iter()
            .map(|q| QuestionResult {
                id: q.id.clone(),
                question: q.question.clone(),
                options: q.options.clone(),
                selected_index: self.answers[&q.id],
                correct_index: q.correct_index,
                explanation: q.explanation.clone(),
            })
            .collect();

        self.state = AttemptState::Completed;
        Ok(QuizResult {
            title: self.quiz.title.clone(),
            slug: self.slug.clone(),
            chapter_id: self.chapter_id.clone(),
            total: self.quiz.questions.len(),
            score: self.score(),
            submitted_at: chrono::Utc::now(),
            results,
        })
    }
}

/// Resolve the standalone quiz for a chapter, trying the flattened layout
/// then the legacy one. Absent or shapeless documents yield `None`.
pub async fn resolve_quiz<S: DocumentStore + ?Sized>(
    store: &S,
    slug: &str,
    chapter_id: &str,
) -> Option<Quiz> {
    let vars = [("slug", slug), ("chapter", chapter_id)];
    let raw = paths::resolve_first(store, paths::CHAPTER_QUIZ, &vars).await?;
    normalize_quiz(&raw)
}

/// Storage key for the persisted result of a chapter's quiz.
pub fn results_key(slug: &str, chapter_id: &str) -> String {
    format!("quizResults:{slug}:{chapter_id}")
}

/// Persist a result for the results surface to pick up.
pub fn store_result<P: SessionStore + ?Sized>(store: &P, result: &QuizResult) {
    match serde_json::to_string(result) {
        Ok(json) => store.put(&results_key(&result.slug, &result.chapter_id), json),
        Err(e) => tracing::warn!("failed to serialize quiz result: {e}"),
    }
}

/// Read back a persisted result. Corrupt payloads degrade to "no payload"
/// rather than propagating.
pub fn load_result<P: SessionStore + ?Sized>(
    store: &P,
    slug: &str,
    chapter_id: &str,
) -> Option<QuizResult> {
    let raw = store.get(&results_key(slug, chapter_id))?;
    match serde_json::from_str(&raw) {
        Ok(result) => Some(result),
        Err(e) => {
            tracing::warn!("discarding corrupt quiz result payload: {e}");
            None
        }
    }
}

/// Read and consume a persisted result. The hand-off payload is meant for
/// exactly one read by the results surface; it is removed either way once
/// the key exists.
pub fn take_result<P: SessionStore + ?Sized>(
    store: &P,
    slug: &str,
    chapter_id: &str,
) -> Option<QuizResult> {
    let result = load_result(store, slug, chapter_id);
    store.remove(&results_key(slug, chapter_id));
    result
}
