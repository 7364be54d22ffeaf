//! Dataset store: the immutable question collection and its per-book counts.
//!
//! The backing resource is a single JSON document:
//!   { "metadata": { "books": [ { "title", "questionCount" } ] }, "questions": [ ... ] }
//!
//! It is read once at startup and shared read-only (behind an `Arc`) by every
//! request afterwards. Book metadata served to callers is always derived from
//! `questions`, in first-seen order, so counts can never drift from the data.

use std::{collections::HashSet, path::Path};

use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::domain::{Answer, BookMetadata, Question, QuestionId, QuestionKind};
use crate::error::QuizError;
use crate::util::eq_ignore_case;

#[derive(Debug, Deserialize)]
struct DatasetFile {
    #[serde(default)]
    metadata: Option<DeclaredMetadata>,
    questions: Vec<Question>,
}

#[derive(Debug, Deserialize, Default)]
struct DeclaredMetadata {
    #[serde(default)]
    books: Vec<BookMetadata>,
}

#[derive(Debug, Clone)]
pub struct Dataset {
    questions: Vec<Question>,
    books: Vec<BookMetadata>,
}

impl Dataset {
    /// Read and validate the dataset at `path`.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, QuizError> {
        let label = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|e| QuizError::data_unavailable(&label, e))?;
        let ds = Self::from_json_str(&label, &raw)?;
        info!(target: "book_quest", %label, questions = ds.questions.len(), books = ds.books.len(), "Dataset loaded");
        Ok(ds)
    }

    /// Parse and validate a dataset document. `label` only feeds error messages.
    pub fn from_json_str(label: &str, raw: &str) -> Result<Self, QuizError> {
        let file: DatasetFile =
            serde_json::from_str(raw).map_err(|e| QuizError::data_unavailable(label, e))?;
        Self::from_parts(label, file.questions, file.metadata.unwrap_or_default().books)
    }

    #[cfg(test)]
    pub fn from_questions(questions: Vec<Question>) -> Result<Self, QuizError> {
        Self::from_parts("<memory>", questions, Vec::new())
    }

    fn from_parts(label: &str, questions: Vec<Question>, declared: Vec<BookMetadata>) -> Result<Self, QuizError> {
        validate(label, &questions)?;
        let books = derive_books(&questions);

        for d in &declared {
            let derived = books.iter().find(|b| b.title == d.title).map_or(0, |b| b.question_count);
            if derived != d.question_count {
                warn!(target: "book_quest", title = %d.title, declared = d.question_count, derived, "Declared book count disagrees with questions; using derived count");
            }
        }

        Ok(Self { questions, books })
    }

    /// Complete collection in file order. Same slice on every call.
    pub fn all_questions(&self) -> &[Question] {
        &self.questions
    }

    /// One entry per distinct `bookTitle`, in first-seen order.
    pub fn metadata(&self) -> &[BookMetadata] {
        &self.books
    }

    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

fn derive_books(questions: &[Question]) -> Vec<BookMetadata> {
    let mut books: Vec<BookMetadata> = Vec::new();
    for q in questions {
        match books.iter_mut().find(|b| b.title == q.book_title) {
            Some(b) => b.question_count += 1,
            None => books.push(BookMetadata { title: q.book_title.clone(), question_count: 1 }),
        }
    }
    books
}

fn validate(label: &str, questions: &[Question]) -> Result<(), QuizError> {
    let mut seen = HashSet::with_capacity(questions.len());
    for q in questions {
        if !seen.insert(q.id) {
            return Err(QuizError::data_unavailable(label, format!("duplicate question id {}", q.id)));
        }
        if q.kind != QuestionKind::MultipleChoice {
            continue;
        }
        let correct = match &q.correct_answer {
            Answer::Text(s) => s,
            Answer::Flag(_) => {
                return Err(QuizError::data_unavailable(
                    label,
                    format!("question {}: multiple-choice answer must be a string", q.id),
                ));
            }
        };
        if !q.choices.iter().any(|c| eq_ignore_case(c, correct)) {
            return Err(QuizError::data_unavailable(
                label,
                format!("question {}: correct answer {:?} is not among its choices", q.id, correct),
            ));
        }
        let distractors = q.choices.iter().filter(|c| !eq_ignore_case(c, correct)).count();
        if distractors < 2 {
            warn!(target: "book_quest", id = q.id, distractors, "Multiple-choice question has fewer than 2 distractors");
        }
    }
    Ok(())
}
