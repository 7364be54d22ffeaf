//! Domain models: questions as stored in the dataset, per-book metadata and
//! the per-request presentation copy handed to callers.

use serde::{Deserialize, Serialize};

pub type QuestionId = u64;

/// Closed set of question shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
  /// Several string choices, one of them correct. Choices get randomized per request.
  MultipleChoice,
  /// Implicit two-choice domain; choices pass through untouched.
  TrueFalse,
}

/// `correctAnswer` is a string for multiple-choice and usually a boolean for true/false.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
  Flag(bool),
  Text(String),
}

impl Answer {
  /// Text form used for comparisons. Booleans render as `true` / `false`.
  pub fn as_text(&self) -> String {
    match self {
      Answer::Flag(b) => b.to_string(),
      Answer::Text(s) => s.clone(),
    }
  }
}

/// Citation metadata, passed through unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageReference {
  Page(i64),
  Text(String),
}

/// Immutable dataset record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
  pub id: QuestionId,
  pub book_title: String,
  pub question: String,
  #[serde(rename = "type")]
  pub kind: QuestionKind,
  pub correct_answer: Answer,
  #[serde(default)]
  pub choices: Vec<String>,
  pub page_reference: PageReference,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookMetadata {
  pub title: String,
  pub question_count: usize,
}

/// Transient copy of a `Question` with its `choices` re-drawn for one request.
/// Never written back to the dataset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentedQuestion {
  pub id: QuestionId,
  pub book_title: String,
  pub question: String,
  #[serde(rename = "type")]
  pub kind: QuestionKind,
  pub correct_answer: Answer,
  pub choices: Vec<String>,
  pub page_reference: PageReference,
}

impl PresentedQuestion {
  /// Shallow copy of `q` carrying the given choice list.
  pub fn with_choices(q: &Question, choices: Vec<String>) -> Self {
    Self {
      id: q.id,
      book_title: q.book_title.clone(),
      question: q.question.clone(),
      kind: q.kind,
      correct_answer: q.correct_answer.clone(),
      choices,
      page_reference: q.page_reference.clone(),
    }
  }
}
