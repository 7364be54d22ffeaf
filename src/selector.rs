//! Question selection: book filter, recency filter with fallback, uniform draw,
//! and the per-request randomization of multiple-choice options.
//!
//! Everything here is a pure function of (dataset, request, rng). Callers pass
//! a per-call or thread-local generator, so concurrent calls share nothing
//! mutable.
//!
//! Empty-pool policy: when the recency filter removes every question of the
//! book-filtered pool, the recency filter is dropped and the draw happens over
//! the book-filtered pool. Only an empty book-filtered pool is an error.

use std::collections::HashSet;

use rand::{seq::SliceRandom, Rng};
use tracing::{debug, instrument};

use crate::dataset::Dataset;
use crate::domain::{Answer, PresentedQuestion, Question, QuestionId, QuestionKind};
use crate::error::QuizError;
use crate::util::eq_ignore_case;

/// How many of the most recent served ids the recency filter looks at.
pub const RECENT_WINDOW: usize = 5;
/// Bounds (inclusive) on how many options a multiple-choice question shows, correct one included.
pub const MIN_CHOICES: usize = 3;
pub const MAX_CHOICES: usize = 5;

/// The last `RECENT_WINDOW` entries of a most-recent-last history.
pub fn recent_window(used: &[QuestionId]) -> &[QuestionId] {
  &used[used.len().saturating_sub(RECENT_WINDOW)..]
}

/// Questions matching the book filter. An empty `selected_books` means no filter.
pub fn book_pool<'a>(dataset: &'a Dataset, selected_books: &[String]) -> Vec<&'a Question> {
  let all = dataset.all_questions();
  if selected_books.is_empty() {
    return all.iter().collect();
  }
  let wanted: HashSet<&str> = selected_books.iter().map(String::as_str).collect();
  all.iter().filter(|q| wanted.contains(q.book_title.as_str())).collect()
}

/// Book-filtered questions minus the recently used ones, falling back to the
/// whole book-filtered pool when that leaves nothing.
pub fn eligible_pool<'a>(
  dataset: &'a Dataset,
  used: &[QuestionId],
  selected_books: &[String],
) -> Result<Vec<&'a Question>, QuizError> {
  let books = book_pool(dataset, selected_books);
  if books.is_empty() {
    return Err(QuizError::NoQuestionsAvailable);
  }

  let recent: HashSet<QuestionId> = recent_window(used).iter().copied().collect();
  let fresh: Vec<&Question> = books.iter().copied().filter(|q| !recent.contains(&q.id)).collect();
  if fresh.is_empty() {
    debug!(target: "quiz", pool = books.len(), "Recency filter exhausted the pool; falling back to book pool");
    return Ok(books);
  }
  Ok(fresh)
}

/// Pick one eligible question uniformly and build its presentation copy.
#[instrument(level = "debug", skip_all, fields(used = used.len(), books = selected_books.len()))]
pub fn select_question<R: Rng + ?Sized>(
  dataset: &Dataset,
  used: &[QuestionId],
  selected_books: &[String],
  rng: &mut R,
) -> Result<PresentedQuestion, QuizError> {
  let pool = eligible_pool(dataset, used, selected_books)?;
  let chosen = pool.choose(rng).copied().ok_or(QuizError::NoQuestionsAvailable)?;
  debug!(target: "quiz", id = chosen.id, pool = pool.len(), "Question drawn");
  Ok(present(chosen, rng))
}

/// Presentation copy of `q`: multiple-choice options are re-drawn, true/false passes through.
pub fn present<R: Rng + ?Sized>(q: &Question, rng: &mut R) -> PresentedQuestion {
  let choices = match (q.kind, &q.correct_answer) {
    (QuestionKind::MultipleChoice, Answer::Text(correct)) => randomize_choices(&q.choices, correct, rng),
    _ => q.choices.clone(),
  };
  PresentedQuestion::with_choices(q, choices)
}

/// Build a shuffled subset of `choices` holding the correct answer exactly once
/// and between `MIN_CHOICES` and `MAX_CHOICES` entries (fewer if the question
/// simply has fewer distractors).
pub fn randomize_choices<R: Rng + ?Sized>(choices: &[String], correct: &str, rng: &mut R) -> Vec<String> {
  // Keep the dataset's own spelling of the correct option when present.
  let correct_shown = choices
    .iter()
    .find(|c| eq_ignore_case(c, correct))
    .cloned()
    .unwrap_or_else(|| correct.to_string());

  let mut distractors: Vec<&String> = Vec::with_capacity(choices.len());
  for c in choices {
    if eq_ignore_case(c, correct) || distractors.iter().any(|d| eq_ignore_case(d, c)) {
      continue;
    }
    distractors.push(c);
  }
  distractors.shuffle(rng);

  let k = rng.gen_range(MIN_CHOICES..=MAX_CHOICES);
  let take = (k - 1).min(distractors.len());

  let mut out: Vec<String> = distractors.into_iter().take(take).cloned().collect();
  out.push(correct_shown);
  out.shuffle(rng);
  out
}
