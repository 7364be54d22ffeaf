//! Application state: the read-only dataset, feedback copy, and the selection entry point.
//!
//! This module owns:
//!   - the dataset (loaded once, shared behind an `Arc`, never mutated)
//!   - the feedback messages (from TOML or defaults)
//!   - where the SPA bundle lives
//!
//! No per-player state lives here; progress belongs to the caller.

use std::{path::Path, sync::Arc};
use tracing::{info, instrument, warn};

use crate::config::{FeedbackMessages, QuizConfig};
use crate::dataset::Dataset;
use crate::domain::{PresentedQuestion, QuestionId};
use crate::error::QuizError;
use crate::selector::select_question;

#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub feedback: FeedbackMessages,
    pub static_dir: String,
}

impl AppState {
    /// Build state from config: load and validate the dataset. Failure here is fatal.
    #[instrument(level = "info", skip_all, fields(dataset = %cfg.dataset_path))]
    pub fn new(cfg: QuizConfig) -> Result<Self, QuizError> {
        let dataset = Dataset::load(Path::new(&cfg.dataset_path))?;
        for book in dataset.metadata() {
            info!(target: "quiz", title = %book.title, questions = book.question_count, "Startup book inventory");
        }
        Ok(Self::with_dataset(dataset, cfg))
    }

    pub fn with_dataset(dataset: Dataset, cfg: QuizConfig) -> Self {
        Self {
            dataset: Arc::new(dataset),
            feedback: cfg.feedback,
            static_dir: cfg.static_dir,
        }
    }

    /// Draw one question for a caller, using the calling thread's generator.
    #[instrument(level = "info", skip(self, used, selected_books), fields(used = used.len(), books = selected_books.len()))]
    pub fn choose_question(
        &self,
        used: &[QuestionId],
        selected_books: &[String],
    ) -> Result<PresentedQuestion, QuizError> {
        match select_question(&self.dataset, used, selected_books, &mut rand::thread_rng()) {
            Ok(q) => {
                info!(target: "quiz", id = q.id, book = %q.book_title, choices = q.choices.len(), "Question selected");
                Ok(q)
            }
            Err(e) => {
                warn!(target: "quiz", error = %e, ?selected_books, "No eligible question");
                Err(e)
            }
        }
    }
}
