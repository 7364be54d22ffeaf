//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs request shape and basic result info.

use std::sync::Arc;
use axum::{
  extract::{rejection::JsonRejection, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument};

use crate::domain::PresentedQuestion;
use crate::error::{error_response, QuizError};
use crate::logic::evaluate_answer;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_metadata(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let books = state.dataset.metadata().to_vec();
  info!(target: "quiz", books = books.len(), "HTTP metadata served");
  Json(books)
}

#[instrument(level = "info", skip_all)]
pub async fn http_post_random(
  State(state): State<Arc<AppState>>,
  body: Result<Json<RandomQuestionIn>, JsonRejection>,
) -> Result<Json<PresentedQuestion>, QuizError> {
  let Json(body) = body.map_err(|e| QuizError::InvalidRequest(e.body_text()))?;
  let books = body.selected_books.unwrap_or_default();
  let q = state.choose_question(&body.used_question_ids, &books)?;
  info!(target: "quiz", id = q.id, used = body.used_question_ids.len(), books = books.len(), "HTTP question served");
  Ok(Json(q))
}

#[instrument(level = "info", skip_all)]
pub async fn http_post_check(
  State(state): State<Arc<AppState>>,
  body: Result<Json<CheckAnswerIn>, JsonRejection>,
) -> Response {
  let body = match body {
    Ok(Json(b)) => b,
    Err(e) => return QuizError::InvalidRequest(e.body_text()).into_response(),
  };
  let Some(q) = state.dataset.get(body.question_id) else {
    return error_response(StatusCode::NOT_FOUND, "Unknown question");
  };
  // No streak over plain HTTP, so never a streak callout.
  let fb = evaluate_answer(&state.feedback, q, &body.answer);
  Json(CheckAnswerOut {
    correct: fb.correct,
    correct_answer: q.correct_answer.clone(),
    cue: fb.cue,
    message: fb.message,
  })
  .into_response()
}
