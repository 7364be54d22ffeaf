//! Error taxonomy shared by the dataset store, the selector and the handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuizError {
    /// Dataset missing or malformed.
    #[error("dataset unavailable ({path}): {reason}")]
    DataUnavailable { path: String, reason: String },

    /// Eligible pool is empty even after dropping the recency filter.
    #[error("No more questions available")]
    NoQuestionsAvailable,

    /// Request body could not be read as the expected shape.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl QuizError {
    pub fn data_unavailable(path: impl Into<String>, reason: impl ToString) -> Self {
        QuizError::DataUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            QuizError::DataUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            QuizError::NoQuestionsAvailable => StatusCode::NOT_FOUND,
            QuizError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub error: String,
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorOut { error: message.into() })).into_response()
}

impl IntoResponse for QuizError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            // Internal details stay in the logs.
            QuizError::DataUnavailable { .. } => {
                tracing::error!(target: "book_quest", error = %self, "Dataset unavailable");
                error_response(status, "Failed to fetch question")
            }
            other => error_response(status, other.to_string()),
        }
    }
}
