//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{Answer, BookMetadata, PresentedQuestion, QuestionId};
use crate::logic::{Cue, Feedback};
use crate::progress::QuizProgress;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    /// Replace the connection's book filter. Empty means every book.
    SelectBooks {
        #[serde(default)]
        books: Vec<String>,
    },
    NextQuestion,
    SubmitAnswer {
        #[serde(rename = "questionId")]
        question_id: QuestionId,
        answer: Answer,
    },
    ResetScore,
    ClearAllData,
    GetProgress,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Metadata {
        books: Vec<BookMetadata>,
    },
    Question {
        question: PresentedQuestion,
    },
    AnswerResult {
        correct: bool,
        #[serde(rename = "correctAnswer")]
        correct_answer: Answer,
        feedback: Feedback,
        progress: QuizProgress,
    },
    Progress {
        progress: QuizProgress,
    },
    Error {
        message: String,
    },
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomQuestionIn {
    #[serde(default)]
    pub used_question_ids: Vec<QuestionId>,
    #[serde(default)]
    pub selected_books: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAnswerIn {
    pub question_id: QuestionId,
    pub answer: Answer,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAnswerOut {
    pub correct: bool,
    pub correct_answer: Answer,
    pub cue: Cue,
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
