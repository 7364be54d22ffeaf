//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.
//!
//! The connection is the caller here: it owns the player's progress record,
//! book selection and the id of the question currently on screen.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};
use uuid::Uuid;

use crate::domain::QuestionId;
use crate::logic::{build_feedback, check_answer};
use crate::progress::QuizProgress;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::state::AppState;
use crate::util::trunc_for_log;

/// Per-connection state. Dropped with the socket.
#[derive(Debug, Default)]
struct Session {
  books: Vec<String>,
  progress: QuizProgress,
  current: Option<QuestionId>,
}

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "book_quest", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state), fields(session = %Uuid::new_v4()))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "book_quest", "WebSocket connected");
  let mut session = Session::default();

  let hello = ServerWsMessage::Metadata { books: state.dataset.metadata().to_vec() };
  if !send(&mut socket, &hello).await {
    return;
  }

  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "book_quest", msg = %trunc_for_log(&txt, 200), "WS received");
            handle_client_ws(incoming, &state, &mut session)
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };
        if !send(&mut socket, &reply).await {
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "book_quest", score = session.progress.score, best_streak = session.progress.best_streak, "WebSocket disconnected");
}

async fn send(socket: &mut WebSocket, msg: &ServerWsMessage) -> bool {
  let out = serde_json::to_string(msg).unwrap_or_else(|e| {
    serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
  });
  if let Err(e) = socket.send(Message::Text(out)).await {
    error!(target: "book_quest", error = %e, "WS send error");
    return false;
  }
  true
}

fn next_question(state: &AppState, session: &mut Session) -> ServerWsMessage {
  match state.choose_question(&session.progress.recent(), &session.books) {
    Ok(question) => {
      session.progress.remember(question.id);
      session.current = Some(question.id);
      ServerWsMessage::Question { question }
    }
    Err(e) => ServerWsMessage::Error { message: e.to_string() },
  }
}

fn handle_client_ws(msg: ClientWsMessage, state: &AppState, session: &mut Session) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::SelectBooks { books } => {
      info!(target: "quiz", books = books.len(), "WS book selection changed");
      session.books = books;
      session.current = None;
      next_question(state, session)
    }

    ClientWsMessage::NextQuestion => next_question(state, session),

    ClientWsMessage::SubmitAnswer { question_id, answer } => {
      if session.current != Some(question_id) {
        return ServerWsMessage::Error { message: format!("Question {} is not the current question", question_id) };
      }
      let Some(q) = state.dataset.get(question_id) else {
        return ServerWsMessage::Error { message: "Unknown question".into() };
      };
      let correct = check_answer(q, &answer);
      session.progress.record_answer(correct);
      // One answer per question.
      session.current = None;
      let feedback = build_feedback(&state.feedback, correct, session.progress.streak, &mut rand::thread_rng());
      info!(target: "quiz", id = question_id, %correct, score = session.progress.score, streak = session.progress.streak, "WS answer evaluated");
      ServerWsMessage::AnswerResult {
        correct,
        correct_answer: q.correct_answer.clone(),
        feedback,
        progress: session.progress.clone(),
      }
    }

    ClientWsMessage::ResetScore => {
      session.progress.reset();
      ServerWsMessage::Progress { progress: session.progress.clone() }
    }

    ClientWsMessage::ClearAllData => {
      session.progress.clear_all();
      session.books.clear();
      session.current = None;
      ServerWsMessage::Progress { progress: session.progress.clone() }
    }

    ClientWsMessage::GetProgress => ServerWsMessage::Progress { progress: session.progress.clone() },
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::QuizConfig;
  use crate::dataset::tests::three_books;
  use crate::domain::Answer;

  fn state() -> AppState {
    AppState::with_dataset(three_books(), QuizConfig::default())
  }

  fn ask(state: &AppState, session: &mut Session, msg: ClientWsMessage) -> ServerWsMessage {
    handle_client_ws(msg, state, session)
  }

  #[test]
  fn selecting_a_book_serves_from_it_and_remembers_ids() {
    let st = state();
    let mut s = Session::default();
    let reply = ask(&st, &mut s, ClientWsMessage::SelectBooks { books: vec!["B".into()] });
    let ServerWsMessage::Question { question } = reply else { panic!("expected question") };
    assert_eq!(question.book_title, "B");
    assert_eq!(s.current, Some(question.id));
    assert_eq!(s.progress.recent(), vec![question.id]);
  }

  #[test]
  fn consecutive_questions_avoid_recent_repeats() {
    let st = state();
    let mut s = Session::default();
    ask(&st, &mut s, ClientWsMessage::SelectBooks { books: vec!["B".into()] });
    ask(&st, &mut s, ClientWsMessage::NextQuestion);
    ask(&st, &mut s, ClientWsMessage::NextQuestion);
    let mut ids = s.progress.recent();
    ids.sort();
    assert_eq!(ids, vec![6, 7, 8]);
  }

  #[test]
  fn answering_updates_progress_once() {
    let st = state();
    let mut s = Session::default();
    ask(&st, &mut s, ClientWsMessage::SelectBooks { books: vec!["C".into()] });
    let id = s.current.expect("current");
    let right = st.dataset.get(id).unwrap().correct_answer.clone();

    let reply = ask(&st, &mut s, ClientWsMessage::SubmitAnswer { question_id: id, answer: right.clone() });
    let ServerWsMessage::AnswerResult { correct, progress, feedback, .. } = reply else { panic!("expected result") };
    assert!(correct && feedback.correct);
    assert_eq!((progress.score, progress.streak, progress.best_streak), (10, 1, 1));

    let again = ask(&st, &mut s, ClientWsMessage::SubmitAnswer { question_id: id, answer: right });
    assert!(matches!(again, ServerWsMessage::Error { .. }));
    assert_eq!(s.progress.score, 10);
  }

  #[test]
  fn third_correct_answer_in_a_row_gets_the_callout() {
    let st = state();
    let mut s = Session::default();
    ask(&st, &mut s, ClientWsMessage::SelectBooks { books: vec!["A".into()] });
    let mut messages = Vec::new();
    for _ in 0..3 {
      let id = s.current.expect("current");
      let reply = ask(&st, &mut s, ClientWsMessage::SubmitAnswer { question_id: id, answer: Answer::Text("paris".into()) });
      let ServerWsMessage::AnswerResult { feedback, .. } = reply else { panic!("expected result") };
      messages.push(feedback);
      ask(&st, &mut s, ClientWsMessage::NextQuestion);
    }
    assert!(messages[0].streak_badge.is_none() && messages[1].streak_badge.is_none());
    assert_eq!(messages[2].message, "That's 3 in a row ✨");
    assert_eq!(messages[2].streak_badge.as_deref(), Some("✨"));
  }

  #[test]
  fn wrong_answer_breaks_streak() {
    let st = state();
    let mut s = Session::default();
    s.progress.record_answer(true);
    ask(&st, &mut s, ClientWsMessage::SelectBooks { books: vec!["A".into()] });
    let id = s.current.unwrap();
    let reply = ask(&st, &mut s, ClientWsMessage::SubmitAnswer { question_id: id, answer: Answer::Text("Nowhere".into()) });
    let ServerWsMessage::AnswerResult { correct, progress, .. } = reply else { panic!("expected result") };
    assert!(!correct);
    assert_eq!((progress.score, progress.streak, progress.best_streak), (5, 0, 1));
  }

  #[test]
  fn unknown_books_report_an_error() {
    let st = state();
    let mut s = Session::default();
    let reply = ask(&st, &mut s, ClientWsMessage::SelectBooks { books: vec!["Nope".into()] });
    let ServerWsMessage::Error { message } = reply else { panic!("expected error") };
    assert_eq!(message, "No more questions available");
  }

  #[test]
  fn reset_and_clear() {
    let st = state();
    let mut s = Session::default();
    s.progress.record_answer(true);
    s.progress.remember(1);

    let ServerWsMessage::Progress { progress } = ask(&st, &mut s, ClientWsMessage::ResetScore) else { panic!() };
    assert_eq!((progress.score, progress.best_streak), (0, 1));
    assert!(progress.recent_ids.is_empty());

    let ServerWsMessage::Progress { progress } = ask(&st, &mut s, ClientWsMessage::ClearAllData) else { panic!() };
    assert_eq!(progress, QuizProgress::default());
  }
}
