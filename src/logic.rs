//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Checking an answer against a question (case-insensitive)
//!   - Building the feedback notification a UI may turn into sound or animation

use rand::{seq::SliceRandom, Rng};
use serde::Serialize;
use tracing::{info, instrument};

use crate::config::FeedbackMessages;
use crate::domain::{Answer, Question};
use crate::util::eq_ignore_case;

/// What the UI should play/animate. Carries no behavior on the server side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
  Correct,
  Incorrect,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
  pub correct: bool,
  pub cue: Cue,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub streak_badge: Option<String>,
}

/// An answer is correct when its lowercase text equals the correct answer's.
/// Whitespace is significant.
pub fn check_answer(q: &Question, answer: &Answer) -> bool {
  eq_ignore_case(&answer.as_text(), &q.correct_answer.as_text())
}

/// Streak at which the congratulation turns into a streak callout.
pub const STREAK_CALLOUT: u32 = 3;

/// Pick the message for one answered question. `streak` is the streak after
/// the answer was recorded. From `STREAK_CALLOUT` on, a correct answer gets
/// "That's N in a row" plus a badge instead of a random congratulation.
pub fn build_feedback<R: Rng + ?Sized>(msgs: &FeedbackMessages, correct: bool, streak: u32, rng: &mut R) -> Feedback {
  let badge = match msgs.streak_badges.len() {
    0 => None,
    n if correct && streak >= STREAK_CALLOUT => Some(msgs.streak_badges[streak as usize % n].clone()),
    _ => None,
  };
  let message = match &badge {
    Some(b) => format!("That's {streak} in a row {b}"),
    None => {
      let pool = if correct { &msgs.correct_messages } else { &msgs.incorrect_messages };
      pool.choose(rng).cloned().unwrap_or_default()
    }
  };
  Feedback {
    correct,
    cue: if correct { Cue::Correct } else { Cue::Incorrect },
    message,
    streak_badge: badge,
  }
}

/// Check + feedback in one step for callers that do not track a streak,
/// so a correct answer always gets a plain congratulation.
#[instrument(level = "info", skip(msgs, q, answer), fields(id = q.id))]
pub fn evaluate_answer(msgs: &FeedbackMessages, q: &Question, answer: &Answer) -> Feedback {
  let correct = check_answer(q, answer);
  info!(target: "quiz", id = q.id, %correct, "Answer evaluated");
  build_feedback(msgs, correct, 0, &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dataset::tests::{mc, tf};
  use rand::{rngs::StdRng, SeedableRng};

  #[test]
  fn multiple_choice_answers_ignore_case() {
    let q = mc(1, "A", "Paris", &["Paris", "Rome", "Oslo"]);
    assert!(check_answer(&q, &Answer::Text("paris".into())));
    assert!(check_answer(&q, &Answer::Text("PARIS".into())));
    assert!(!check_answer(&q, &Answer::Text(" Paris ".into())));
    assert!(!check_answer(&q, &Answer::Text("Rome".into())));
  }

  #[test]
  fn true_false_accepts_labels_and_booleans() {
    let q = tf(2, "A", false);
    assert!(check_answer(&q, &Answer::Text("False".into())));
    assert!(check_answer(&q, &Answer::Flag(false)));
    assert!(!check_answer(&q, &Answer::Text("True".into())));
  }

  #[test]
  fn short_streaks_get_a_random_congratulation_without_badge() {
    let msgs = FeedbackMessages::default();
    let mut rng = StdRng::seed_from_u64(1);
    for streak in 0..STREAK_CALLOUT {
      let ok = build_feedback(&msgs, true, streak, &mut rng);
      assert_eq!(ok.cue, Cue::Correct);
      assert!(msgs.correct_messages.contains(&ok.message), "{ok:?}");
      assert!(ok.streak_badge.is_none());
    }
  }

  #[test]
  fn long_streaks_get_the_in_a_row_callout() {
    let msgs = FeedbackMessages::default();
    let mut rng = StdRng::seed_from_u64(1);
    let ok = build_feedback(&msgs, true, 3, &mut rng);
    assert_eq!(ok.message, "That's 3 in a row ✨");
    assert_eq!(ok.streak_badge.as_deref(), Some("✨"));

    for streak in STREAK_CALLOUT..20 {
      let ok = build_feedback(&msgs, true, streak, &mut rng);
      let badge = &msgs.streak_badges[streak as usize % 8];
      assert_eq!(ok.message, format!("That's {streak} in a row {badge}"));
      assert_eq!(ok.streak_badge.as_ref(), Some(badge));
    }
  }

  #[test]
  fn wrong_answers_never_carry_a_badge() {
    let msgs = FeedbackMessages::default();
    let mut rng = StdRng::seed_from_u64(4);
    for streak in 0..20 {
      let bad = build_feedback(&msgs, false, streak, &mut rng);
      assert_eq!(bad.cue, Cue::Incorrect);
      assert!(msgs.incorrect_messages.contains(&bad.message));
      assert!(bad.streak_badge.is_none());
    }
  }

  #[test]
  fn evaluate_answer_reports_correctness() {
    let msgs = FeedbackMessages::default();
    let q = tf(3, "A", true);
    let fb = evaluate_answer(&msgs, &q, &Answer::Flag(true));
    assert!(fb.correct);
    assert!(fb.streak_badge.is_none());
    assert!(msgs.correct_messages.contains(&fb.message));
    assert!(!evaluate_answer(&msgs, &q, &Answer::Text("false".into())).correct);
  }
}
