//! Caller-owned quiz progress: score, streaks and the recent-question ring.
//!
//! The selector never holds one of these. A WebSocket connection owns one per
//! socket; HTTP clients keep their own and send `usedQuestionIds` each call.

use std::collections::VecDeque;

use serde::Serialize;

use crate::domain::QuestionId;
use crate::selector::RECENT_WINDOW;

pub const POINTS_CORRECT: i64 = 10;
pub const POINTS_INCORRECT: i64 = -5;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizProgress {
    pub score: i64,
    pub streak: u32,
    pub best_streak: u32,
    pub recent_ids: VecDeque<QuestionId>,
}

impl QuizProgress {
    /// Remember a served question; only the last `RECENT_WINDOW` ids are kept.
    pub fn remember(&mut self, id: QuestionId) {
        self.recent_ids.push_back(id);
        while self.recent_ids.len() > RECENT_WINDOW {
            self.recent_ids.pop_front();
        }
    }

    /// Most-recent-last copy, ready for a selection request.
    pub fn recent(&self) -> Vec<QuestionId> {
        self.recent_ids.iter().copied().collect()
    }

    /// Apply the scoring rules for one answer. Returns the score delta.
    pub fn record_answer(&mut self, correct: bool) -> i64 {
        if correct {
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
            self.score += POINTS_CORRECT;
            POINTS_CORRECT
        } else {
            self.streak = 0;
            self.score += POINTS_INCORRECT;
            POINTS_INCORRECT
        }
    }

    /// New round: score, streak and history go, best streak stays.
    pub fn reset(&mut self) {
        self.score = 0;
        self.streak = 0;
        self.recent_ids.clear();
    }

    pub fn clear_all(&mut self) {
        *self = Self::default();
    }
}
