//! Loading service configuration (dataset location, static dir, feedback copy) from TOML.
//!
//! See `QuizConfig` and `FeedbackMessages` for expected schema.

use serde::Deserialize;
use tracing::{info, error};

const DEFAULT_DATASET_PATH: &str = "data/questions.json";
const DEFAULT_STATIC_DIR: &str = "./static";

#[derive(Clone, Debug, Deserialize)]
pub struct QuizConfig {
  #[serde(default = "default_dataset_path")]
  pub dataset_path: String,
  #[serde(default = "default_static_dir")]
  pub static_dir: String,
  #[serde(default)]
  pub feedback: FeedbackMessages,
}

fn default_dataset_path() -> String { DEFAULT_DATASET_PATH.into() }
fn default_static_dir() -> String { DEFAULT_STATIC_DIR.into() }

impl Default for QuizConfig {
  fn default() -> Self {
    Self {
      dataset_path: default_dataset_path(),
      static_dir: default_static_dir(),
      feedback: FeedbackMessages::default(),
    }
  }
}

/// Copy used for the answer notification. Each list may be overridden in TOML;
/// an empty list falls back to the built-in one.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FeedbackMessages {
  pub correct_messages: Vec<String>,
  pub incorrect_messages: Vec<String>,
  pub streak_badges: Vec<String>,
}

impl Default for FeedbackMessages {
  fn default() -> Self {
    Self {
      correct_messages: owned(&[
        "Awesome job! 🎉", "You got it! ⭐", "Way to go! 🌟", "Brilliant! 🎯",
        "That's correct! ✨", "Super smart! 🧠", "You're on fire! 🔥", "Fantastic! 🌈",
        "Nailed it! 🎪", "You rock! 🎸", "Amazing work! 🏆", "Perfect! 💫",
        "Spot on! 🎯", "Great thinking! 💡", "You're crushing it! 💪",
      ]),
      incorrect_messages: owned(&[
        "Hmm, not quite right...", "Oops, that's not it", "Sorry, that's wrong", "Incorrect",
        "You missed that one!", "Missed it", "Oops, you missed it",
      ]),
      streak_badges: owned(&["🔥", "⭐", "🌟", "✨", "💫", "🎯", "🏆", "👑"]),
    }
  }
}

fn owned(xs: &[&str]) -> Vec<String> {
  xs.iter().map(|s| s.to_string()).collect()
}

impl FeedbackMessages {
  /// Replace empty lists with the defaults so lookups never hit an empty slice.
  fn filled(mut self) -> Self {
    let d = Self::default();
    if self.correct_messages.is_empty() { self.correct_messages = d.correct_messages; }
    if self.incorrect_messages.is_empty() { self.incorrect_messages = d.incorrect_messages; }
    if self.streak_badges.is_empty() { self.streak_badges = d.streak_badges; }
    self
  }
}

/// Parse a TOML document into a `QuizConfig`.
pub fn parse_config(s: &str) -> Result<QuizConfig, toml::de::Error> {
  let mut cfg = toml::from_str::<QuizConfig>(s)?;
  cfg.feedback = cfg.feedback.filled();
  Ok(cfg)
}

/// Load `QuizConfig` from QUIZ_CONFIG_PATH (defaults on any IO/parse error),
/// then apply the DATASET_PATH override.
pub fn load_quiz_config_from_env() -> QuizConfig {
  let mut cfg = match std::env::var("QUIZ_CONFIG_PATH") {
    Ok(path) => match std::fs::read_to_string(&path) {
      Ok(s) => match parse_config(&s) {
        Ok(cfg) => {
          info!(target: "book_quest", %path, "Loaded quiz config (TOML)");
          cfg
        }
        Err(e) => {
          error!(target: "book_quest", %path, error = %e, "Failed to parse TOML config; using defaults");
          QuizConfig::default()
        }
      },
      Err(e) => {
        error!(target: "book_quest", %path, error = %e, "Failed to read TOML config file; using defaults");
        QuizConfig::default()
      }
    },
    Err(_) => QuizConfig::default(),
  };

  if let Ok(p) = std::env::var("DATASET_PATH") {
    if !p.trim().is_empty() {
      cfg.dataset_path = p;
    }
  }
  cfg
}
