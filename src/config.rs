//! Loading the puzzle bank (puzzles + answer keys) from TOML.
//!
//! See `BankConfig` for the expected schema. A missing or malformed file is
//! never fatal; the built-in seeds keep the app functional.

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::AnswerKey;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct BankConfig {
  #[serde(default)]
  pub puzzles: Vec<PuzzleCfg>,
  #[serde(default)]
  pub answer_keys: Vec<AnswerKeyCfg>,
}

/// Puzzle entry accepted in TOML configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct PuzzleCfg {
  #[serde(default)] pub id: Option<String>,
  pub title: String,
  pub skill: String,
  #[serde(default)] pub difficulty: Option<String>,
  pub prompt: String,
  // Structural-grading context; optional when an answer key is supplied.
  #[serde(default)] pub ideal_answer: Option<String>,
  #[serde(default)] pub key_principles: Vec<String>,
}

/// Answer-key entry accepted in TOML configuration; the key body shares the
/// wire schema of `AnswerKey`.
#[derive(Clone, Debug, Deserialize)]
pub struct AnswerKeyCfg {
  pub puzzle_id: String,
  #[serde(flatten)]
  pub key: AnswerKey,
}

/// Attempt to load `BankConfig` from MINDCASE_CONFIG_PATH. On any parsing/IO
/// error, returns None.
pub fn load_bank_config_from_env() -> Option<BankConfig> {
  let path = std::env::var("MINDCASE_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<BankConfig>(&s) {
      Ok(cfg) => {
        info!(target: "mindcase_backend", %path, puzzles = cfg.puzzles.len(), answer_keys = cfg.answer_keys.len(), "Loaded puzzle bank (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "mindcase_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "mindcase_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
