//! Answer-key store: compiled, lookup-by-puzzle-id rubrics.
//!
//! Raw `AnswerKey` data (seeds or TOML) is compiled once at load: every
//! pattern string becomes a `Matcher`, context terms are normalized, and title
//! fallback terms are extracted. Lookup afterwards is a plain map read.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::domain::AnswerKey;
use crate::grading::pattern::{compile_all, Matcher};

/// Words too generic to identify a puzzle when extracting context terms from
/// a title.
const TITLE_STOP_WORDS: &[&str] = &[
  "the", "and", "for", "with", "puzzle", "problem", "riddle", "question", "how", "why", "what",
];

/// A `CoreElement` with its patterns compiled.
#[derive(Clone, Debug)]
pub struct CompiledElement {
  pub element: String,
  pub weight: f64,
  pub matchers: Vec<Matcher>,
}

/// A `Conclusion` with its patterns compiled.
#[derive(Clone, Debug)]
pub struct CompiledConclusion {
  pub matchers: Vec<Matcher>,
  pub description: String,
}

/// A `WrongAnswerPattern` with its pattern compiled.
#[derive(Clone, Debug)]
pub struct CompiledWrongAnswer {
  pub matcher: Matcher,
  pub feedback: String,
}

/// An answer key ready for grading: all patterns compiled, all terms
/// lowercased.
#[derive(Clone, Debug)]
pub struct CompiledAnswerKey {
  pub title: String,
  /// Lowercased context terms (explicit `puzzle_context`, or extracted from
  /// the title when the key does not provide any).
  pub context_terms: Vec<String>,
  /// Lowercased synonym groups; any synonym present counts the group matched.
  pub required_concepts: Vec<Vec<String>>,
  pub core_answer: Vec<CompiledElement>,
  pub correct_conclusion: CompiledConclusion,
  /// Lowercased bonus substrings.
  pub bonus_insights: Vec<String>,
  pub wrong_answer_patterns: Vec<CompiledWrongAnswer>,
}

/// Extract fallback context terms from a key title: words longer than two
/// characters, minus stop words.
fn title_terms(title: &str) -> Vec<String> {
  title
    .to_lowercase()
    .split(|c: char| !c.is_alphanumeric())
    .filter(|w| w.len() > 2 && !TITLE_STOP_WORDS.contains(w))
    .map(str::to_string)
    .collect()
}

impl CompiledAnswerKey {
  pub fn compile(key: &AnswerKey) -> Self {
    let context_terms = if key.puzzle_context.is_empty() {
      title_terms(&key.title)
    } else {
      key.puzzle_context.iter().map(|t| t.to_lowercase()).collect()
    };

    Self {
      title: key.title.clone(),
      context_terms,
      required_concepts: key
        .required_concepts
        .iter()
        .map(|group| group.iter().map(|s| s.to_lowercase()).collect())
        .collect(),
      core_answer: key
        .core_answer
        .iter()
        .map(|el| CompiledElement {
          element: el.element.clone(),
          weight: el.weight,
          matchers: compile_all(&el.patterns),
        })
        .collect(),
      correct_conclusion: CompiledConclusion {
        matchers: compile_all(&key.correct_conclusion.patterns),
        description: key.correct_conclusion.description.clone(),
      },
      bonus_insights: key.bonus_insights.iter().map(|s| s.to_lowercase()).collect(),
      wrong_answer_patterns: key
        .wrong_answer_patterns
        .iter()
        .map(|w| CompiledWrongAnswer {
          matcher: Matcher::compile(&w.pattern),
          feedback: w.feedback.clone(),
        })
        .collect(),
    }
  }

  /// Total weight across core elements. Zero only for a key with no core
  /// elements at all.
  pub fn total_core_weight(&self) -> f64 {
    self.core_answer.iter().map(|el| el.weight).sum()
  }
}

/// Keyed store of compiled answer keys. A puzzle without an entry here is
/// graded by the structural/generic path instead; absence is not an error.
#[derive(Clone, Debug, Default)]
pub struct AnswerKeyStore {
  keys: HashMap<String, CompiledAnswerKey>,
}

impl AnswerKeyStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Compile and insert a key. Existing entries for the same puzzle id are
  /// kept (seeds load first; config must not clobber them silently).
  pub fn insert(&mut self, puzzle_id: &str, key: &AnswerKey) -> bool {
    if self.keys.contains_key(puzzle_id) {
      debug!(target: "grading", %puzzle_id, "Answer key already present; keeping existing");
      return false;
    }
    self.keys.insert(puzzle_id.to_string(), CompiledAnswerKey::compile(key));
    true
  }

  pub fn get_answer_key(&self, puzzle_id: &str) -> Option<&CompiledAnswerKey> {
    self.keys.get(puzzle_id)
  }

  pub fn len(&self) -> usize {
    self.keys.len()
  }

  pub fn is_empty(&self) -> bool {
    self.keys.is_empty()
  }

  /// Log a one-line inventory at startup.
  pub fn log_inventory(&self) {
    info!(target: "grading", answer_keys = self.keys.len(), "Compiled answer-key inventory");
  }
}
