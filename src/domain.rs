//! Domain models used by the backend: puzzles, answer keys, and grading results.

use serde::{Deserialize, Serialize};

/// Where did we get the puzzle from?
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleSource {
  LocalBank, // from user-provided TOML bank
  Seed,      // built-in seeds
}

/// Core puzzle structure persisted in-memory.
///
/// `ideal_answer` and `key_principles` drive grading for puzzles without an
/// expert answer key; puzzles that have one are graded against it instead.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Puzzle {
  pub id: String,
  pub title: String,
  pub skill: String,      // free-form (e.g., "logic", "probability")
  pub difficulty: String, // free-form (e.g., "easy", "medium", "hard")
  pub source: PuzzleSource,

  pub prompt: String,
  #[serde(default)] pub ideal_answer: String,
  #[serde(default)] pub key_principles: Vec<String>,
}

/// One named solution component of an answer key, with a point weight and one
/// or more patterns (regex, with substring fallback). Any pattern match counts
/// the element as present.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CoreElement {
  pub element: String,
  pub weight: f64,
  pub patterns: Vec<String>,
}

/// The single correct final answer for a puzzle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Conclusion {
  pub patterns: Vec<String>,
  pub description: String,
}

/// A known incorrect answer with tailored feedback. Detection triggers a
/// score penalty on top of normal dimension scoring.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WrongAnswerPattern {
  pub pattern: String,
  pub feedback: String,
}

/// Puzzle-specific structured rubric used for precise grading.
///
/// Patterns are data on purpose: answer keys can be added in TOML without
/// touching grader code. Weights in `core_answer` need not sum to 100; scoring
/// normalizes by earned weight over total weight.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnswerKey {
  pub title: String,
  /// Distinctive terms expected in a correct answer to THIS puzzle.
  /// Falls back to words extracted from `title` when empty.
  #[serde(default)] pub puzzle_context: Vec<String>,
  /// Ordered concept groups; any synonym from a group counts as a match.
  #[serde(default)] pub required_concepts: Vec<Vec<String>>,
  #[serde(default)] pub core_answer: Vec<CoreElement>,
  pub correct_conclusion: Conclusion,
  #[serde(default)] pub bonus_insights: Vec<String>,
  #[serde(default)] pub wrong_answer_patterns: Vec<WrongAnswerPattern>,
}

/// Grade buckets for expert-aligned grading.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GradeLevel {
  Expert,
  Proficient,
  Developing,
  Emerging,
  Novice,
  #[serde(rename = "Wrong Puzzle")]
  WrongPuzzle,
  #[serde(rename = "No Response")]
  NoResponse,
}

impl GradeLevel {
  /// Bucket a 0-100 alignment score.
  pub fn from_score(score: u32) -> Self {
    match score {
      85.. => GradeLevel::Expert,
      70..=84 => GradeLevel::Proficient,
      50..=69 => GradeLevel::Developing,
      30..=49 => GradeLevel::Emerging,
      _ => GradeLevel::Novice,
    }
  }
}

/// Performance buckets for structural evaluation. A different label set than
/// `GradeLevel` on purpose; the two graders are calibrated differently.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PerformanceLevel {
  Outstanding,
  Excellent,
  #[serde(rename = "Very Good")]
  VeryGood,
  Good,
  Developing,
  #[serde(rename = "Needs Improvement")]
  NeedsImprovement,
  #[serde(rename = "No Response")]
  NoResponse,
}

impl PerformanceLevel {
  pub fn from_score(score: u32) -> Self {
    match score {
      95.. => PerformanceLevel::Outstanding,
      85..=94 => PerformanceLevel::Excellent,
      75..=84 => PerformanceLevel::VeryGood,
      65..=74 => PerformanceLevel::Good,
      55..=64 => PerformanceLevel::Developing,
      _ => PerformanceLevel::NeedsImprovement,
    }
  }
}

/// Per-dimension detail in an expert grade.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionScore {
  pub dimension: String,
  pub score: u32,
  pub weight: f64,
  pub label: String,
}

/// Output of `ExpertAlignmentGrader::grade_answer`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpertGrade {
  pub alignment_score: u32,
  pub grade_level: GradeLevel,
  pub breakdown: Vec<DimensionScore>,
  pub feedback: String,
  pub feedback_tips: Vec<String>,
  pub strengths: Vec<String>,
  pub gaps: Vec<String>,
  /// Tailored feedback of the matched wrong-answer pattern, if any.
  pub wrong_answer_detected: Option<String>,
  /// Name of the other known puzzle the answer appears to address, if any.
  pub wrong_puzzle_detected: Option<String>,
  pub timestamp: String,
}

/// Per-component detail in a structural evaluation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentScore {
  pub id: String,
  pub label: String,
  pub weight: f64,
  /// Ternary: 0 absent, 1 partial, 2 full.
  pub quality: u8,
  pub score: f64,
}

/// Output of `StructuralEvaluator::evaluate_response`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralEvaluation {
  pub total_score: u32,
  pub performance_level: PerformanceLevel,
  pub components: Vec<ComponentScore>,
  pub overall_feedback: String,
  pub strengths: Vec<String>,
  pub gaps: Vec<String>,
  pub timestamp: String,
}

/// What either grader returns. Tagged so callers pattern-match instead of
/// duck-typing on optional fields.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "grader", rename_all = "snake_case")]
pub enum GradingResult {
  Expert(ExpertGrade),
  Structural(StructuralEvaluation),
}

impl GradingResult {
  /// The 0-100 score regardless of which grader produced the result.
  pub fn score(&self) -> u32 {
    match self {
      GradingResult::Expert(g) => g.alignment_score,
      GradingResult::Structural(e) => e.total_score,
    }
  }
}

/// Output of `ExpertAlignmentGrader::quick_check`: a lightweight pass/fail
/// probe for progress gating, without full feedback generation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickCheck {
  pub passed: bool,
  pub conclusion_correct: bool,
  pub core_answer_ratio: f64,
  pub score: u32,
}
