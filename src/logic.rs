//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Grading submissions (expert key when one exists, structural otherwise)
//!   - Quick pass/fail checks for progress gating
//!   - Generating hints from a puzzle's key principles

use tracing::{debug, instrument, warn};

use crate::domain::{GradingResult, Puzzle, QuickCheck};
use crate::grading::EvaluationContext;
use crate::protocol::PuzzleOut;
use crate::state::AppState;

pub fn _to_out(p: &Puzzle) -> PuzzleOut {
  crate::protocol::to_out(p)
}

/// Grade a submission for a puzzle. Puzzles with an expert answer key go
/// through the alignment grader; everything else is evaluated structurally.
/// Total over any input: unknown puzzles and blank answers still produce a
/// well-formed result.
#[instrument(level = "info", skip(state, answer), fields(%puzzle_id, answer_len = answer.len()))]
pub async fn grade_submission(state: &AppState, puzzle_id: &str, answer: &str) -> GradingResult {
  let puzzle = state.get_puzzle(puzzle_id).await;
  if puzzle.is_none() {
    warn!(target: "grading", %puzzle_id, "Grading request for unknown puzzle id");
  }

  if state.expert_grader.has_key(puzzle_id) {
    let grade = state.expert_grader.grade_answer(answer, puzzle_id, None);
    debug!(target: "grading", %puzzle_id, score = grade.alignment_score, grader = "expert", "Graded");
    return GradingResult::Expert(grade);
  }

  let context = EvaluationContext { skill: puzzle.as_ref().map(|p| p.skill.as_str()) };
  let eval = state.structural_evaluator.evaluate_response(answer, context);
  debug!(target: "grading", %puzzle_id, score = eval.total_score, grader = "structural", "Graded");
  GradingResult::Structural(eval)
}

/// Lightweight pass/fail check against a puzzle's answer key.
#[instrument(level = "info", skip(state, answer), fields(%puzzle_id))]
pub async fn quick_check_answer(state: &AppState, puzzle_id: &str, answer: &str) -> QuickCheck {
  state.expert_grader.quick_check(answer, puzzle_id)
}

/// Hint text for a puzzle: the first key principle when we have one, else a
/// generic prompt back to the puzzle text.
#[instrument(level = "info", skip(state), fields(%puzzle_id))]
pub async fn get_hint_text(state: &AppState, puzzle_id: &str) -> String {
  if let Some(p) = state.get_puzzle(puzzle_id).await {
    if let Some(principle) = p.key_principles.first() {
      format!("Think about: {principle}.")
    } else {
      format!("Re-read the setup of \"{}\" and name the assumption it hinges on.", p.title)
    }
  } else {
    format!("Unknown puzzleId: {puzzle_id}")
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::GradeLevel;

  fn state() -> AppState {
    AppState::new()
  }

  #[tokio::test]
  async fn keyed_puzzle_routes_to_expert_grader() {
    let s = state();
    let result = grade_submission(&s, "monty-hall", "You should always switch doors.").await;
    assert!(matches!(result, GradingResult::Expert(_)));
  }

  #[tokio::test]
  async fn keyless_puzzle_routes_to_structural_evaluator() {
    let s = state();
    let result = grade_submission(
      &s,
      "vaccine-timing",
      "The claim is that vaccines cause autism, but timing alone is a coincidence, \
       because age explains both. We'd need controlled studies to know.",
    )
    .await;
    assert!(matches!(result, GradingResult::Structural(_)));
    assert!(result.score() > 0);
  }

  #[tokio::test]
  async fn unknown_puzzle_still_grades() {
    let s = state();
    let result = grade_submission(&s, "no-such-puzzle", "Some answer text here.").await;
    assert!(matches!(result, GradingResult::Structural(_)));
  }

  #[tokio::test]
  async fn blank_answer_is_no_response_through_the_orchestrator() {
    let s = state();
    match grade_submission(&s, "monty-hall", "   ").await {
      GradingResult::Expert(g) => assert_eq!(g.grade_level, GradeLevel::NoResponse),
      other => panic!("expected expert grade, got {other:?}"),
    }
  }

  #[tokio::test]
  async fn hint_prefers_key_principles() {
    let s = state();
    let hint = get_hint_text(&s, "vaccine-timing").await;
    assert!(hint.contains("Correlation"));
    let hint = get_hint_text(&s, "monty-hall").await;
    assert!(hint.contains("Monty Hall"));
    let hint = get_hint_text(&s, "nope").await;
    assert!(hint.contains("Unknown puzzleId"));
  }
}
