//! Expert-alignment grading: score a free-text answer against a
//! puzzle-specific answer key.
//!
//! The grader is a pure function of (answer, puzzle id): no I/O, no mutable
//! state, total over its input domain. Order of operations per submission:
//!
//!   1. blank answer -> fixed "No Response" grade
//!   2. no answer key -> generic overlap grading against the ideal answer
//!   3. context validation -> "Wrong Puzzle" early return (hard cap 15)
//!   4. four weighted dimensions -> total, wrong-answer penalty, feedback

use chrono::Utc;
use tracing::{debug, instrument};

use crate::domain::{DimensionScore, ExpertGrade, GradeLevel, QuickCheck};
use crate::grading::keys::{AnswerKeyStore, CompiledAnswerKey};
use crate::grading::pattern::any_match;
use crate::grading::signatures::detect_puzzle;

/// Dimension weights for the weighted total. Order: required concepts,
/// core answer, correct conclusion, bonus insights.
const WEIGHT_CONCEPTS: f64 = 0.20;
const WEIGHT_CORE: f64 = 0.50;
const WEIGHT_CONCLUSION: f64 = 0.20;
const WEIGHT_BONUS: f64 = 0.10;

/// Each matched bonus insight is worth this much of the bonus dimension;
/// three or more matches saturate it.
const BONUS_STEP: f64 = 35.0;

/// Flat deduction when a known wrong answer is recognized. Applied after the
/// weighted total, floored at zero.
const WRONG_ANSWER_PENALTY: u32 = 15;

/// Ceiling for answers that fail context validation. Kept separate from
/// `WRONG_ANSWER_PENALTY`; the two limits are unrelated even though the
/// values coincide today.
const WRONG_PUZZLE_SCORE_CAP: u32 = 15;

/// Fraction of context terms an answer must mention (at least one).
const CONTEXT_MATCH_FRACTION: f64 = 0.2;

/// Generic-fallback blend: word overlap with the ideal answer vs. key
/// principle coverage.
const GENERIC_OVERLAP_WEIGHT: f64 = 0.6;
const GENERIC_PRINCIPLE_WEIGHT: f64 = 0.4;

/// Fraction of a principle's significant words that must appear before the
/// principle counts as covered.
const PRINCIPLE_HIT_FRACTION: f64 = 0.4;

/// Grading context for puzzles that have no expert answer key: the puzzle's
/// free-text ideal answer and key principles.
#[derive(Clone, Copy, Debug)]
pub struct GenericContext<'a> {
  pub ideal_answer: &'a str,
  pub key_principles: &'a [String],
}

/// Grades answers against expert answer keys, with a generic word-overlap
/// fallback when no key exists for the puzzle.
#[derive(Clone, Debug)]
pub struct ExpertAlignmentGrader {
  keys: AnswerKeyStore,
}

fn significant_words(text_lower: &str) -> Vec<&str> {
  text_lower
    .split(|c: char| !c.is_alphanumeric())
    .filter(|w| w.len() > 3)
    .collect()
}

fn timestamp_now() -> String {
  Utc::now().to_rfc3339()
}

impl ExpertAlignmentGrader {
  pub fn new(keys: AnswerKeyStore) -> Self {
    Self { keys }
  }

  pub fn has_key(&self, puzzle_id: &str) -> bool {
    self.keys.get_answer_key(puzzle_id).is_some()
  }

  /// Grade a free-text answer for a puzzle. `context` supplies the generic
  /// fallback material for puzzles without an answer key.
  #[instrument(level = "debug", skip(self, user_answer, context), fields(%puzzle_id, answer_len = user_answer.len()))]
  pub fn grade_answer(
    &self,
    user_answer: &str,
    puzzle_id: &str,
    context: Option<GenericContext<'_>>,
  ) -> ExpertGrade {
    let trimmed = user_answer.trim();
    if trimmed.is_empty() {
      return Self::no_response();
    }

    let Some(key) = self.keys.get_answer_key(puzzle_id) else {
      debug!(target: "grading", %puzzle_id, "No answer key; using generic fallback grading");
      return Self::generic_grade(trimmed, context);
    };

    let lower = trimmed.to_lowercase();

    // Context validation: is the answer about THIS puzzle at all? Content
    // patterns are never consulted for an answer that fails this gate.
    if !key.context_terms.is_empty() {
      let matched = key.context_terms.iter().filter(|t| lower.contains(t.as_str())).count();
      let required =
        ((CONTEXT_MATCH_FRACTION * key.context_terms.len() as f64).ceil() as usize).max(1);
      if matched < required {
        return Self::wrong_puzzle(key, &lower, matched);
      }
    }

    Self::grade_against_key(key, trimmed, &lower)
  }

  /// Lightweight pass/fail probe for progress gating. Passing requires the
  /// correct conclusion plus at least half the core elements.
  #[instrument(level = "debug", skip(self, user_answer), fields(%puzzle_id))]
  pub fn quick_check(&self, user_answer: &str, puzzle_id: &str) -> QuickCheck {
    let trimmed = user_answer.trim();
    let Some(key) = self.keys.get_answer_key(puzzle_id) else {
      // Gating needs a key; without one there is nothing to pass.
      return QuickCheck { passed: false, conclusion_correct: false, core_answer_ratio: 0.0, score: 0 };
    };
    if trimmed.is_empty() {
      return QuickCheck { passed: false, conclusion_correct: false, core_answer_ratio: 0.0, score: 0 };
    }

    let lower = trimmed.to_lowercase();
    let conclusion_correct = any_match(&key.correct_conclusion.matchers, trimmed, &lower);
    let matched = key
      .core_answer
      .iter()
      .filter(|el| any_match(&el.matchers, trimmed, &lower))
      .count();
    let core_answer_ratio = if key.core_answer.is_empty() {
      1.0
    } else {
      matched as f64 / key.core_answer.len() as f64
    };
    let score =
      ((if conclusion_correct { 50.0 } else { 0.0 }) + core_answer_ratio * 50.0).round() as u32;

    QuickCheck {
      passed: conclusion_correct && core_answer_ratio >= 0.5,
      conclusion_correct,
      core_answer_ratio,
      score,
    }
  }

  fn no_response() -> ExpertGrade {
    ExpertGrade {
      alignment_score: 0,
      grade_level: GradeLevel::NoResponse,
      breakdown: vec![
        dimension("required_concepts", 0, WEIGHT_CONCEPTS, "No answer to assess"),
        dimension("core_answer", 0, WEIGHT_CORE, "No answer to assess"),
        dimension("correct_conclusion", 0, WEIGHT_CONCLUSION, "No answer to assess"),
        dimension("bonus_insights", 0, WEIGHT_BONUS, "No answer to assess"),
      ],
      feedback: "No response provided. Write out your reasoning and try again.".into(),
      feedback_tips: vec![],
      strengths: vec![],
      gaps: vec![],
      wrong_answer_detected: None,
      wrong_puzzle_detected: None,
      timestamp: timestamp_now(),
    }
  }

  fn wrong_puzzle(key: &CompiledAnswerKey, lower: &str, matched: usize) -> ExpertGrade {
    let pct = (matched as f64 / key.context_terms.len() as f64 * 100.0).round() as u32;
    let score = pct.min(WRONG_PUZZLE_SCORE_CAP);
    let detected = detect_puzzle(lower);

    let feedback = match detected {
      Some(name) => format!(
        "This answer appears to be about the \"{}\" puzzle, not \"{}\". Re-read the puzzle and answer what it actually asks.",
        name, key.title
      ),
      None => format!(
        "This answer doesn't mention the key terms of \"{}\". Make sure you're addressing this puzzle's actual question.",
        key.title
      ),
    };

    debug!(target: "grading", title = %key.title, %matched, detected = detected.unwrap_or("-"), "Context validation failed");

    ExpertGrade {
      alignment_score: score,
      grade_level: GradeLevel::WrongPuzzle,
      breakdown: vec![dimension(
        "puzzle_context",
        pct,
        1.0,
        &format!("{} of {} expected context terms found", matched, key.context_terms.len()),
      )],
      feedback,
      feedback_tips: vec![format!("Focus on: {}", key.context_terms.join(", "))],
      strengths: vec![],
      gaps: vec![format!("The answer never engages with \"{}\"", key.title)],
      wrong_answer_detected: None,
      wrong_puzzle_detected: detected.map(str::to_string),
      timestamp: timestamp_now(),
    }
  }

  fn grade_against_key(key: &CompiledAnswerKey, text: &str, lower: &str) -> ExpertGrade {
    // Required concepts: a group is matched when any synonym appears.
    let concept_total = key.required_concepts.len();
    let concepts_matched = key
      .required_concepts
      .iter()
      .filter(|group| group.iter().any(|syn| lower.contains(syn.as_str())))
      .count();
    let concepts_score = if concept_total == 0 {
      100.0
    } else {
      concepts_matched as f64 / concept_total as f64 * 100.0
    };

    // Core answer: weight-normalized credit per matched element.
    let total_weight = key.total_core_weight();
    let mut earned_weight = 0.0;
    let mut matched_elements: Vec<&str> = Vec::new();
    let mut missing_elements: Vec<&str> = Vec::new();
    for el in &key.core_answer {
      if any_match(&el.matchers, text, lower) {
        earned_weight += el.weight;
        matched_elements.push(&el.element);
      } else {
        missing_elements.push(&el.element);
      }
    }
    let core_score = if total_weight == 0.0 { 100.0 } else { earned_weight / total_weight * 100.0 };

    // Conclusion is all-or-nothing.
    let conclusion_correct = any_match(&key.correct_conclusion.matchers, text, lower);
    let conclusion_score = if conclusion_correct { 100.0 } else { 0.0 };

    // Bonus insights saturate after three matches.
    let bonus_hits: Vec<&str> = key
      .bonus_insights
      .iter()
      .filter(|b| lower.contains(b.as_str()))
      .map(String::as_str)
      .collect();
    let bonus_score = (BONUS_STEP * bonus_hits.len() as f64).min(100.0);

    let wrong_answer = key
      .wrong_answer_patterns
      .iter()
      .find(|w| w.matcher.is_match(text, lower))
      .map(|w| w.feedback.clone());

    let weighted = concepts_score * WEIGHT_CONCEPTS
      + core_score * WEIGHT_CORE
      + conclusion_score * WEIGHT_CONCLUSION
      + bonus_score * WEIGHT_BONUS;
    let mut total = weighted.round() as u32;
    if wrong_answer.is_some() {
      // A confidently-stated wrong answer must not pass on style points.
      total = total.saturating_sub(WRONG_ANSWER_PENALTY);
    }
    let total = total.min(100);

    let grade_level = GradeLevel::from_score(total);
    let all_concepts = concept_total > 0 && concepts_matched == concept_total;

    let feedback = main_feedback(total);
    let mut feedback_tips: Vec<String> = Vec::new();
    if let Some(wf) = &wrong_answer {
      feedback_tips.push(wf.clone());
    }
    if !conclusion_correct {
      feedback_tips.push(format!(
        "State the final answer explicitly: {}",
        key.correct_conclusion.description
      ));
    }
    if concept_total > 0 && concepts_matched < concept_total {
      feedback_tips.push(format!(
        "Work in the remaining key concepts ({} of {} mentioned).",
        concepts_matched, concept_total
      ));
    }
    for el in missing_elements.iter().take(2) {
      feedback_tips.push(format!("Address: {el}"));
    }
    feedback_tips.truncate(3);

    let mut strengths: Vec<String> = Vec::new();
    if conclusion_correct {
      strengths.push("Reached the correct final conclusion".into());
    }
    for el in matched_elements.iter().take(2) {
      strengths.push(format!("Covered: {el}"));
    }
    if all_concepts {
      strengths.push("Mentioned every required concept".into());
    }
    if let Some(b) = bonus_hits.first() {
      strengths.push(format!("Bonus insight: {b}"));
    }
    strengths.truncate(4);

    let mut gaps: Vec<String> = Vec::new();
    if !conclusion_correct {
      gaps.push(format!("Expected conclusion: {}", key.correct_conclusion.description));
    }
    for el in missing_elements.iter().take(3) {
      gaps.push(format!("Missing: {el}"));
    }
    gaps.truncate(4);

    ExpertGrade {
      alignment_score: total,
      grade_level,
      breakdown: vec![
        dimension(
          "required_concepts",
          concepts_score.round() as u32,
          WEIGHT_CONCEPTS,
          &format!("{concepts_matched}/{concept_total} concept groups mentioned"),
        ),
        dimension(
          "core_answer",
          core_score.round() as u32,
          WEIGHT_CORE,
          &format!("{}/{} solution elements present", matched_elements.len(), key.core_answer.len()),
        ),
        dimension(
          "correct_conclusion",
          conclusion_score as u32,
          WEIGHT_CONCLUSION,
          if conclusion_correct { "Final answer is correct" } else { "Final answer missing or incorrect" },
        ),
        dimension(
          "bonus_insights",
          bonus_score.round() as u32,
          WEIGHT_BONUS,
          &format!("{} bonus insight(s)", bonus_hits.len()),
        ),
      ],
      feedback,
      feedback_tips,
      strengths,
      gaps,
      wrong_answer_detected: wrong_answer,
      wrong_puzzle_detected: None,
      timestamp: timestamp_now(),
    }
  }

  /// Word-overlap grading for puzzles without an answer key. Coarse by
  /// design; the structural evaluator is the preferred fallback and this path
  /// only runs when a caller insists on expert grading anyway.
  fn generic_grade(text: &str, context: Option<GenericContext<'_>>) -> ExpertGrade {
    let Some(ctx) = context else {
      return ExpertGrade {
        alignment_score: 0,
        grade_level: GradeLevel::Novice,
        breakdown: vec![],
        feedback: "No answer key or ideal answer is available for this puzzle; unable to grade."
          .into(),
        feedback_tips: vec![],
        strengths: vec![],
        gaps: vec![],
        wrong_answer_detected: None,
        wrong_puzzle_detected: None,
        timestamp: timestamp_now(),
      };
    };

    let lower = text.to_lowercase();
    let answer_words: std::collections::HashSet<&str> =
      significant_words(&lower).into_iter().collect();

    let ideal_lower = ctx.ideal_answer.to_lowercase();
    let ideal_words: std::collections::HashSet<&str> =
      significant_words(&ideal_lower).into_iter().collect();
    let overlap = if ideal_words.is_empty() {
      0.0
    } else {
      ideal_words.iter().filter(|w| answer_words.contains(*w)).count() as f64
        / ideal_words.len() as f64
    };

    // A principle counts as covered when enough of its significant words show
    // up in the answer.
    let principle_coverage = if ctx.key_principles.is_empty() {
      overlap
    } else {
      let covered = ctx
        .key_principles
        .iter()
        .filter(|p| {
          let p_lower = p.to_lowercase();
          let words = significant_words(&p_lower);
          if words.is_empty() {
            return false;
          }
          let present = words.iter().filter(|w| answer_words.contains(*w)).count();
          present as f64 / words.len() as f64 >= PRINCIPLE_HIT_FRACTION
        })
        .count();
      covered as f64 / ctx.key_principles.len() as f64
    };

    let score = ((GENERIC_OVERLAP_WEIGHT * overlap + GENERIC_PRINCIPLE_WEIGHT * principle_coverage)
      * 100.0)
      .round() as u32;
    let score = score.min(100);

    ExpertGrade {
      alignment_score: score,
      grade_level: GradeLevel::from_score(score),
      breakdown: vec![
        dimension(
          "ideal_answer_overlap",
          (overlap * 100.0).round() as u32,
          GENERIC_OVERLAP_WEIGHT,
          "Word overlap with the ideal answer",
        ),
        dimension(
          "key_principles",
          (principle_coverage * 100.0).round() as u32,
          GENERIC_PRINCIPLE_WEIGHT,
          "Key principles reflected in the answer",
        ),
      ],
      feedback: main_feedback(score),
      feedback_tips: vec![
        "This puzzle has no expert answer key; grading compares your wording to the ideal answer."
          .into(),
      ],
      strengths: vec![],
      gaps: vec![],
      wrong_answer_detected: None,
      wrong_puzzle_detected: None,
      timestamp: timestamp_now(),
    }
  }
}

fn dimension(name: &str, score: u32, weight: f64, label: &str) -> DimensionScore {
  DimensionScore { dimension: name.into(), score, weight, label: label.into() }
}

fn main_feedback(score: u32) -> String {
  match score {
    85.. => "Excellent work. Your answer closely matches the expert solution.",
    70..=84 => "Strong answer that captures most of the expert solution.",
    50..=69 => "You're on the right track, but key parts of the solution are missing.",
    30..=49 => "Your answer touches the topic but misses the main line of reasoning.",
    _ => "This answer misses the core of the puzzle. Review the solution approach and try again.",
  }
  .into()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{AnswerKey, Conclusion, CoreElement, WrongAnswerPattern};

  fn rope_key() -> AnswerKey {
    AnswerKey {
      title: "Burning Ropes".into(),
      puzzle_context: vec!["rope".into(), "burn".into(), "fuse".into(), "minutes".into(), "light".into()],
      required_concepts: vec![
        vec!["uneven".into(), "not uniform".into(), "non-uniform".into()],
        vec!["both ends".into(), "two ends".into()],
      ],
      core_answer: vec![
        CoreElement {
          element: "light the first rope at both ends".into(),
          weight: 40.0,
          patterns: vec![r"both ends".into()],
        },
        CoreElement {
          element: "light the second rope when the first finishes".into(),
          weight: 30.0,
          patterns: vec![r"(when|after).*(first|other).*(finish|burn|done)".into()],
        },
        CoreElement {
          element: "halving burn time by burning from both ends".into(),
          weight: 30.0,
          patterns: vec![r"(half|30 minutes|halve)".into()],
        },
      ],
      correct_conclusion: Conclusion {
        patterns: vec![r"45\s*min".into(), "forty-five".into()],
        description: "The measured interval is 45 minutes.".into(),
      },
      bonus_insights: vec!["uneven".into(), "remaining".into(), "simultaneous".into()],
      wrong_answer_patterns: vec![WrongAnswerPattern {
        pattern: r"fold.*(rope|half)".into(),
        feedback: "Folding the rope doesn't work: the ropes burn unevenly, so the midpoint isn't the half-time point.".into(),
      }],
    }
  }

  fn grader() -> ExpertAlignmentGrader {
    let mut store = AnswerKeyStore::new();
    store.insert("rope-timer", &rope_key());
    ExpertAlignmentGrader::new(store)
  }

  const GOOD_ANSWER: &str = "Light the first rope at both ends and the second rope at one end. \
    The ropes burn unevenly, but burning from both ends still takes half the time, 30 minutes. \
    When the first rope finishes burning, light the other end of the second rope. \
    The remaining rope then burns in 15 minutes, so the total is 45 minutes.";

  #[test]
  fn blank_answer_is_no_response_for_any_puzzle() {
    let g = grader();
    for id in ["rope-timer", "missing-puzzle"] {
      let r = g.grade_answer("   \n\t ", id, None);
      assert_eq!(r.alignment_score, 0);
      assert_eq!(r.grade_level, GradeLevel::NoResponse);
    }
  }

  #[test]
  fn full_match_scores_at_least_90() {
    let r = grader().grade_answer(GOOD_ANSWER, "rope-timer", None);
    assert!(r.alignment_score >= 90, "got {}", r.alignment_score);
    assert_eq!(r.grade_level, GradeLevel::Expert);
    assert!(r.wrong_answer_detected.is_none());
    assert!(r.strengths.iter().any(|s| s.contains("conclusion")));
  }

  #[test]
  fn wrong_answer_pattern_costs_exactly_fifteen() {
    let g = grader();
    let clean = g.grade_answer(GOOD_ANSWER, "rope-timer", None);
    let with_wrong = format!("{GOOD_ANSWER} You could also fold the rope in half instead.");
    let penalized = g.grade_answer(&with_wrong, "rope-timer", None);
    assert!(penalized.wrong_answer_detected.is_some());
    // Same dimension scores; only the flat penalty differs.
    assert_eq!(penalized.alignment_score, clean.alignment_score.saturating_sub(15));
    assert!(penalized.feedback_tips[0].contains("Folding"));
  }

  #[test]
  fn monty_hall_answer_on_rope_puzzle_is_wrong_puzzle() {
    let r = grader().grade_answer(
      "Switching doors always improves your odds because the host reveals a goat.",
      "rope-timer",
      None,
    );
    assert_eq!(r.grade_level, GradeLevel::WrongPuzzle);
    assert!(r.alignment_score <= 15);
    assert_eq!(r.wrong_puzzle_detected.as_deref(), Some("Monty Hall"));
    assert!(r.feedback.contains("Monty Hall"));
  }

  #[test]
  fn wrong_puzzle_cap_holds_even_with_matching_vocabulary() {
    // Mentions "both ends" and "45 min" but none of the context terms beyond
    // the required threshold; context validation must fire first.
    let r = grader().grade_answer(
      "Grab the cord at both ends, you will be done in 45 min with the ladder and the bucket.",
      "rope-timer",
      None,
    );
    // "min" is not a context term; only "light"/"rope"/"burn"/"fuse"/"minutes" count.
    assert!(r.alignment_score <= 15);
  }

  #[test]
  fn scores_are_integers_in_range() {
    let g = grader();
    for answer in ["", "rope", GOOD_ANSWER, "light burn fuse rope minutes nonsense"] {
      let r = g.grade_answer(answer, "rope-timer", None);
      assert!(r.alignment_score <= 100);
    }
  }

  #[test]
  fn deterministic_modulo_timestamp() {
    let g = grader();
    let a = g.grade_answer(GOOD_ANSWER, "rope-timer", None);
    let b = g.grade_answer(GOOD_ANSWER, "rope-timer", None);
    assert_eq!(a.alignment_score, b.alignment_score);
    assert_eq!(a.grade_level, b.grade_level);
    assert_eq!(a.strengths, b.strengths);
    assert_eq!(a.gaps, b.gaps);
  }

  #[test]
  fn generic_fallback_blends_overlap_and_principles() {
    let g = grader();
    let principles =
      vec!["Correlation does not imply causation".into(), "Control groups isolate variables".into()];
    let ctx = GenericContext {
      ideal_answer: "Correlation does not imply causation; a controlled experiment with a control group is needed.",
      key_principles: &principles,
    };
    let close = g.grade_answer(
      "Correlation alone cannot establish causation. You would need a controlled experiment with a control group.",
      "unknown-puzzle",
      Some(ctx),
    );
    let vague = g.grade_answer("I think it depends on many things.", "unknown-puzzle", Some(ctx));
    assert!(close.alignment_score > vague.alignment_score);
    assert!(close.alignment_score <= 100);
    assert_eq!(vague.breakdown.len(), 2);
  }

  #[test]
  fn quick_check_requires_conclusion_and_half_the_core() {
    let g = grader();
    let qc = g.quick_check(GOOD_ANSWER, "rope-timer");
    assert!(qc.passed);
    assert!(qc.conclusion_correct);
    assert!(qc.core_answer_ratio >= 0.5);

    let qc = g.quick_check("Light it at both ends.", "rope-timer");
    assert!(!qc.passed);
    assert!(!qc.conclusion_correct);

    let qc = g.quick_check("anything", "no-key-here");
    assert!(!qc.passed);
    assert_eq!(qc.score, 0);
  }
}
