// tests/grading_tests.rs
//
// End-to-end checks of the grading engine through the public crate surface:
// seed bank -> orchestrator -> tagged grading results.

use mindcase_backend::domain::{GradeLevel, GradingResult, PerformanceLevel};
use mindcase_backend::logic::{grade_submission, quick_check_answer};
use mindcase_backend::state::AppState;

const MONTY_EXPERT_ANSWER: &str = "Your first pick only wins 1/3 of the time. The host knows \
  where the car is and always reveals a goat, so his choice is not random information. \
  Switching therefore concentrates the remaining 2/3 probability on the other door: you \
  should always switch, since switching wins two-thirds of the time. With 100 doors this \
  becomes obvious.";

fn expert(result: GradingResult) -> mindcase_backend::domain::ExpertGrade {
    match result {
        GradingResult::Expert(g) => g,
        other => panic!("expected expert grade, got {other:?}"),
    }
}

#[tokio::test]
async fn strong_monty_hall_answer_grades_expert() {
    let state = AppState::new();
    let g = expert(grade_submission(&state, "monty-hall", MONTY_EXPERT_ANSWER).await);
    assert!(g.alignment_score >= 90, "score was {}", g.alignment_score);
    assert_eq!(g.grade_level, GradeLevel::Expert);
    assert_eq!(g.breakdown.len(), 4);
    assert!(g.wrong_answer_detected.is_none());
    assert!(g.wrong_puzzle_detected.is_none());
}

#[tokio::test]
async fn fifty_fifty_claim_is_penalized() {
    let state = AppState::new();
    let with_wrong = format!("{MONTY_EXPERT_ANSWER} Although some say it's 50/50 either way.");
    let clean = expert(grade_submission(&state, "monty-hall", MONTY_EXPERT_ANSWER).await);
    let penalized = expert(grade_submission(&state, "monty-hall", &with_wrong).await);
    assert!(penalized.wrong_answer_detected.is_some());
    assert_eq!(
        penalized.alignment_score,
        clean.alignment_score.saturating_sub(15)
    );
}

#[tokio::test]
async fn monty_hall_answer_on_rope_puzzle_is_wrong_puzzle() {
    let state = AppState::new();
    let g = expert(
        grade_submission(
            &state,
            "burning-ropes",
            "Switching doors always improves your odds because the host reveals a goat.",
        )
        .await,
    );
    assert_eq!(g.grade_level, GradeLevel::WrongPuzzle);
    assert!(g.alignment_score <= 15);
    assert_eq!(g.wrong_puzzle_detected.as_deref(), Some("Monty Hall"));
}

#[tokio::test]
async fn blank_answers_are_no_response_for_any_puzzle() {
    let state = AppState::new();
    for puzzle_id in ["monty-hall", "burning-ropes", "vaccine-timing", "not-a-puzzle"] {
        let result = grade_submission(&state, puzzle_id, " \n\t ").await;
        assert_eq!(result.score(), 0, "puzzle {puzzle_id}");
        match result {
            GradingResult::Expert(g) => assert_eq!(g.grade_level, GradeLevel::NoResponse),
            GradingResult::Structural(e) => {
                assert_eq!(e.performance_level, PerformanceLevel::NoResponse)
            }
        }
    }
}

#[tokio::test]
async fn scores_stay_in_range_for_arbitrary_text() {
    let state = AppState::new();
    let inputs = [
        "",
        "x",
        "door door door door door door",
        "the quick brown fox jumps over the lazy dog",
        MONTY_EXPERT_ANSWER,
        "burn rope light minutes hour 45 min both ends half an hour fold the rope",
    ];
    for puzzle_id in ["monty-hall", "burning-ropes", "vaccine-timing"] {
        for input in inputs {
            let result = grade_submission(&state, puzzle_id, input).await;
            assert!(result.score() <= 100, "{puzzle_id}: {input}");
        }
    }
}

#[tokio::test]
async fn grading_is_deterministic_modulo_timestamp() {
    let state = AppState::new();
    for (puzzle_id, answer) in [
        ("monty-hall", MONTY_EXPERT_ANSWER),
        ("vaccine-timing", "The claim is that vaccines cause autism, but timing is a coincidence."),
    ] {
        let a = grade_submission(&state, puzzle_id, answer).await;
        let b = grade_submission(&state, puzzle_id, answer).await;
        assert_eq!(a.score(), b.score(), "{puzzle_id}");
    }
}

#[tokio::test]
async fn quick_check_gates_on_conclusion_and_core() {
    let state = AppState::new();
    let qc = quick_check_answer(&state, "monty-hall", MONTY_EXPERT_ANSWER).await;
    assert!(qc.passed);
    assert!(qc.conclusion_correct);
    assert!(qc.core_answer_ratio >= 0.5);

    let qc = quick_check_answer(&state, "monty-hall", "The host opens a door with a goat.").await;
    assert!(!qc.passed);

    // Keyless puzzles can't gate.
    let qc = quick_check_answer(&state, "vaccine-timing", MONTY_EXPERT_ANSWER).await;
    assert!(!qc.passed);
    assert_eq!(qc.score, 0);
}

#[tokio::test]
async fn wire_shape_uses_camel_case_and_spaced_labels() {
    let state = AppState::new();
    let result = grade_submission(&state, "monty-hall", "I would stay with my door; it's 50/50 now.").await;
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["grader"], "expert");
    assert!(json["alignmentScore"].is_u64());
    assert!(json.get("wrongAnswerDetected").is_some());
    assert!(json["timestamp"].as_str().unwrap().contains('T'));

    let result = grade_submission(&state, "vaccine-timing", "Short answer.").await;
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["grader"], "structural");
    assert!(json["totalScore"].is_u64());
    assert!(json["components"].as_array().unwrap().len() == 4);
}
