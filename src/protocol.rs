//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{GradingResult, Puzzle, PuzzleSource, QuickCheck};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    NewPuzzle {
        skill: String,
    },
    SubmitAnswer {
        #[serde(rename = "puzzleId")]
        puzzle_id: String,
        answer: String,
    },
    QuickCheck {
        #[serde(rename = "puzzleId")]
        puzzle_id: String,
        answer: String,
    },
    Hint {
        #[serde(rename = "puzzleId")]
        puzzle_id: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Puzzle {
        puzzle: PuzzleOut,
    },
    GradeResult {
        #[serde(rename = "puzzleId")]
        puzzle_id: String,
        result: GradingResult,
    },
    QuickCheckResult {
        #[serde(rename = "puzzleId")]
        puzzle_id: String,
        result: QuickCheck,
    },
    Hint {
        text: String,
    },
    Error {
        message: String,
    },
}

/// DTO used by both WS and HTTP for puzzle delivery. Deliberately omits
/// `ideal_answer` and `key_principles`; those would hand clients the rubric.
#[derive(Debug, Serialize)]
pub struct PuzzleOut {
    pub id: String,
    pub title: String,
    pub skill: String,
    pub difficulty: String,
    pub source: PuzzleSource,
    pub prompt: String,
}

/// Convert full `Puzzle` (internal) to the public DTO.
pub fn to_out(p: &Puzzle) -> PuzzleOut {
    PuzzleOut {
        id: p.id.clone(),
        title: p.title.clone(),
        skill: p.skill.clone(),
        difficulty: p.difficulty.clone(),
        source: p.source.clone(),
        prompt: p.prompt.clone(),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct PuzzleQuery {
    pub skill: Option<String>,
}

#[derive(Deserialize)]
pub struct GradeIn {
    #[serde(rename = "puzzleId")]
    pub puzzle_id: String,
    pub answer: String,
}

#[derive(Serialize)]
pub struct GradeOut {
    #[serde(rename = "puzzleId")]
    pub puzzle_id: String,
    pub result: GradingResult,
}

#[derive(Deserialize)]
pub struct QuickCheckIn {
    #[serde(rename = "puzzleId")]
    pub puzzle_id: String,
    pub answer: String,
}

#[derive(Serialize)]
pub struct QuickCheckOut {
    #[serde(rename = "puzzleId")]
    pub puzzle_id: String,
    pub result: QuickCheck,
}

#[derive(Debug, Deserialize)]
pub struct HintQuery {
    #[serde(rename = "puzzleId")]
    pub puzzle_id: String,
}

#[derive(Serialize)]
pub struct HintOut {
    pub text: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_parse_from_camel_case_json() {
        let msg: ClientWsMessage =
            serde_json::from_str(r#"{"type":"submit_answer","puzzleId":"monty-hall","answer":"switch"}"#)
                .unwrap();
        match msg {
            ClientWsMessage::SubmitAnswer { puzzle_id, answer } => {
                assert_eq!(puzzle_id, "monty-hall");
                assert_eq!(answer, "switch");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn grade_result_serializes_with_grader_tag() {
        use crate::grading::{EvaluationContext, StructuralEvaluator};
        let eval = StructuralEvaluator::new().evaluate_response("", EvaluationContext::default());
        let out = ServerWsMessage::GradeResult {
            puzzle_id: "p1".into(),
            result: GradingResult::Structural(eval),
        };
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["type"], "grade_result");
        assert_eq!(json["result"]["grader"], "structural");
        assert_eq!(json["result"]["performanceLevel"], "No Response");
    }
}
