//! The grading engine: two stateless graders plus the answer-key store that
//! decides which one a puzzle gets.
//!
//! `ExpertAlignmentGrader` grades puzzles that have a structured answer key;
//! `StructuralEvaluator` is the puzzle-agnostic fallback. Both are pure
//! functions of (text, context) and safe to call concurrently.

pub mod expert;
pub mod keys;
pub mod pattern;
pub mod signatures;
pub mod structural;

pub use expert::{ExpertAlignmentGrader, GenericContext};
pub use keys::{AnswerKeyStore, CompiledAnswerKey};
pub use structural::{EvaluationContext, StructuralEvaluator};
