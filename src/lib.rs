pub mod config;
pub mod domain;
pub mod grading;
pub mod logic;
pub mod protocol;
pub mod routes;
pub mod seeds;
pub mod state;
pub mod telemetry;
pub mod util;

// Re-export the grading engine
pub use grading::{AnswerKeyStore, ExpertAlignmentGrader, GenericContext, StructuralEvaluator};
