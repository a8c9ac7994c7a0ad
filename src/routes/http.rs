//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented; logs include parameters and basic result info.

use std::sync::Arc;
use axum::{extract::{Query, State}, response::IntoResponse, Json};
use tracing::{info, instrument};

use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state), fields(skill = %q.skill.clone().unwrap_or_else(|| "logic".into())))]
pub async fn http_get_puzzle(
  State(state): State<Arc<AppState>>,
  Query(q): Query<PuzzleQuery>,
) -> impl IntoResponse {
  let skill = q.skill.unwrap_or_else(|| "logic".into());
  let (p, origin) = state.choose_puzzle(&skill).await;
  info!(target: "puzzle", %skill, id = %p.id, %origin, "HTTP puzzle served");
  Json(crate::protocol::to_out(&p))
}

#[instrument(level = "info", skip(state, body), fields(%body.puzzle_id, answer_len = body.answer.len()))]
pub async fn http_post_grade(
  State(state): State<Arc<AppState>>,
  Json(body): Json<GradeIn>,
) -> impl IntoResponse {
  let result = grade_submission(&state, &body.puzzle_id, &body.answer).await;
  info!(target: "grading", id = %body.puzzle_id, score = result.score(), "HTTP grade evaluated");
  Json(GradeOut { puzzle_id: body.puzzle_id, result })
}

#[instrument(level = "info", skip(state, body), fields(%body.puzzle_id, answer_len = body.answer.len()))]
pub async fn http_post_quick_check(
  State(state): State<Arc<AppState>>,
  Json(body): Json<QuickCheckIn>,
) -> impl IntoResponse {
  let result = quick_check_answer(&state, &body.puzzle_id, &body.answer).await;
  info!(target: "grading", id = %body.puzzle_id, passed = result.passed, "HTTP quick_check evaluated");
  Json(QuickCheckOut { puzzle_id: body.puzzle_id, result })
}

#[instrument(level = "info", skip(state), fields(%q.puzzle_id))]
pub async fn http_get_hint(
  State(state): State<Arc<AppState>>,
  Query(q): Query<HintQuery>,
) -> impl IntoResponse {
  let text = get_hint_text(&state, &q.puzzle_id).await;
  info!(target: "puzzle", id = %q.puzzle_id, "HTTP hint served");
  Json(HintOut { text })
}
