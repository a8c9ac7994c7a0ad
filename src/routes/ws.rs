//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};

use crate::logic::*;
use crate::protocol::{to_out, ClientWsMessage, ServerWsMessage};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "mindcase_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "mindcase_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        debug!(target: "mindcase_backend", payload = %crate::util::trunc_for_log(&txt, 256), "WS message received");
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => handle_client_ws(incoming, &state).await,
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "mindcase_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "mindcase_backend", "WebSocket disconnected");
}

#[instrument(level = "info", skip(state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::NewPuzzle { skill } => {
      let (p, origin) = state.choose_puzzle(&skill).await;
      tracing::info!(target: "puzzle", %skill, id = %p.id, %origin, "WS new_puzzle served");
      ServerWsMessage::Puzzle { puzzle: to_out(&p) }
    }

    ClientWsMessage::SubmitAnswer { puzzle_id, answer } => {
      let result = grade_submission(state, &puzzle_id, &answer).await;
      tracing::info!(target: "grading", id = %puzzle_id, score = result.score(), "WS submit_answer graded");
      ServerWsMessage::GradeResult { puzzle_id, result }
    }

    ClientWsMessage::QuickCheck { puzzle_id, answer } => {
      let result = quick_check_answer(state, &puzzle_id, &answer).await;
      tracing::info!(target: "grading", id = %puzzle_id, passed = result.passed, "WS quick_check evaluated");
      ServerWsMessage::QuickCheckResult { puzzle_id, result }
    }

    ClientWsMessage::Hint { puzzle_id } => {
      let text = get_hint_text(state, &puzzle_id).await;
      tracing::info!(target: "puzzle", id = %puzzle_id, "WS hint served");
      ServerWsMessage::Hint { text }
    }
  }
}
