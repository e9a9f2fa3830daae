//! Chat and reset endpoints. Replies come from the responder chosen at startup;
//! every exchange is appended to the caller's session history.

use super::ApiError;
use crate::session::SessionId;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::{Extension, Json};
use guide_core::{ChatTurn, SYSTEM_PROMPT};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct ChatRequest {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatReply {
    ok: bool,
    response: String,
    history: Vec<ChatTurn>,
}

/// Extracts the trimmed message. Content type is not checked; an unparseable body
/// counts as an empty message.
fn message_from_body(body: &[u8]) -> Option<String> {
    let req: ChatRequest = serde_json::from_slice(body).ok()?;
    let message = req.message?;
    let message = message.trim();
    (!message.is_empty()).then(|| message.to_string())
}

/// POST /chat – `{"message": "..."}` → reply plus the last 10 history turns.
pub(crate) async fn chat(
    State(state): State<AppState>,
    Extension(SessionId(session)): Extension<SessionId>,
    body: Bytes,
) -> Result<Json<ChatReply>, ApiError> {
    let message = message_from_body(&body).ok_or(ApiError::EmptyMessage)?;
    tracing::info!(
        target: "guide::chat",
        session = %session,
        chars = message.len(),
        responder = state.responder.name(),
        "chat request"
    );

    let user_turn = ChatTurn::user(message.as_str());
    let reply = state.responder.respond(SYSTEM_PROMPT, &message).await;
    let history = state
        .sessions
        .record_exchange(session, user_turn, ChatTurn::assistant(reply.as_str()));

    Ok(Json(ChatReply {
        ok: true,
        response: reply,
        history,
    }))
}

/// POST /reset – clears the caller's history; the session id is kept.
pub(crate) async fn reset(
    State(state): State<AppState>,
    Extension(SessionId(session)): Extension<SessionId>,
) -> Json<serde_json::Value> {
    state.sessions.reset(session);
    tracing::info!(target: "guide::chat", session = %session, "history reset");
    Json(serde_json::json!({ "ok": true }))
}
