//! HTTP handlers for the guide gateway.

mod chat;
mod page;

pub(crate) use chat::{chat, reset};
pub(crate) use page::{health, index, templates};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Guidance returned when `/chat` receives no usable message.
pub(crate) const EMPTY_MESSAGE_REPLY: &str = "Please type a message.";

/// Errors surfaced to HTTP clients.
#[derive(Debug)]
pub(crate) enum ApiError {
    /// Missing, blank or unparseable chat message.
    EmptyMessage,
    /// Page template failed to render.
    Render(minijinja::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::EmptyMessage => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "ok": false, "response": EMPTY_MESSAGE_REPLY })),
            )
                .into_response(),
            ApiError::Render(e) => {
                tracing::error!("page render failed: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Page unavailable").into_response()
            }
        }
    }
}

impl From<minijinja::Error> for ApiError {
    fn from(e: minijinja::Error) -> Self {
        ApiError::Render(e)
    }
}
