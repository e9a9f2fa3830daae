//! Landing page and liveness probe.

use super::ApiError;
use crate::AppState;
use axum::extract::State;
use axum::response::Html;
use axum::Json;
use minijinja::{context, Environment};

const INDEX_TEMPLATE: &str = "index.html";

/// Template environment with the embedded page templates.
pub(crate) fn templates() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template(INDEX_TEMPLATE, include_str!("../../templates/index.html"))?;
    Ok(env)
}

/// GET / – chat page listing the knowledge base highlights.
pub(crate) async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let page = state.templates.get_template(INDEX_TEMPLATE)?.render(context! {
        app_name => state.config.app_name.as_str(),
        highlights => state.knowledge.highlights(),
    })?;
    Ok(Html(page))
}

/// GET /health – liveness check for scripts and load balancers.
pub(crate) async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "responder": state.responder.name(),
    }))
}
