//! Axum-based gateway for the Rwanda travel guide. Config-driven via GuideConfig.
//!
//! Routes: `GET /` (chat page), `POST /chat`, `POST /reset`, `GET /health`, `/static/*`.

mod handlers;
mod session;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use guide_core::{select_responder, GuideConfig, KnowledgeBase, Responder, SessionSigner, SessionStore};
use minijinja::Environment;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Used to sign session cookies when no secret is configured.
const DEV_SECRET_KEY: &str = "dev-secret-key";

/// Pre-flight check: config loads, knowledge base validates, port is available.
fn run_verify() -> Result<(), String> {
    let config = GuideConfig::load().map_err(|e| format!("Config load failed: {}", e))?;

    print!("Checking knowledge base at {}... ", config.knowledge_path);
    let kb = KnowledgeBase::load(&config.knowledge_path).map_err(|e| format!("knowledge base invalid: {}", e))?;
    println!(
        "OK ({} faqs, {} highlights)",
        kb.faqs().count(),
        kb.highlights().len()
    );

    print!("Checking templates... ");
    handlers::templates().map_err(|e| format!("template error: {}", e))?;
    println!("OK");

    let addr = config.bind_addr();
    print!("Checking {}... ", addr);
    match std::net::TcpListener::bind(&addr) {
        Ok(listener) => {
            drop(listener);
            println!("OK (available)");
        }
        Err(e) => {
            return Err(format!("{} BLOCKED: {}", addr, e));
        }
    }

    println!("\nAll checks passed. Ready to start gateway.");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load .env file if present (before any env::var calls)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[guide-gateway] .env not loaded: {} (using system environment)", e);
    }

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--verify") {
        match run_verify() {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("PRE-FLIGHT FAILED: {}", e);
                std::process::exit(1);
            }
        }
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(GuideConfig::load()?);

    // No knowledge base, no service.
    let knowledge = match KnowledgeBase::load(&config.knowledge_path) {
        Ok(kb) => Arc::new(kb),
        Err(e) => {
            tracing::error!(path = %config.knowledge_path, "cannot start without knowledge base: {}", e);
            return Err(e.into());
        }
    };

    let secret = match config.secret_key.as_deref().filter(|s| !s.is_empty()) {
        Some(secret) => secret.to_string(),
        None => {
            tracing::warn!("GUIDE_SECRET_KEY not set; signing sessions with the development secret");
            DEV_SECRET_KEY.to_string()
        }
    };

    let responder = select_responder(&config, Arc::clone(&knowledge));
    let state = AppState {
        config: Arc::clone(&config),
        knowledge,
        responder,
        sessions: Arc::new(SessionStore::new()),
        signer: SessionSigner::new(secret)?,
        templates: Arc::new(handlers::templates()?),
    };

    let app = build_app(state);
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("{} listening on http://{}", config.app_name, addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Resolves the static asset directory: as configured relative to the working directory,
/// else relative to the workspace root.
fn static_root_dir(configured: &str) -> PathBuf {
    let from_cwd = PathBuf::from(configured);
    if from_cwd.exists() {
        return from_cwd;
    }

    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join(configured)
}

fn build_app(state: AppState) -> Router {
    let static_dir = static_root_dir(&state.config.static_dir);

    Router::new()
        .route("/", get(handlers::index))
        .route("/chat", post(handlers::chat))
        .route("/reset", post(handlers::reset))
        .route_layer(middleware::from_fn_with_state(state.clone(), session::session_layer))
        .route("/health", get(handlers::health))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Arc<GuideConfig>,
    pub(crate) knowledge: Arc<KnowledgeBase>,
    pub(crate) responder: Arc<dyn Responder>,
    pub(crate) sessions: Arc<SessionStore>,
    pub(crate) signer: SessionSigner,
    pub(crate) templates: Arc<Environment<'static>>,
}
