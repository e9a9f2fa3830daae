//! Shared types used across the guide crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of most recent turns returned to the client after each exchange.
pub const HISTORY_WINDOW: usize = 10;

/// Who authored a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One side of a chat exchange. Immutable once appended to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    /// Creation time, serialized as RFC 3339 (ISO-8601) UTC.
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self::now(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::now(Role::Assistant, content)
    }

    fn now(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Gateway configuration. Load from TOML or env.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideConfig {
    /// Shown in the page header and logs.
    pub app_name: String,
    /// Bind address for the gateway.
    pub host: String,
    /// HTTP port for the gateway.
    pub port: u16,
    /// Path to the knowledge JSON file (faqs, itineraries, highlights).
    pub knowledge_path: String,
    /// Directory served under `/static`.
    pub static_dir: String,
    /// Secret used to sign session cookies. A development default is used when unset.
    #[serde(default)]
    pub secret_key: Option<String>,
    /// Model identifier for the generative responder. When unset the rule-based resolver answers.
    #[serde(default)]
    pub chat_model: Option<String>,
    /// Base URL of an OpenAI-compatible chat completions API.
    pub llm_api_url: String,
    #[serde(default)]
    pub llm_api_key: Option<String>,
}

impl GuideConfig {
    /// Load config from file and environment. Precedence: env `GUIDE_*` > `GUIDE_CONFIG` path
    /// (default `config/gateway.toml`) > defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path = std::env::var("GUIDE_CONFIG").unwrap_or_else(|_| "config/gateway.toml".to_string());
        let builder = config::Config::builder()
            .set_default("app_name", "Rwanda Travel Guide")?
            .set_default("host", "127.0.0.1")?
            .set_default("port", 5000_i64)?
            .set_default("knowledge_path", "data/knowledge.json")?
            .set_default("static_dir", "static")?
            .set_default("llm_api_url", "https://openrouter.ai/api/v1")?;

        let path = Path::new(&config_path);
        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let built = builder
            .add_source(
                config::Environment::with_prefix("GUIDE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        built.try_deserialize()
    }

    /// `host:port` string for binding the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
