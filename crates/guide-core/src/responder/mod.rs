//! Reply sources for the chat endpoint.
//!
//! One responder is picked at startup by [`select_responder`]: the generative one
//! when a model is configured and its client initializes, the rule-based resolver
//! otherwise.

mod generative;

pub use generative::{GenerativeError, GenerativeResponder};

use crate::knowledge::KnowledgeBase;
use crate::resolver::resolve;
use crate::shared::GuideConfig;
use std::sync::Arc;

/// Persona prompt handed to generative backends.
pub const SYSTEM_PROMPT: &str = "You are a friendly and knowledgeable Rwanda travel assistant. \
Be concise, accurate, and warm. Include cultural insights, practical tips, and options. \
If you're uncertain about prices or policies, say you'll need to check official sources.";

/// Trait implemented by every reply source.
#[async_trait::async_trait]
pub trait Responder: Send + Sync {
    /// Short name for logs and status output.
    fn name(&self) -> &str;

    /// Produces a reply to `message`. `prompt_context` is the persona prompt; rule-based
    /// responders ignore it.
    async fn respond(&self, prompt_context: &str, message: &str) -> String;
}

/// Answers from the knowledge base through the keyword resolver.
pub struct RuleBasedResponder {
    knowledge: Arc<KnowledgeBase>,
}

impl RuleBasedResponder {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self { knowledge }
    }
}

#[async_trait::async_trait]
impl Responder for RuleBasedResponder {
    fn name(&self) -> &str {
        "rules"
    }

    async fn respond(&self, _prompt_context: &str, message: &str) -> String {
        resolve(message, &self.knowledge)
    }
}

/// Chooses the responder once at startup. Generative backend failures fall back to
/// the rule-based resolver without surfacing an error.
pub fn select_responder(config: &GuideConfig, knowledge: Arc<KnowledgeBase>) -> Arc<dyn Responder> {
    let Some(model) = config.chat_model.as_deref().filter(|m| !m.trim().is_empty()) else {
        tracing::info!("no chat model configured; using rule-based responder");
        return Arc::new(RuleBasedResponder::new(knowledge));
    };

    match GenerativeResponder::new(
        model,
        &config.llm_api_url,
        config.llm_api_key.as_deref(),
        Arc::clone(&knowledge),
    ) {
        Ok(responder) => {
            tracing::info!(model = responder.model(), "using generative responder");
            Arc::new(responder)
        }
        Err(e) => {
            tracing::warn!(model, "generative responder unavailable ({}); using rule-based responder", e);
            Arc::new(RuleBasedResponder::new(knowledge))
        }
    }
}
