//! Generative responder: sends the persona prompt and user message to an
//! OpenAI-compatible chat completions API and returns the generated text.

use super::{Responder, RuleBasedResponder};
use crate::knowledge::KnowledgeBase;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum GenerativeError {
    #[error("no API key configured for the chat model")]
    MissingApiKey,
    #[error("http client: {0}")]
    Http(#[from] reqwest::Error),
    #[error("completion returned no text")]
    EmptyCompletion,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

impl CompletionResponse {
    fn into_reply(self) -> Result<String, GenerativeError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(GenerativeError::EmptyCompletion)
    }
}

/// Routes chat messages to a hosted model. A failed call is answered by the
/// rule-based resolver instead.
pub struct GenerativeResponder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    fallback: RuleBasedResponder,
}

impl GenerativeResponder {
    /// Builds the HTTP client. Fails when no API key is given or the client cannot be constructed.
    pub fn new(
        model: &str,
        api_url: &str,
        api_key: Option<&str>,
        knowledge: Arc<KnowledgeBase>,
    ) -> Result<Self, GenerativeError> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(GenerativeError::MissingApiKey)?;
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", api_url.trim_end_matches('/')),
            model: model.to_string(),
            api_key: api_key.to_string(),
            fallback: RuleBasedResponder::new(knowledge),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt_context: &str, message: &str) -> Result<String, GenerativeError> {
        let body = CompletionRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: prompt_context,
                },
                ChatMessage {
                    role: "user",
                    content: message,
                },
            ],
        };
        let response: CompletionResponse = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        response.into_reply()
    }
}

#[async_trait::async_trait]
impl Responder for GenerativeResponder {
    fn name(&self) -> &str {
        "generative"
    }

    async fn respond(&self, prompt_context: &str, message: &str) -> String {
        match self.complete(prompt_context, message).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(model = %self.model, "generation failed ({}); answering from rules", e);
                self.fallback.respond(prompt_context, message).await
            }
        }
    }
}
