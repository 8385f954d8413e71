//! OpenAI-compatible `/chat/completions` client.
//!
//! Only the non-streaming request shape is used. The request and response
//! structs below mirror the fields of the OpenAI REST API that banter reads
//! or writes; unknown response fields are ignored.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::completion::{CompletionBridge, CompletionError, CompletionMessage};

/// Request body for `POST {base_url}/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [CompletionMessage],
}

/// The message inside a choice. `content` may be `null` for tool calls.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// A single choice in the completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

/// Response body for `POST {base_url}/chat/completions`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

impl ChatCompletionResponse {
    /// Text of the first choice.
    pub fn into_reply(self) -> Result<String, CompletionError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or(CompletionError::EmptyChoices)?;
        choice
            .message
            .content
            .ok_or_else(|| CompletionError::Decode("first choice has no content".to_owned()))
    }
}

/// Client for an OpenAI-compatible chat-completion endpoint.
#[derive(Clone)]
pub struct OpenAiBridge {
    base_url: String,
    api_key: Option<String>,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiBridge")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl OpenAiBridge {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_key,
            model: model.into(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionBridge for OpenAiBridge {
    async fn complete(&self, messages: &[CompletionMessage]) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
        };

        debug!(model = %self.model, turns = messages.len(), "sending completion request");

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let res = request.send().await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(CompletionError::Api { status, body });
        }

        let bytes = res.bytes().await?;
        let data: ChatCompletionResponse = serde_json::from_slice(&bytes)
            .map_err(|e| CompletionError::Decode(e.to_string()))?;
        let completion_id = data.id.clone().unwrap_or_default();
        let reply = data.into_reply()?;

        info!(model = %self.model, completion_id, reply_len = reply.len(), "completion received");
        Ok(reply)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
