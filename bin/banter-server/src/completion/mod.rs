//! Completion bridge: maps a chat history to an external chat-completion
//! API and returns the generated reply text.
//!
//! There is no retry or batching here. A failed call surfaces as a
//! [`CompletionError`] and the caller decides what that means.

pub mod openai;

use async_trait::async_trait;
use banter_types::Message;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use openai::OpenAiBridge;

/// One `(role, content)` turn as sent to the completion API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionMessage {
    /// `"user"` or `"assistant"`.
    pub role: String,
    pub content: String,
}

impl From<&Message> for CompletionMessage {
    fn from(msg: &Message) -> Self {
        Self {
            role: msg.sender.completion_role().to_owned(),
            content: msg.text.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("completion api returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("completion response had no choices")]
    EmptyChoices,

    #[error("completion response could not be decoded: {0}")]
    Decode(String),
}

/// Produces the bot's reply for an ordered conversation.
#[async_trait]
pub trait CompletionBridge: Send + Sync + 'static {
    async fn complete(&self, messages: &[CompletionMessage]) -> Result<String, CompletionError>;
}

/// Map a chat history, oldest first, into completion turns.
pub fn to_completion_messages(history: &[Message]) -> Vec<CompletionMessage> {
    history.iter().map(CompletionMessage::from).collect()
}
