//! Stub collaborators shared by the unit tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::auth::StaticTokenVerifier;
use crate::completion::{CompletionBridge, CompletionError, CompletionMessage};
use crate::config::Config;
use crate::state::AppState;

pub const ALICE_TOKEN: &str = "token-alice";
pub const BOB_TOKEN: &str = "token-bob";

/// Replies with a fixed text and records every history it was given.
pub struct StubBridge {
    reply: String,
    delay: Option<Duration>,
    calls: Mutex<Vec<Vec<CompletionMessage>>>,
}

impl StubBridge {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_owned(),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Vec<CompletionMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBridge for StubBridge {
    async fn complete(&self, messages: &[CompletionMessage]) -> Result<String, CompletionError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.reply.clone())
    }
}

/// Always fails as if the upstream returned no choices.
pub struct FailingBridge;

#[async_trait]
impl CompletionBridge for FailingBridge {
    async fn complete(&self, _messages: &[CompletionMessage]) -> Result<String, CompletionError> {
        Err(CompletionError::EmptyChoices)
    }
}

pub fn test_config(serialize_appends: bool) -> Config {
    Config {
        bind_address: "127.0.0.1:0".into(),
        log_level: "debug".into(),
        log_json: false,
        cors_allowed_origins: None,
        enable_swagger: false,
        serialize_appends,
        jwt_secret: None,
        jwt_issuer: None,
        jwt_audience: None,
        dev_tokens: Default::default(),
        openai_base_url: "http://127.0.0.1:9".into(),
        openai_api_key: None,
        openai_model: "gpt-test".into(),
        completion_timeout_secs: 1,
    }
}

/// State with two known users (`alice`, `bob`) and the given bridge.
pub fn test_state(completion: Arc<dyn CompletionBridge>, serialize_appends: bool) -> AppState {
    let verifier = StaticTokenVerifier::default()
        .with_token(ALICE_TOKEN, "alice")
        .with_token(BOB_TOKEN, "bob");
    AppState::new(test_config(serialize_appends), Arc::new(verifier), completion)
}
