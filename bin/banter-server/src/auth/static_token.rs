use std::collections::HashMap;

use async_trait::async_trait;

use crate::auth::{AuthError, IdentityVerifier};

/// Fixed `token -> user id` table. Meant for local development and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, String>,
}

impl StaticTokenVerifier {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self { tokens }
    }

    #[cfg(test)]
    pub fn with_token(mut self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        self.tokens.insert(token.into(), user_id.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl IdentityVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<String, AuthError> {
        self.tokens.get(token).cloned().ok_or(AuthError::UnknownToken)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn known_token_maps_to_user() {
        let verifier = StaticTokenVerifier::default().with_token("t-alice", "alice");
        assert_eq!(verifier.verify("t-alice").await.unwrap(), "alice");
    }

    #[tokio::test]
    async fn unknown_token_is_rejected() {
        let verifier = StaticTokenVerifier::default().with_token("t-alice", "alice");
        assert!(matches!(verifier.verify("t-bob").await, Err(AuthError::UnknownToken)));
    }
}
