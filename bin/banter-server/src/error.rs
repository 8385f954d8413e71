//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors are automatically converted
//! to a JSON-body HTTP response with an appropriate status code.
//!
//! Completion errors are logged with full detail but only a generic message
//! is returned, so upstream bodies and API details never reach clients.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::completion::CompletionError;
use crate::entities::StoreError;

/// All errors that can occur in the banter-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Missing, malformed or unverifiable credential. Deliberately carries
    /// no detail.
    #[error("unauthorized")]
    Unauthorized,

    /// The chat does not exist or is owned by someone else.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller sent an invalid or malformed request.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Propagated from the completion bridge.
    #[error("completion error: {0}")]
    Completion(#[from] CompletionError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            ServerError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_owned()),
            ServerError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),

            ServerError::Completion(e) => {
                error!(error = %e, "completion bridge failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };
        (status, Json(json!({ "error": client_message }))).into_response()
    }
}

impl From<StoreError> for ServerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::ChatNotFound(id) => ServerError::NotFound(format!("chat '{id}' not found")),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::body::to_bytes;
    use tracing_test::traced_test;

    async fn body_of(err: ServerError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn store_not_found_maps_to_404() {
        let (status, body) = body_of(StoreError::ChatNotFound("c1".into()).into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "chat 'c1' not found");
    }

    #[tokio::test]
    async fn unauthorized_has_uniform_body() {
        let (status, body) = body_of(ServerError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthorized");
    }

    #[tokio::test]
    #[traced_test]
    async fn completion_failure_is_hidden_but_logged() {
        let err = ServerError::from(CompletionError::EmptyChoices);
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "internal server error");
        assert!(logs_contain("completion bridge failed"));
        assert!(logs_contain("no choices"));
    }

    #[tokio::test]
    async fn bad_request_keeps_its_message() {
        let (status, body) = body_of(ServerError::BadRequest("missing field `text`".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "missing field `text`");
    }
}
