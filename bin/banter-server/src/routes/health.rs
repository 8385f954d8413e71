//! Unauthenticated liveness and configuration report.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::schemas::health::{CompletionStatus, HealthResponse};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(get_health),
    components(schemas(HealthResponse, CompletionStatus))
)]
pub struct HealthApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(get_health))
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Server is up", body = HealthResponse)
    )
)]
pub async fn get_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        chats: state.store.chat_count(),
        completion: CompletionStatus {
            model: state.config.openai_model.clone(),
            api_key_configured: state.config.openai_api_key.is_some(),
        },
        serialized_appends: state.chat_locks.is_some(),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::entities::ChatStore;
    use crate::testing::{StubBridge, test_state};

    fn state(serialize: bool) -> Arc<AppState> {
        Arc::new(test_state(Arc::new(StubBridge::new("hi")), serialize))
    }

    #[tokio::test]
    async fn counts_chats_of_every_user() {
        let state = state(true);
        state.store.create_chat("alice").await;
        state.store.create_chat("bob").await;

        let Json(report) = get_health(State(state)).await;
        assert_eq!(report.status, "ok");
        assert_eq!(report.chats, 2);
    }

    #[tokio::test]
    async fn reports_completion_setup_without_the_key() {
        let mut config = crate::testing::test_config(false);
        config.openai_api_key = Some("sk-secret".into());
        let state = Arc::new(AppState::new(
            config,
            Arc::new(crate::auth::StaticTokenVerifier::default()),
            Arc::new(StubBridge::new("hi")),
        ));

        let Json(report) = get_health(State(state)).await;
        assert_eq!(report.completion.model, "gpt-test");
        assert!(report.completion.api_key_configured);
        assert!(!report.serialized_appends);

        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("sk-secret"));
        assert!(json.contains("\"apiKeyConfigured\":true"));
    }

    #[tokio::test]
    async fn fresh_server_reports_serialized_appends() {
        let Json(report) = get_health(State(state(true))).await;
        assert_eq!(report.chats, 0);
        assert!(report.serialized_appends);
        assert!(!report.completion.api_key_configured);
    }
}
