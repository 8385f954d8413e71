use serde::Serialize;
use utoipa::ToSchema;

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Chats held by the store, across all users.
    pub chats: usize,
    pub completion: CompletionStatus,
    /// Whether replies on one chat are serialized.
    pub serialized_appends: bool,
}

/// How the completion bridge is configured. The key itself is never exposed.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionStatus {
    pub model: String,
    pub api_key_configured: bool,
}
