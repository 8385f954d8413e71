use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /chat/{id}/messages/`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    /// Message text, stored as given.
    pub text: String,
}
