//! Chat routes. Every route here sits behind [`require_auth`], and every
//! lookup is scoped to the authenticated caller.
//!
//! Each path is served with and without its trailing slash.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Extension, Json, Router, middleware};
use banter_types::{Chat, Message, Sender};
use tracing::info;
use utoipa::OpenApi;

use crate::entities::ChatStore;
use crate::error::ServerError;
use crate::handlers;
use crate::middleware::{AuthUser, require_auth};
use crate::schemas::chat::SendMessageRequest;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(create_chat, list_chats, get_chat, send_message, request_response),
    components(schemas(Chat, Message, Sender, SendMessageRequest))
)]
pub struct ChatApi;

/// Register chat routes, guarded by bearer authentication.
pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/chat", post(create_chat).get(list_chats))
        .route("/chat/", post(create_chat).get(list_chats))
        .route("/chat/{id}", get(get_chat))
        .route("/chat/{id}/", get(get_chat))
        .route("/chat/{id}/messages", post(send_message))
        .route("/chat/{id}/messages/", post(send_message))
        .route("/chat/{id}/response", get(request_response))
        .route("/chat/{id}/response/", get(request_response))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

#[utoipa::path(
    post,
    path = "/chat/",
    tag = "chat",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "New empty chat", body = Chat),
        (status = 401, description = "Missing or invalid credential"),
    )
)]
pub async fn create_chat(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<Chat> {
    let chat = state.store.create_chat(&user.user_id).await;
    info!(chat_id = %chat.id, user_id = %user.user_id, "chat created");
    Json(chat)
}

#[utoipa::path(
    get,
    path = "/chat/",
    tag = "chat",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Chats owned by the caller, oldest first", body = Vec<Chat>),
        (status = 401, description = "Missing or invalid credential"),
    )
)]
pub async fn list_chats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<Vec<Chat>> {
    Json(state.store.list_chats(&user.user_id).await)
}

#[utoipa::path(
    get,
    path = "/chat/{id}/",
    tag = "chat",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Chat id")),
    responses(
        (status = 200, description = "The chat with all its messages", body = Chat),
        (status = 401, description = "Missing or invalid credential"),
        (status = 404, description = "No such chat for this caller"),
    )
)]
pub async fn get_chat(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Chat>, ServerError> {
    state
        .store
        .find_chat(&id, &user.user_id)
        .await
        .map(Json)
        .ok_or_else(|| ServerError::NotFound(format!("chat '{id}' not found")))
}

#[utoipa::path(
    post,
    path = "/chat/{id}/messages/",
    tag = "chat",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Chat id")),
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "The appended user message", body = Message),
        (status = 400, description = "Malformed body"),
        (status = 401, description = "Missing or invalid credential"),
        (status = 404, description = "No such chat for this caller"),
    )
)]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<Message>, ServerError> {
    let Json(req) = body.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    handlers::chat::append_user_message(&state, &user.user_id, &id, req.text)
        .await
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/chat/{id}/response/",
    tag = "chat",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Chat id")),
    responses(
        (status = 200, description = "The appended bot reply", body = Message),
        (status = 401, description = "Missing or invalid credential"),
        (status = 404, description = "No such chat for this caller"),
        (status = 500, description = "Completion API failure"),
    )
)]
pub async fn request_response(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Message>, ServerError> {
    handlers::chat::append_bot_reply(&state, &user.user_id, &id)
        .await
        .map(Json)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
