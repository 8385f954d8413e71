//! The two ways a message enters a chat.
//!
//! Both paths resolve the chat under the caller's ownership first, so a
//! foreign or unknown chat id is a `NotFound` before anything else happens.
//! When per-chat locking is enabled, the chat's lock is held from the
//! history read through the append.

use banter_types::{Chat, Message};
use tokio::sync::OwnedMutexGuard;
use tracing::{info, instrument};

use crate::completion::to_completion_messages;
use crate::entities::ChatStore;
use crate::error::ServerError;
use crate::state::AppState;

/// Append a user-authored message to `chat_id`.
///
/// `text` is stored as given.
#[instrument(skip(state, text), fields(text_len = text.len()))]
pub async fn append_user_message(
    state: &AppState,
    user_id: &str,
    chat_id: &str,
    text: String,
) -> Result<Message, ServerError> {
    resolve(state, chat_id, user_id).await?;
    let _guard = lock_chat(state, chat_id).await;

    let message = state
        .store
        .append_message(chat_id, user_id, Message::from_user(user_id, text))
        .await?;

    info!(message_id = %message.id, "user message appended");
    Ok(message)
}

/// Ask the completion bridge for a reply to the whole history of `chat_id`
/// and append it as a bot message.
///
/// A bridge failure propagates unchanged and nothing is appended.
#[instrument(skip(state))]
pub async fn append_bot_reply(
    state: &AppState,
    user_id: &str,
    chat_id: &str,
) -> Result<Message, ServerError> {
    resolve(state, chat_id, user_id).await?;
    let _guard = lock_chat(state, chat_id).await;

    // Re-read under the lock so a reply queued behind another sees it.
    let chat = resolve(state, chat_id, user_id).await?;
    let turns = to_completion_messages(&chat.messages);
    info!(turns = turns.len(), "completion requested");

    let reply = state.completion.complete(&turns).await?;

    let message = state
        .store
        .append_message(chat_id, user_id, Message::from_bot(user_id, reply))
        .await?;

    info!(message_id = %message.id, "bot reply appended");
    Ok(message)
}

async fn resolve(state: &AppState, chat_id: &str, user_id: &str) -> Result<Chat, ServerError> {
    state
        .store
        .find_chat(chat_id, user_id)
        .await
        .ok_or_else(|| ServerError::NotFound(format!("chat '{chat_id}' not found")))
}

async fn lock_chat(state: &AppState, chat_id: &str) -> Option<OwnedMutexGuard<()>> {
    match &state.chat_locks {
        Some(locks) => Some(locks.acquire(chat_id).await),
        None => None,
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
