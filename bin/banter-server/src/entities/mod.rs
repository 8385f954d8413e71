//! Chat storage abstraction.
//!
//! [`ChatStore`] defines the interface handlers use to reach chats. The
//! default implementation is [`memory::MemoryStore`], which lives for the
//! process lifetime. To move to a durable backend, implement [`ChatStore`]
//! for the new type and change the concrete type in [`crate::state::AppState`].
//!
//! Every lookup is scoped by owner: a chat owned by someone else is reported
//! exactly like a chat that does not exist.

pub mod memory;

use std::future::Future;

use banter_types::{Chat, Message};
use thiserror::Error;

pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// No chat with this id is owned by the caller.
    #[error("chat not found: {0}")]
    ChatNotFound(String),
}

pub trait ChatStore: Send + Sync + 'static {
    /// Insert a new empty chat owned by `user_id` and return it.
    fn create_chat(&self, user_id: &str) -> impl Future<Output = Chat> + Send;

    /// Snapshot of the chat, if `chat_id` exists and is owned by `user_id`.
    fn find_chat(
        &self,
        chat_id: &str,
        user_id: &str,
    ) -> impl Future<Output = Option<Chat>> + Send;

    /// All chats owned by `user_id`, in creation order.
    fn list_chats(&self, user_id: &str) -> impl Future<Output = Vec<Chat>> + Send;

    /// Append `message` to the chat under the same ownership rule as
    /// [`ChatStore::find_chat`].
    fn append_message(
        &self,
        chat_id: &str,
        user_id: &str,
        message: Message,
    ) -> impl Future<Output = Result<Message, StoreError>> + Send;
}
