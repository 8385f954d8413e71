use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use banter_types::{Chat, Message};
use tracing::debug;

use crate::entities::{ChatStore, StoreError};

/// In-process chat store. Nothing survives a restart.
///
/// Chats are kept in insertion order, which is also creation order since
/// nothing is ever removed. Locks are held only for the duration of a
/// scan or push and never across an `.await`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    chats: RwLock<Vec<Chat>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chats across all users.
    pub fn chat_count(&self) -> usize {
        self.read().len()
    }

    // A panic while holding the lock cannot leave a half-written chat
    // behind (pushes are the only mutation), so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Chat>> {
        self.chats.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Chat>> {
        self.chats.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl ChatStore for MemoryStore {
    async fn create_chat(&self, user_id: &str) -> Chat {
        let chat = Chat::new(user_id);
        self.write().push(chat.clone());
        debug!(chat_id = %chat.id, user_id, "chat stored");
        chat
    }

    async fn find_chat(&self, chat_id: &str, user_id: &str) -> Option<Chat> {
        self.read()
            .iter()
            .find(|c| c.id == chat_id && c.is_owned_by(user_id))
            .cloned()
    }

    async fn list_chats(&self, user_id: &str) -> Vec<Chat> {
        self.read()
            .iter()
            .filter(|c| c.is_owned_by(user_id))
            .cloned()
            .collect()
    }

    async fn append_message(
        &self,
        chat_id: &str,
        user_id: &str,
        message: Message,
    ) -> Result<Message, StoreError> {
        let mut chats = self.write();
        let chat = chats
            .iter_mut()
            .find(|c| c.id == chat_id && c.is_owned_by(user_id))
            .ok_or_else(|| StoreError::ChatNotFound(chat_id.to_owned()))?;
        chat.messages.push(message.clone());
        Ok(message)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use banter_types::{DEFAULT_CHAT_TITLE, Sender};

    #[tokio::test]
    async fn create_yields_empty_owned_chat() {
        let store = MemoryStore::new();
        let chat = store.create_chat("alice").await;
        assert!(chat.messages.is_empty());
        assert_eq!(chat.title, DEFAULT_CHAT_TITLE);
        assert_eq!(chat.user_id, "alice");
    }

    #[tokio::test]
    async fn find_is_scoped_to_owner() {
        let store = MemoryStore::new();
        let chat = store.create_chat("alice").await;

        let found = store.find_chat(&chat.id, "alice").await;
        assert_eq!(found.map(|c| c.id), Some(chat.id.clone()));
        assert!(store.find_chat(&chat.id, "bob").await.is_none());
        assert!(store.find_chat("missing", "alice").await.is_none());
    }

    #[tokio::test]
    async fn list_returns_only_own_chats_in_creation_order() {
        let store = MemoryStore::new();
        let first = store.create_chat("alice").await;
        store.create_chat("bob").await;
        let second = store.create_chat("alice").await;

        let ids: Vec<_> = store.list_chats("alice").await.into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert_eq!(store.list_chats("bob").await.len(), 1);
        assert!(store.list_chats("carol").await.is_empty());
    }

    #[tokio::test]
    async fn append_grows_chat_by_one_in_order() {
        let store = MemoryStore::new();
        let chat = store.create_chat("alice").await;

        store
            .append_message(&chat.id, "alice", Message::from_user("alice", "one"))
            .await
            .unwrap();
        store
            .append_message(&chat.id, "alice", Message::from_bot("alice", "two"))
            .await
            .unwrap();

        let chat = store.find_chat(&chat.id, "alice").await.unwrap();
        let texts: Vec<_> = chat.messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two"]);
        assert_eq!(chat.messages[1].sender, Sender::Bot);
    }

    #[tokio::test]
    async fn append_to_foreign_chat_is_not_found_and_leaves_it_untouched() {
        let store = MemoryStore::new();
        let chat = store.create_chat("alice").await;

        let err = store
            .append_message(&chat.id, "bob", Message::from_user("bob", "sneaky"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ChatNotFound(id) if id == chat.id));
        assert!(store.find_chat(&chat.id, "alice").await.unwrap().messages.is_empty());
    }

    #[tokio::test]
    async fn returned_chats_are_snapshots() {
        let store = MemoryStore::new();
        let mut chat = store.create_chat("alice").await;
        chat.messages.push(Message::from_user("alice", "local only"));

        let stored = store.find_chat(&chat.id, "alice").await.unwrap();
        assert!(stored.messages.is_empty());
    }
}
