//! Shared application state injected into every Axum handler.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::auth::IdentityVerifier;
use crate::completion::CompletionBridge;
use crate::config::Config;
use crate::entities::MemoryStore;

/// Hands out one async lock per chat id.
///
/// Holding a chat's guard serializes appends to that chat, including the
/// completion call made for a bot reply. Distinct chats never contend.
/// Entries are never removed, matching the chats themselves.
pub struct ChatLocks {
    locks: std::sync::Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl std::fmt::Debug for ChatLocks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.locks.lock().map(|l| l.len()).unwrap_or(0);
        write!(f, "ChatLocks({count} chats)")
    }
}

impl Default for ChatLocks {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatLocks {
    pub fn new() -> Self {
        Self {
            locks: std::sync::Mutex::new(HashMap::new()),
        }
    }

    /// Wait for exclusive access to `chat_id`.
    pub async fn acquire(&self, chat_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(map.entry(chat_id.to_owned()).or_default())
        };
        lock.lock_owned().await
    }
}

/// State shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Process-lifetime chat store.
    pub store: Arc<MemoryStore>,
    /// Turns bearer tokens into user ids.
    pub verifier: Arc<dyn IdentityVerifier>,
    /// Produces bot replies.
    pub completion: Arc<dyn CompletionBridge>,
    /// Per-chat append serialization; `None` when disabled in config.
    pub chat_locks: Option<Arc<ChatLocks>>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store)
            .field("chat_locks", &self.chat_locks)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        config: Config,
        verifier: Arc<dyn IdentityVerifier>,
        completion: Arc<dyn CompletionBridge>,
    ) -> Self {
        let chat_locks = config.serialize_appends.then(|| Arc::new(ChatLocks::new()));
        Self {
            config: Arc::new(config),
            store: Arc::new(MemoryStore::new()),
            verifier,
            completion,
            chat_locks,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_chat_is_exclusive() {
        let locks = ChatLocks::new();
        let guard = locks.acquire("c1").await;

        let blocked = tokio::time::timeout(Duration::from_millis(50), locks.acquire("c1")).await;
        assert!(blocked.is_err());

        drop(guard);
        let reacquired = tokio::time::timeout(Duration::from_millis(50), locks.acquire("c1")).await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn distinct_chats_do_not_contend() {
        let locks = ChatLocks::new();
        let _a = locks.acquire("c1").await;
        let b = tokio::time::timeout(Duration::from_millis(50), locks.acquire("c2")).await;
        assert!(b.is_ok());
    }
}
