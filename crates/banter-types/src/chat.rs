use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title given to every chat at creation.
pub const DEFAULT_CHAT_TITLE: &str = "New Chat";

/// Who a [`Message`] is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// Role name used by OpenAI-style completion APIs.
    pub fn completion_role(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "assistant",
        }
    }
}

/// One turn in a [`Chat`]. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub text: String,
    /// Serialized as RFC 3339.
    pub created_at: DateTime<Utc>,
    /// The requesting user, for bot replies too.
    pub user_id: String,
    pub sender: Sender,
}

impl Message {
    fn new(user_id: impl Into<String>, text: impl Into<String>, sender: Sender) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            created_at: Utc::now(),
            user_id: user_id.into(),
            sender,
        }
    }

    pub fn from_user(user_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(user_id, text, Sender::User)
    }

    /// A generated reply, attributed to the user who requested it.
    pub fn from_bot(user_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(user_id, text, Sender::Bot)
    }
}

/// An ordered conversation owned by a single user.
///
/// `messages` is append-only: insertion order is chronological order is
/// display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    pub title: String,
    pub user_id: String,
    pub messages: Vec<Message>,
}

impl Chat {
    /// Create an empty chat owned by `user_id`.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: DEFAULT_CHAT_TITLE.to_owned(),
            user_id: user_id.into(),
            messages: Vec::new(),
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
