//! banter-types
//!
//! The chat vocabulary shared by the banter server and its clients:
//! [`Chat`], [`Message`] and [`Sender`], with the camelCase wire shape
//! clients consume.

pub mod chat;

pub use chat::{Chat, Message, Sender, DEFAULT_CHAT_TITLE};
