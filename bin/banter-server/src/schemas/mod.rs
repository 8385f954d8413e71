//! Request bodies accepted by the HTTP API, plus the health report.
//!
//! Chat response bodies are the [`banter_types`] models themselves.

pub mod chat;
pub mod health;
