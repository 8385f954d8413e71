//! Request-independent chat logic called by the route handlers.

pub mod chat;
