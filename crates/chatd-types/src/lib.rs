//! Shared domain types for chatd.
//!
//! Chats, messages, their identifiers, and the error enums shared by the
//! service and store layers.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod error;
pub mod message;
