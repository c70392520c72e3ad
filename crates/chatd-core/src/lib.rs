//! Business logic, store trait definitions and process lifecycle for chatd.
//!
//! This crate defines the "ports" (store traits) that the infrastructure
//! layer implements, the chat and message services built on them, and the
//! lifecycle orchestrator. It depends only on `chatd-types` -- never on
//! `chatd-infra` or any database/HTTP crate.

pub mod chat;
pub mod lifecycle;
pub mod message;
