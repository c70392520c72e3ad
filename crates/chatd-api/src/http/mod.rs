//! HTTP transport for chatd.
//!
//! Axum routes under `/v1/` plus `/health`. Success bodies are
//! `{"data": ...}`, failures `{"error": "..."}`, always JSON.

pub mod error;
pub mod handlers;
pub mod listener;
pub mod response;
pub mod router;
