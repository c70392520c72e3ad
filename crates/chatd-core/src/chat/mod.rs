//! Chat domain: store capabilities and the chat service.

pub mod repository;
pub mod service;
