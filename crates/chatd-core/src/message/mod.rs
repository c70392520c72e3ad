//! Message domain: store capability, existence gate and the message service.

pub mod repository;
pub mod service;
