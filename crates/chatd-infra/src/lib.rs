//! Infrastructure layer for chatd.
//!
//! Contains the SQLite implementations of the store traits defined in
//! `chatd-core`, plus the connection pool and schema migrations.

pub mod sqlite;
