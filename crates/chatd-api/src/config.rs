//! Process configuration from command-line flags and environment variables.

use std::time::Duration;

use clap::{ArgAction, Parser};
use thiserror::Error;

/// chatd: chat and message HTTP service backed by SQLite.
#[derive(Debug, Clone, Parser)]
#[command(name = "chatd", version, about, long_about = None)]
pub struct Config {
    /// Address the HTTP listener binds to
    #[arg(long, env = "HTTP_HOST", default_value = "0.0.0.0")]
    pub http_host: String,

    /// Port the HTTP listener binds to
    #[arg(long, env = "HTTP_PORT", default_value_t = 8080)]
    pub http_port: u16,

    /// SQLite connection string
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://chatd.db?mode=rwc")]
    pub database_url: String,

    /// Size of the read connection pool
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 8)]
    pub database_max_connections: u32,

    /// Roll back every migration when the process shuts down
    #[arg(
        long,
        env = "ROLLBACK_ON_SHUTDOWN",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub rollback_on_shutdown: bool,

    /// Stop retrying the database connection after this many seconds
    #[arg(long, env = "CONNECT_MAX_ELAPSED_SECS")]
    pub connect_max_elapsed_secs: Option<u64>,

    /// Export spans through the OpenTelemetry stdout exporter
    #[arg(long, env = "CHATD_OTEL")]
    pub otel: bool,

    /// Emit logs as JSON lines
    #[arg(long, env = "CHATD_LOG_JSON")]
    pub log_json: bool,

    /// Increase log verbosity when RUST_LOG is unset (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("http host must not be empty")]
    EmptyHost,

    #[error("database url must use the sqlite scheme, got '{0}'")]
    UnsupportedDatabase(String),

    #[error("database max connections must be at least 1")]
    NoConnections,
}

impl Config {
    /// Reject settings that would only fail later, after resources are held.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http_host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if !self.database_url.starts_with("sqlite:") {
            return Err(ConfigError::UnsupportedDatabase(self.database_url.clone()));
        }
        if self.database_max_connections == 0 {
            return Err(ConfigError::NoConnections);
        }
        Ok(())
    }

    /// `host:port`, bracketing IPv6 literals.
    pub fn listen_addr(&self) -> String {
        let host = self.http_host.trim();
        if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]:{}", self.http_port)
        } else {
            format!("{host}:{}", self.http_port)
        }
    }

    /// Elapsed-time cap for the database connector, if any.
    pub fn connect_max_elapsed(&self) -> Option<Duration> {
        self.connect_max_elapsed_secs.map(Duration::from_secs)
    }
}
