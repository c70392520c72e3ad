//! chatd entry point.
//!
//! Binary name: `chatd`
//!
//! Parses configuration, then hands over to the bootstrap in `app`, which
//! runs until SIGINT/SIGTERM and exits non-zero only if startup failed.

mod app;
mod config;
mod http;
mod state;

use clap::Parser;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    app::run(config).await
}
