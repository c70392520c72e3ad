//! Process bootstrap: acquire resources in order, registering each release
//! with the lifecycle orchestrator, then serve.

use std::error::Error as StdError;
use std::future::Future;

use anyhow::Context;
use tracing::{error, info};

use chatd_core::lifecycle::{App, BackoffPolicy, Listener, retry_with_backoff};
use chatd_infra::sqlite::pool::DatabasePool;
use chatd_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing, verbosity_filter};

use crate::config::Config;
use crate::http::listener::HttpListener;
use crate::http::router::build_router;
use crate::state::ConcreteState;

/// Run the service until a termination signal, then release everything.
///
/// Returns an error only when startup fails; cleanups registered up to that
/// point have already run.
pub async fn run(config: Config) -> anyhow::Result<()> {
    init_tracing(&TracingOptions {
        default_filter: verbosity_filter(config.verbose).to_string(),
        json: config.log_json,
        otel: config.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let mut app = App::new("chatd");
    app.on_shutdown("tracing", || async {
        shutdown_tracing();
        Ok(())
    });

    let connect = || DatabasePool::connect(&config.database_url, config.database_max_connections);
    match start(&mut app, &config, connect).await {
        Ok(listeners) => {
            app.run(listeners).await;
            Ok(())
        }
        Err(e) => {
            error!(error = ?e, "startup failed");
            app.shutdown().await;
            Err(e)
        }
    }
}

/// Initialization phase: validate, connect, migrate, wire, bind.
///
/// `connect` is retried with backoff until it yields a pool or the
/// configured connect limit runs out.
pub async fn start<F, Fut, E>(
    app: &mut App,
    config: &Config,
    connect: F,
) -> anyhow::Result<Vec<Box<dyn Listener>>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<DatabasePool, E>>,
    E: StdError + Send + Sync + 'static,
{
    config.validate().context("invalid configuration")?;

    let policy = BackoffPolicy::default().with_max_elapsed_time(config.connect_max_elapsed());
    let pool = retry_with_backoff(&policy, "database", connect)
        .await
        .context("failed to connect to database")?;
    info!("database connected");

    let db = pool.clone();
    app.on_shutdown("database", move || async move {
        db.close().await;
        Ok(())
    });

    pool.migrate().await.context("failed to apply migrations")?;

    if config.rollback_on_shutdown {
        let db = pool.clone();
        app.on_shutdown("migrations", move || async move {
            db.rollback_all().await?;
            Ok(())
        });
    }

    let router = build_router(ConcreteState::from_pool(pool));
    let addr = config.listen_addr();
    let http = HttpListener::bind(&addr, router)
        .await
        .with_context(|| format!("failed to bind http listener on {addr}"))?;
    info!(addr = %http.local_addr()?, "http listener bound");

    Ok(vec![Box::new(http)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use chatd_core::lifecycle::LifecycleState;
    use clap::Parser;

    fn config(db_url: &str, extra: &[&str]) -> Config {
        let mut argv = vec![
            "chatd",
            "--http-host",
            "127.0.0.1",
            "--http-port",
            "0",
            "--database-url",
            db_url,
        ];
        argv.extend_from_slice(extra);
        Config::try_parse_from(argv).unwrap()
    }

    async fn start_with_database(app: &mut App, config: &Config) -> anyhow::Result<Vec<Box<dyn Listener>>> {
        let connect = || DatabasePool::connect(&config.database_url, config.database_max_connections);
        start(app, config, connect).await
    }

    async fn tables(url: &str) -> Vec<String> {
        let pool = DatabasePool::connect(url, 1).await.unwrap();
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('chats', 'messages') ORDER BY name",
        )
        .fetch_all(&pool.writer)
        .await
        .unwrap();
        pool.close().await;
        rows.into_iter().map(|r| r.0).collect()
    }

    #[tokio::test]
    async fn test_start_registers_cleanups_and_shutdown_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("app.db").display());
        let mut app = App::new("test");

        let listeners = start_with_database(&mut app, &config(&url, &[])).await.unwrap();
        assert_eq!(listeners.len(), 1);
        assert_eq!(listeners[0].name(), "http");
        assert_eq!(tables(&url).await, vec!["chats", "messages"]);

        drop(listeners);
        app.shutdown().await;

        assert_eq!(app.state(), LifecycleState::Terminated);
        assert!(tables(&url).await.is_empty());
    }

    #[tokio::test]
    async fn test_schema_survives_shutdown_when_rollback_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("keep.db").display());
        let mut app = App::new("test");

        let listeners = start_with_database(&mut app, &config(&url, &["--rollback-on-shutdown", "false"]))
            .await
            .unwrap();
        drop(listeners);
        app.shutdown().await;

        assert_eq!(tables(&url).await, vec!["chats", "messages"]);
    }

    #[tokio::test]
    async fn test_invalid_config_aborts_before_connecting() {
        let mut app = App::new("test");
        let mut config = config("sqlite::memory:", &[]);
        config.database_max_connections = 0;

        let err = start_with_database(&mut app, &config).await.err().unwrap();
        assert!(format!("{err:#}").contains("invalid configuration"));
    }

    #[tokio::test]
    async fn test_bind_failure_aborts_startup() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("bind.db").display());
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut config = config(&url, &[]);
        config.http_port = taken.local_addr().unwrap().port();
        let mut app = App::new("test");

        let err = start_with_database(&mut app, &config).await.err().unwrap();
        assert!(format!("{err:#}").contains("failed to bind"));

        app.shutdown().await;
        assert_eq!(app.state(), LifecycleState::Terminated);
    }

    #[tokio::test]
    async fn test_start_retries_database_until_it_comes_up() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("retry.db").display());
        let config = config(&url, &[]);
        let attempts = AtomicU32::new(0);
        let mut app = App::new("test");

        let connect = || {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst);
            let url = url.clone();
            async move {
                if attempt < 2 {
                    Err(sqlx::Error::PoolTimedOut)
                } else {
                    DatabasePool::connect(&url, 2).await
                }
            }
        };
        let listeners = start(&mut app, &config, connect).await.unwrap();

        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert_eq!(listeners.len(), 1);
        assert_eq!(tables(&url).await, vec!["chats", "messages"]);

        drop(listeners);
        app.shutdown().await;
        assert_eq!(app.state(), LifecycleState::Terminated);
    }

    #[tokio::test]
    async fn test_start_gives_up_after_connect_limit() {
        let mut config = config("sqlite::memory:", &[]);
        config.connect_max_elapsed_secs = Some(0);
        let mut app = App::new("test");

        let connect = || async { Err::<DatabasePool, _>(sqlx::Error::PoolTimedOut) };
        let err = start(&mut app, &config, connect).await.err().unwrap();

        assert!(format!("{err:#}").contains("failed to connect to database"));
    }
}
