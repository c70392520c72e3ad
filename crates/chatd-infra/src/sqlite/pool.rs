//! Database pool with split reader/writer connections in WAL mode.
//!
//! SQLite allows only one writer at a time. `DatabasePool` pairs a
//! multi-connection read-only pool for SELECTs with a single-connection
//! writer pool. Both use WAL journal mode and enforce foreign keys, which the
//! messages table relies on to reject rows for deleted chats.

use std::str::FromStr;
use std::time::Duration;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::info;

/// Reversible schema migrations embedded at compile time.
static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Split read/write pool for SQLite with WAL mode.
///
/// - `reader`: read-only pool (up to `max_connections`) for concurrent SELECTs.
/// - `writer`: single-connection pool for serialized INSERT/DELETE.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open both pools without touching the schema.
    ///
    /// Only the writer connects eagerly. Reader connections are opened on
    /// first use, after the writer has created and initialized the file.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let base_opts = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .create_if_missing(true);

        let read_opts = base_opts.clone().read_only(true);

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(base_opts)
            .await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_lazy_with(read_opts);

        Ok(Self { reader, writer })
    }

    /// Connect and bring the schema up to date.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = Self::connect(database_url, 8).await?;
        pool.migrate().await?;
        Ok(pool)
    }

    /// Apply every pending up-migration.
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        MIGRATOR.run(&self.writer).await?;
        info!(migrations = MIGRATOR.iter().count(), "schema migrated");
        Ok(())
    }

    /// Revert every applied migration, newest first.
    pub async fn rollback_all(&self) -> Result<(), MigrateError> {
        MIGRATOR.undo(&self.writer, 0).await?;
        info!("schema rolled back");
        Ok(())
    }

    /// Round-trip a trivial query on the reader.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.reader).await?;
        Ok(())
    }

    /// Close both pools, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.reader.close().await;
        self.writer.close().await;
    }
}
