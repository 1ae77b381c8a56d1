//! # Database Handle and Pool
//!
//! `DbConfig` describes the SQLite store; `Database` opens it, applies
//! migrations, and hands out repositories, the engine, and the report
//! exporter over a shared pool.
//!
//! ## Shared State
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Database handle                             │
//! │                                                                     │
//! │   Database ──┬── SqlitePool (WAL) ── shared by every repository     │
//! │              └── write lock ──────── shared by every engine         │
//! │                                                                     │
//! │   Clones share both. A background low-stock check reads from the    │
//! │   pool while the engine commits a sale; WAL keeps readers and the   │
//! │   writer out of each other's way, and the engine's single SQL       │
//! │   transaction means no reader ever sees a stock update without      │
//! │   its ledger entry.                                                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The deployment target is one interactive process with a handful of
//! concurrent callers, so the pool stays small and the write lock is a
//! plain process-wide mutex rather than anything fancier.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::engine::TransactionEngine;
use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::report::ReportExporter;
use crate::repository::account::AccountRepository;
use crate::repository::ledger::LedgerRepository;
use crate::repository::product::ProductRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Settings for opening the store.
///
/// Defaults suit the intended deployment (one interactive process, local
/// file): a small pool, generous timeouts, migrations on connect.
///
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/inventa.db").max_connections(2);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file. Created if absent.
    pub database_path: PathBuf,

    /// Pool size cap. Default 5.
    pub max_connections: u32,

    /// Connections kept alive when idle. Default 1.
    pub min_connections: u32,

    /// How long an acquire may wait for a free connection. Default 30s.
    pub connect_timeout: Duration,

    /// Idle time before a pooled connection is closed. Default 10min.
    pub idle_timeout: Duration,

    /// Apply pending migrations on connect. Default true.
    pub run_migrations: bool,
}

impl DbConfig {
    /// Configuration with defaults for the given database file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Configuration for an isolated in-memory store, used by tests.
    ///
    /// Each in-memory connection is its own database, so the pool is
    /// pinned to a single connection.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository and engine access.
///
/// Cloning is cheap: clones share the pool and, critically, the engine's
/// write lock, so every `Database` handle over the same store serializes
/// its writes with every other handle.
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,

    /// One write lock per backing store. `TransactionEngine::execute` and
    /// `reset_ledger` take it; readers never do.
    write_lock: Arc<Mutex<()>>,
}

impl Database {
    /// Opens (creating if needed) the store described by `config`.
    ///
    /// Configures SQLite for the local interactive workload: WAL journal
    /// so reads run alongside the engine's writes, NORMAL synchronous,
    /// foreign keys on. Pending migrations are applied before the handle
    /// is returned, unless the config opts out.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        // mode=rwc: create the file on first open
        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            // NORMAL under WAL: corruption-safe, the last commit may be
            // lost on power failure
            .synchronous(SqliteSynchronous::Normal)
            // off by default in SQLite
            .foreign_keys(true)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Runs database migrations.
    ///
    /// Idempotent: applied migrations are tracked in `_sqlx_migrations`
    /// and skipped on later runs.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// The underlying pool, for queries no repository covers.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the product repository (the ProductStore).
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    /// Returns the ledger repository (the TransactionLedger).
    pub fn ledger(&self) -> LedgerRepository {
        LedgerRepository::new(self.pool.clone())
    }

    /// Returns the account repository (the UserDirectory).
    pub fn accounts(&self) -> AccountRepository {
        AccountRepository::new(self.pool.clone())
    }

    /// Returns the transaction engine.
    ///
    /// Every engine handed out by this `Database` (or any clone of it)
    /// shares the same write lock, so concurrent `execute` calls on the
    /// same store are mutually exclusive.
    pub fn engine(&self) -> TransactionEngine {
        TransactionEngine::new(self.pool.clone(), Arc::clone(&self.write_lock))
    }

    /// Returns the report exporter.
    pub fn reports(&self) -> ReportExporter {
        ReportExporter::new(self.ledger())
    }

    /// Closes the pool. Every repository handed out from this handle
    /// stops working once closed.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let config = DbConfig::in_memory();
        let db = Database::new(config).await.unwrap();

        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
    }
}
