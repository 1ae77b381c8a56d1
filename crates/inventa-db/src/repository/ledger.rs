//! # Ledger Repository
//!
//! Append-only history of executed purchases and sales.
//!
//! ## Key Operations
//! - Append an entry with its server-assigned timestamp and total
//! - List history in chronological order
//! - Sum totals per kind for the financial summary
//! - Reset: wipe all history and restart ids at 1
//!
//! Entries are never edited. A mistaken transaction is corrected by a
//! compensating one, not by rewriting history. Entry ids are assigned by
//! the database (AUTOINCREMENT) and stay stable for the life of the
//! ledger; only a full reset restarts the sequence.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::DbResult;
use inventa_core::{LedgerEntry, Money, TransactionKind};

/// Repository for transaction history.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    /// Creates a new LedgerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LedgerRepository { pool }
    }

    /// Connection-level append, called by the engine inside the same
    /// write transaction as the stock update so the two commit or roll
    /// back together.
    ///
    /// Assigns the timestamp server-side at insert time.
    pub(crate) async fn append_on(
        conn: &mut SqliteConnection,
        kind: TransactionKind,
        product_id: i64,
        quantity: i64,
        total: Money,
    ) -> DbResult<LedgerEntry> {
        let recorded_at = Utc::now();

        debug!(kind = %kind, product_id = %product_id, quantity = %quantity, "Appending ledger entry");

        let result = sqlx::query(
            r#"
            INSERT INTO transactions (kind, product_id, quantity, recorded_at, total_cents)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(kind)
        .bind(product_id)
        .bind(quantity)
        .bind(recorded_at)
        .bind(total.cents())
        .execute(&mut *conn)
        .await?;

        Ok(LedgerEntry {
            id: result.last_insert_rowid(),
            kind,
            product_id,
            quantity,
            recorded_at,
            total_cents: total.cents(),
        })
    }

    /// Lists the full history in chronological order (id ascending; ids
    /// are assigned monotonically, so id order is append order even for
    /// same-timestamp entries).
    pub async fn list_all(&self) -> DbResult<Vec<LedgerEntry>> {
        let entries = sqlx::query_as::<_, LedgerEntry>(
            r#"
            SELECT id, kind, product_id, quantity, recorded_at, total_cents
            FROM transactions
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Lists history of one kind, in chronological order.
    pub async fn list_by_kind(&self, kind: TransactionKind) -> DbResult<Vec<LedgerEntry>> {
        let entries = sqlx::query_as::<_, LedgerEntry>(
            r#"
            SELECT id, kind, product_id, quantity, recorded_at, total_cents
            FROM transactions
            WHERE kind = ?1
            ORDER BY id
            "#,
        )
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Sums totals for one kind over the whole ledger.
    pub async fn sum_by_kind(&self, kind: TransactionKind) -> DbResult<Money> {
        let mut conn = self.pool.acquire().await?;
        Self::sum_by_kind_on(&mut conn, kind).await
    }

    /// Connection-level sum, so the summary can read both kinds inside
    /// one transaction and see a single consistent snapshot.
    pub(crate) async fn sum_by_kind_on(
        conn: &mut SqliteConnection,
        kind: TransactionKind,
    ) -> DbResult<Money> {
        let cents: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(total_cents), 0) FROM transactions WHERE kind = ?1")
                .bind(kind)
                .fetch_one(conn)
                .await?;

        Ok(Money::from_cents(cents))
    }

    /// Counts ledger entries.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Connection-level reset, called by the engine while it holds the
    /// write lock.
    ///
    /// Deletes every entry and resets the AUTOINCREMENT sequence so the
    /// next entry gets id 1. Stock levels are not touched; the reset
    /// erases history, it does not undo it.
    pub(crate) async fn clear_all_on(conn: &mut SqliteConnection) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM transactions")
            .execute(&mut *conn)
            .await?;

        // Restart id assignment at 1 for the fresh ledger.
        sqlx::query("DELETE FROM sqlite_sequence WHERE name = 'transactions'")
            .execute(&mut *conn)
            .await?;

        info!(deleted = %result.rows_affected(), "Ledger cleared");

        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
