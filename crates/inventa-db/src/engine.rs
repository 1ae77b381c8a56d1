//! # Transaction Engine
//!
//! The single write path for purchases and sales. Every executed
//! transaction mutates stock and appends a ledger entry as one atomic
//! unit; no caller ever does one without the other.
//!
//! ## Execution Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     execute(kind, product_id, qty)                  │
//! │                                                                     │
//! │  1. validate quantity          (no state touched on failure)        │
//! │  2. acquire write lock         (one writer at a time)               │
//! │  3. BEGIN                                                           │
//! │  4. load product               ──▶ NotFound? ROLLBACK               │
//! │  5. guarded stock update       ──▶ overdraw? ROLLBACK               │
//! │  6. total = unit price × qty   (price snapshot at execution time)   │
//! │  7. append ledger entry                                             │
//! │  8. COMMIT                                                          │
//! │                                                                     │
//! │  Any failure between BEGIN and COMMIT rolls back both effects.      │
//! │  A crash mid-transaction leaves the database as if the call         │
//! │  never happened.                                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Writes are serialized by a process-wide async lock shared through the
//! `Database` handle. Reads go straight to the pool; WAL mode lets them
//! run while a write is in flight.

use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::repository::{LedgerRepository, ProductRepository};
use inventa_core::validation::validate_quantity;
use inventa_core::{FinancialSummary, LedgerEntry, TransactionKind};

/// Outcome of a successfully executed transaction.
///
/// Carries the appended ledger entry plus the stock level it left behind,
/// so the caller can refresh its display without a second query.
#[derive(Debug, Clone)]
pub struct ExecutedTransaction {
    /// The ledger entry recording this transaction.
    pub entry: LedgerEntry,
    /// Stock level of the product after the update.
    pub new_stock: i64,
}

/// Atomic executor for purchases and sales.
///
/// ## Usage
/// ```rust,ignore
/// let engine = db.engine();
///
/// let done = engine
///     .execute(TransactionKind::Sale, product.id, 3)
///     .await?;
/// println!("sold 3, {} left, total {}", done.new_stock, done.entry.total());
/// ```
#[derive(Debug, Clone)]
pub struct TransactionEngine {
    pool: SqlitePool,
    write_lock: Arc<Mutex<()>>,
}

impl TransactionEngine {
    /// Creates an engine sharing the database's write lock.
    pub fn new(pool: SqlitePool, write_lock: Arc<Mutex<()>>) -> Self {
        TransactionEngine { pool, write_lock }
    }

    /// Executes a purchase or sale against a product.
    ///
    /// Purchases add `quantity` to stock; sales subtract it, refusing to
    /// go below zero. The entry's total is the product's current unit
    /// price for the kind (cost price for purchases, sale price for
    /// sales) times the quantity, captured at execution time. Later price
    /// edits never rewrite recorded totals.
    ///
    /// ## Errors
    /// * `Validation` - quantity not in 1..=9999; nothing is touched
    /// * `NotFound` - product id absent
    /// * `InsufficientStock` - sale would overdraw; stock and ledger are
    ///   left exactly as they were
    pub async fn execute(
        &self,
        kind: TransactionKind,
        product_id: i64,
        quantity: i64,
    ) -> DbResult<ExecutedTransaction> {
        validate_quantity(quantity)?;

        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let product = ProductRepository::get_on(&mut tx, product_id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", product_id))?;

        let new_stock =
            ProductRepository::adjust_stock_on(&mut tx, product_id, kind.signed_delta(quantity))
                .await?;

        let total = product.unit_price(kind).multiply_quantity(quantity);
        let entry =
            LedgerRepository::append_on(&mut tx, kind, product_id, quantity, total).await?;

        tx.commit().await?;

        info!(
            kind = %kind,
            product_id = %product_id,
            quantity = %quantity,
            total = %entry.total(),
            new_stock = %new_stock,
            "Transaction executed"
        );

        Ok(ExecutedTransaction { entry, new_stock })
    }

    /// Computes the all-time financial summary.
    ///
    /// Both sums are read inside one transaction, so the summary reflects
    /// a single consistent snapshot of the ledger even while writes are
    /// in flight.
    pub async fn compute_summary(&self) -> DbResult<FinancialSummary> {
        let mut tx = self.pool.begin().await?;

        let sales = LedgerRepository::sum_by_kind_on(&mut tx, TransactionKind::Sale).await?;
        let purchases =
            LedgerRepository::sum_by_kind_on(&mut tx, TransactionKind::Purchase).await?;

        tx.commit().await?;

        Ok(FinancialSummary::from_totals(sales, purchases))
    }

    /// Erases the entire transaction history.
    ///
    /// Stock levels and the catalog are untouched: the reset forgets
    /// history, it does not undo it. The next executed transaction gets
    /// ledger id 1. Admin-gated at the call site.
    ///
    /// ## Returns
    /// The number of entries erased.
    pub async fn reset_ledger(&self) -> DbResult<u64> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let deleted = LedgerRepository::clear_all_on(&mut tx).await?;

        tx.commit().await?;

        Ok(deleted)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use inventa_core::{Money, NewProduct};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, stock: i64) -> i64 {
        db.products()
            .create(&NewProduct {
                name: "Cola".to_string(),
                category: "soda".to_string(),
                cost_cents: 100,
                sale_cents: 200,
                stock,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_sale_decrements_stock_and_records_total() {
        let db = test_db().await;
        let id = seed_product(&db, 10).await;
        let engine = db.engine();

        let done = engine.execute(TransactionKind::Sale, id, 3).await.unwrap();

        assert_eq!(done.new_stock, 7);
        assert_eq!(done.entry.total(), Money::from_cents(600));
        assert_eq!(done.entry.kind, TransactionKind::Sale);
        assert_eq!(db.products().get(id).await.unwrap().unwrap().stock, 7);
        assert_eq!(db.ledger().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_purchase_increments_stock_at_cost_price() {
        let db = test_db().await;
        let id = seed_product(&db, 2).await;
        let engine = db.engine();

        let done = engine
            .execute(TransactionKind::Purchase, id, 4)
            .await
            .unwrap();

        assert_eq!(done.new_stock, 6);
        assert_eq!(done.entry.total(), Money::from_cents(400));
    }

    #[tokio::test]
    async fn test_overdraw_leaves_everything_untouched() {
        let db = test_db().await;
        let id = seed_product(&db, 2).await;
        let engine = db.engine();

        let err = engine.execute(TransactionKind::Sale, id, 5).await.unwrap_err();
        match err {
            DbError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 2);
                assert_eq!(requested, 5);
            }
            other => panic!("expected InsufficientStock, got {other}"),
        }

        assert_eq!(db.products().get(id).await.unwrap().unwrap().stock, 2);
        assert_eq!(db.ledger().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rejects_bad_quantity_and_unknown_product() {
        let db = test_db().await;
        let id = seed_product(&db, 10).await;
        let engine = db.engine();

        assert!(matches!(
            engine.execute(TransactionKind::Sale, id, 0).await,
            Err(DbError::Validation(_))
        ));
        assert!(matches!(
            engine.execute(TransactionKind::Sale, id, -3).await,
            Err(DbError::Validation(_))
        ));
        assert!(matches!(
            engine.execute(TransactionKind::Sale, id, 10_000).await,
            Err(DbError::Validation(_))
        ));
        assert!(matches!(
            engine.execute(TransactionKind::Sale, 999, 1).await,
            Err(DbError::NotFound { .. })
        ));

        assert_eq!(db.ledger().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_totals_are_price_snapshots() {
        let db = test_db().await;
        let id = seed_product(&db, 10).await;
        let engine = db.engine();

        let done = engine.execute(TransactionKind::Sale, id, 1).await.unwrap();
        assert_eq!(done.entry.total(), Money::from_cents(200));

        // Raising the price afterwards must not rewrite recorded history
        db.products().update_prices(id, 100, 500).await.unwrap();

        let entries = db.ledger().list_all().await.unwrap();
        assert_eq!(entries[0].total(), Money::from_cents(200));

        // But the next sale uses the new price
        let next = engine.execute(TransactionKind::Sale, id, 1).await.unwrap();
        assert_eq!(next.entry.total(), Money::from_cents(500));
    }

    #[tokio::test]
    async fn test_summary_and_margin() {
        let db = test_db().await;
        let id = seed_product(&db, 10).await;
        let engine = db.engine();

        // Empty ledger: all zeros, margin percent 0.0
        let empty = engine.compute_summary().await.unwrap();
        assert!(empty.total_sales.is_zero());
        assert_eq!(empty.margin_percent, 0.0);

        engine.execute(TransactionKind::Sale, id, 3).await.unwrap(); // 600
        engine
            .execute(TransactionKind::Purchase, id, 4)
            .await
            .unwrap(); // 400

        let summary = engine.compute_summary().await.unwrap();
        assert_eq!(summary.total_sales, Money::from_cents(600));
        assert_eq!(summary.total_purchases, Money::from_cents(400));
        assert_eq!(summary.net_margin, Money::from_cents(200));
        assert_eq!(summary.margin_percent, 50.0);
    }

    #[tokio::test]
    async fn test_reset_ledger_keeps_stock_and_restarts_ids() {
        let db = test_db().await;
        let id = seed_product(&db, 10).await;
        let engine = db.engine();

        engine.execute(TransactionKind::Sale, id, 3).await.unwrap();
        engine.execute(TransactionKind::Sale, id, 2).await.unwrap();

        let deleted = engine.reset_ledger().await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(db.ledger().count().await.unwrap(), 0);

        // Stock stays where the sales left it
        assert_eq!(db.products().get(id).await.unwrap().unwrap().stock, 5);

        // Fresh ledger starts over at id 1
        let done = engine.execute(TransactionKind::Sale, id, 1).await.unwrap();
        assert_eq!(done.entry.id, 1);
    }

    #[tokio::test]
    async fn test_history_outlives_deleted_products() {
        let db = test_db().await;
        let id = seed_product(&db, 10).await;
        let engine = db.engine();

        engine.execute(TransactionKind::Sale, id, 3).await.unwrap();
        db.products().delete(id).await.unwrap();

        let entries = db.ledger().list_all().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].product_id, id);

        // New transactions against the dead id fail cleanly
        assert!(matches!(
            engine.execute(TransactionKind::Sale, id, 1).await,
            Err(DbError::NotFound { .. })
        ));
    }

    /// Stock must always reconcile against the ledger: initial plus
    /// purchased quantities minus sold quantities, counting only the
    /// transactions that succeeded.
    #[tokio::test]
    async fn test_stock_reconciles_with_ledger() {
        let db = test_db().await;
        let id = seed_product(&db, 10).await;
        let engine = db.engine();

        engine.execute(TransactionKind::Sale, id, 4).await.unwrap();
        engine.execute(TransactionKind::Purchase, id, 7).await.unwrap();
        engine.execute(TransactionKind::Sale, id, 20).await.unwrap_err(); // rejected
        engine.execute(TransactionKind::Sale, id, 2).await.unwrap();

        let entries = db.ledger().list_all().await.unwrap();
        let delta: i64 = entries
            .iter()
            .map(|e| e.kind.signed_delta(e.quantity))
            .sum();

        let stock = db.products().get(id).await.unwrap().unwrap().stock;
        assert_eq!(stock, 10 + delta);
        assert_eq!(stock, 11);
        assert_eq!(entries.len(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_sales_never_overdraw() {
        let db = test_db().await;
        let id = seed_product(&db, 1).await;

        let a = db.engine();
        let b = db.engine();

        let (ra, rb) = tokio::join!(
            a.execute(TransactionKind::Sale, id, 1),
            b.execute(TransactionKind::Sale, id, 1),
        );

        // Exactly one of the two racing sales wins the last unit
        assert!(ra.is_ok() != rb.is_ok());
        assert_eq!(db.products().get(id).await.unwrap().unwrap().stock, 0);
        assert_eq!(db.ledger().count().await.unwrap(), 1);
    }
}
