//! # Product Repository
//!
//! Database operations for the product catalog (the ProductStore).
//!
//! ## Key Operations
//! - CRUD over the catalog
//! - The guarded stock adjustment the engine builds on
//! - Low-stock listing for the alert the UI shows after sales
//!
//! ## Guarded Stock Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                            │
//! │                                                                     │
//! │  ❌ WRONG: read stock, decide in Rust, write absolute value         │
//! │     SELECT stock ... / UPDATE products SET stock = 7                │
//! │     (two racing sellers both read 1, both write 0: overdraw)        │
//! │                                                                     │
//! │  ✅ CORRECT: one guarded delta update                               │
//! │     UPDATE products SET stock = stock + ?delta                      │
//! │     WHERE id = ?id AND stock + ?delta >= 0                          │
//! │                                                                     │
//! │  rows_affected == 0 means either the id is gone or the sale would   │
//! │  overdraw; one follow-up SELECT distinguishes the two. The update   │
//! │  itself is atomic: stock can never be observed negative.            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use inventa_core::validation::{validate_new_product, validate_price_cents};
use inventa_core::{NewProduct, Product};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let product = repo.create(&NewProduct { /* ... */ }).await?;
/// let found = repo.get(product.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Creates a product, assigning its id.
    ///
    /// ## Errors
    /// * `Validation` - empty name, non-positive price, negative stock
    pub async fn create(&self, new: &NewProduct) -> DbResult<Product> {
        validate_new_product(&new.name, new.cost_cents, new.sale_cents, new.stock)?;

        let name = new.name.trim();
        let category = new.category.trim();

        debug!(name = %name, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, category, cost_cents, sale_cents, stock)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(name)
        .bind(category)
        .bind(new.cost_cents)
        .bind(new.sale_cents)
        .bind(new.stock)
        .execute(&self.pool)
        .await?;

        Ok(Product {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            category: category.to_string(),
            cost_cents: new.cost_cents,
            sale_cents: new.sale_cents,
            stock: new.stock,
        })
    }

    /// Gets a product by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get(&self, id: i64) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        Self::get_on(&mut conn, id).await
    }

    /// Connection-level lookup, reused by the engine inside its write
    /// transaction so the price snapshot and the stock update see the
    /// same row version.
    pub(crate) async fn get_on(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, cost_cents, sale_cents, stock
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(product)
    }

    /// Finds products by exact name.
    ///
    /// Names are not unique; this may return 0, 1, or many rows. Callers
    /// disambiguate by id.
    pub async fn find_by_name(&self, name: &str) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, cost_cents, sale_cents, stock
            FROM products
            WHERE name = ?1
            ORDER BY id
            "#,
        )
        .bind(name.trim())
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Updates a product's prices. Never touches stock.
    ///
    /// Historical ledger totals are snapshots; changing prices here does
    /// not rewrite them.
    ///
    /// ## Errors
    /// * `Validation` - either price is not positive
    /// * `NotFound` - id absent
    pub async fn update_prices(&self, id: i64, cost_cents: i64, sale_cents: i64) -> DbResult<()> {
        validate_price_cents("cost price", cost_cents)?;
        validate_price_cents("sale price", sale_cents)?;

        debug!(id = %id, cost_cents = %cost_cents, sale_cents = %sale_cents, "Updating prices");

        let result = sqlx::query(
            r#"
            UPDATE products SET cost_cents = ?2, sale_cents = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(cost_cents)
        .bind(sale_cents)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Applies a stock delta, refusing any result below zero.
    ///
    /// ## Returns
    /// The new stock level.
    ///
    /// ## Errors
    /// * `NotFound` - id absent
    /// * `InsufficientStock` - the delta would drive stock negative;
    ///   stock is left exactly as it was
    pub async fn adjust_stock(&self, id: i64, delta: i64) -> DbResult<i64> {
        let mut conn = self.pool.acquire().await?;
        Self::adjust_stock_on(&mut conn, id, delta).await
    }

    /// Connection-level stock adjustment, reused by the engine inside its
    /// write transaction.
    pub(crate) async fn adjust_stock_on(
        conn: &mut SqliteConnection,
        id: i64,
        delta: i64,
    ) -> DbResult<i64> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        // Guarded delta update: the WHERE clause is the non-negative
        // stock invariant.
        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock + ?2
            WHERE id = ?1 AND stock + ?2 >= 0
            "#,
        )
        .bind(id)
        .bind(delta)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            // Nothing changed: either the product is gone or the sale
            // would overdraw. One SELECT tells which.
            let available: Option<i64> =
                sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
                    .bind(id)
                    .fetch_optional(&mut *conn)
                    .await?;

            return match available {
                None => Err(DbError::not_found("Product", id)),
                Some(available) => Err(DbError::InsufficientStock {
                    product_id: id,
                    available,
                    requested: -delta,
                }),
            };
        }

        let new_stock: i64 = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;

        Ok(new_stock)
    }

    /// Deletes a product by id.
    ///
    /// Ledger history referencing the product is left untouched, and the
    /// id is never reused or renumbered.
    ///
    /// ## Errors
    /// * `NotFound` - id absent
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Deletes a product by exact name.
    ///
    /// ## Errors
    /// * `NotFound` - no product has this name
    /// * `AmbiguousName` - more than one does; the caller must pick an id
    pub async fn delete_by_name(&self, name: &str) -> DbResult<()> {
        let name = name.trim();
        let matches = self.find_by_name(name).await?;

        match matches.as_slice() {
            [] => Err(DbError::not_found("Product", name)),
            [single] => self.delete(single.id).await,
            many => Err(DbError::AmbiguousName {
                name: name.to_string(),
                count: many.len() as i64,
            }),
        }
    }

    /// Lists the whole catalog, ordered by id ascending.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, cost_cents, sale_cents, stock
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Lists products at or below the given stock threshold, ordered by
    /// id ascending. Feeds the low-stock alert.
    pub async fn list_low_stock(&self, threshold: i64) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, cost_cents, sale_cents, stock
            FROM products
            WHERE stock <= ?1
            ORDER BY id
            "#,
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
