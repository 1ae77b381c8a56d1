//! # Domain Types
//!
//! Core domain types used throughout Inventa.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────┐        │
//! │  │    Product     │  │  LedgerEntry   │  │    Account     │        │
//! │  │  ────────────  │  │  ────────────  │  │  ────────────  │        │
//! │  │  id (i64)      │  │  id (i64)      │  │  id (i64)      │        │
//! │  │  name          │  │  kind          │  │  name (unique) │        │
//! │  │  category      │  │  product_id    │  │  credential    │        │
//! │  │  cost_cents    │  │  quantity      │  │  role          │        │
//! │  │  sale_cents    │  │  recorded_at   │  └────────────────┘        │
//! │  │  stock         │  │  total_cents   │                            │
//! │  └────────────────┘  └────────────────┘                            │
//! │                                                                     │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────┐        │
//! │  │TransactionKind │  │     Role       │  │FinancialSummary│        │
//! │  │  ────────────  │  │  ────────────  │  │  ────────────  │        │
//! │  │  Purchase      │  │  Admin         │  │  sales, buys   │        │
//! │  │  Sale          │  │  Standard      │  │  margin, pct   │        │
//! │  └────────────────┘  └────────────────┘  └────────────────┘        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity id is an `i64` assigned by the store on creation. Ids are
//! stable for the life of the store: monotonic, never reused after a
//! delete, never renumbered. (The legacy system compacted product ids
//! after every delete, silently invalidating ids held by other callers;
//! that behavior is intentionally not carried forward.)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Transaction Kind
// =============================================================================

/// The direction of a stock movement.
///
/// A `Purchase` brings units into inventory at the product's cost price;
/// a `Sale` moves units out at the product's sale price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Inbound stock movement, recorded at cost price.
    Purchase,
    /// Outbound stock movement, recorded at sale price.
    Sale,
}

impl TransactionKind {
    /// Returns the signed stock delta this kind applies for `quantity`.
    ///
    /// ## Example
    /// ```rust
    /// use inventa_core::TransactionKind;
    ///
    /// assert_eq!(TransactionKind::Purchase.signed_delta(4), 4);
    /// assert_eq!(TransactionKind::Sale.signed_delta(3), -3);
    /// ```
    #[inline]
    pub const fn signed_delta(&self, quantity: i64) -> i64 {
        match self {
            TransactionKind::Purchase => quantity,
            TransactionKind::Sale => -quantity,
        }
    }

    /// Stable lowercase identifier, matching the database encoding.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Purchase => "purchase",
            TransactionKind::Sale => "sale",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "purchase" => Ok(TransactionKind::Purchase),
            "sale" => Ok(TransactionKind::Sale),
            _ => Err(ValidationError::NotAllowed {
                field: "kind".to_string(),
                allowed: vec!["purchase".to_string(), "sale".to_string()],
            }),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product with its current stock level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier, assigned by the store, stable for its lifetime.
    pub id: i64,

    /// Display name. Non-empty but not unique; callers disambiguate.
    pub name: String,

    /// Free-text classifier ("soda", "beer", ...).
    pub category: String,

    /// What the shop pays per unit, in cents.
    pub cost_cents: i64,

    /// What the shop charges per unit, in cents.
    pub sale_cents: i64,

    /// Units currently held. Invariant: never negative.
    pub stock: i64,
}

impl Product {
    /// Returns the cost price as a Money type.
    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// Returns the sale price as a Money type.
    #[inline]
    pub fn sale_price(&self) -> Money {
        Money::from_cents(self.sale_cents)
    }

    /// The unit price a transaction of `kind` is valued at, read at this
    /// instant. Totals are captured at transaction time; later price
    /// edits never touch historical ledger rows.
    #[inline]
    pub fn unit_price(&self, kind: TransactionKind) -> Money {
        match kind {
            TransactionKind::Purchase => self.cost_price(),
            TransactionKind::Sale => self.sale_price(),
        }
    }

    /// Whether this product should appear in a low-stock alert.
    #[inline]
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.stock <= threshold
    }
}

/// Fields required to create a product. The store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub cost_cents: i64,
    pub sale_cents: i64,
    pub stock: i64,
}

// =============================================================================
// Ledger Entry
// =============================================================================

/// One committed transaction in the append-only ledger.
///
/// `product_id` is a soft reference: the product may be deleted later,
/// the ledger row is immutable history either way.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LedgerEntry {
    /// Unique, monotonically assigned. Resets to 1 only on ledger reset.
    pub id: i64,

    /// Purchase or sale.
    pub kind: TransactionKind,

    /// Product the transaction referenced at creation time.
    pub product_id: i64,

    /// Units moved. Always positive; direction lives in `kind`.
    pub quantity: i64,

    /// Set by the engine at execution time, never caller-supplied.
    pub recorded_at: DateTime<Utc>,

    /// `quantity × unit_price`, captured at transaction time, in cents.
    pub total_cents: i64,
}

impl LedgerEntry {
    /// Returns the transaction total as a Money type.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Accounts
// =============================================================================

/// Privilege level of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access: catalog edits, user management, ledger reset.
    Admin,
    /// Sales only.
    Standard,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Standard => "standard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "standard" => Ok(Role::Standard),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec!["admin".to_string(), "standard".to_string()],
            }),
        }
    }
}

/// A named user account.
///
/// Credentials are stored and compared as plaintext, preserving the
/// legacy contract. Known weakness, outside the engine's scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub credential: String,
    pub role: Role,
}

// =============================================================================
// Financial Summary
// =============================================================================

/// Aggregate financial metrics derived from the ledger.
///
/// ## Derivation
/// ```text
/// total_sales     = Σ total over sale rows
/// total_purchases = Σ total over purchase rows
/// net_margin      = total_sales − total_purchases
/// margin_percent  = net_margin / total_purchases × 100   (0.0 if no purchases)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub total_sales: Money,
    pub total_purchases: Money,
    pub net_margin: Money,
    /// Percentage, e.g. 50.0 for a 50% margin. Display-only precision;
    /// the exact figures are the Money fields.
    pub margin_percent: f64,
}

impl FinancialSummary {
    /// Derives the summary from the two ledger sums.
    ///
    /// Division by zero is an expected state, not an error: a fresh store
    /// has no purchases yet, and the summary must still render.
    ///
    /// ## Example
    /// ```rust
    /// use inventa_core::{FinancialSummary, Money};
    ///
    /// let s = FinancialSummary::from_totals(
    ///     Money::from_cents(600),
    ///     Money::from_cents(400),
    /// );
    /// assert_eq!(s.net_margin.cents(), 200);
    /// assert_eq!(s.margin_percent, 50.0);
    /// ```
    pub fn from_totals(total_sales: Money, total_purchases: Money) -> Self {
        let net_margin = total_sales - total_purchases;
        let margin_percent = if total_purchases.is_positive() {
            net_margin.cents() as f64 / total_purchases.cents() as f64 * 100.0
        } else {
            0.0
        };

        FinancialSummary {
            total_sales,
            total_purchases,
            net_margin,
            margin_percent,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_delta() {
        assert_eq!(TransactionKind::Purchase.signed_delta(4), 4);
        assert_eq!(TransactionKind::Sale.signed_delta(3), -3);
    }

    #[test]
    fn test_kind_round_trip() {
        assert_eq!("sale".parse::<TransactionKind>().unwrap(), TransactionKind::Sale);
        assert_eq!(
            "Purchase".parse::<TransactionKind>().unwrap(),
            TransactionKind::Purchase
        );
        assert!("refund".parse::<TransactionKind>().is_err());
        assert_eq!(TransactionKind::Sale.to_string(), "sale");
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" STANDARD ".parse::<Role>().unwrap(), Role::Standard);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_unit_price_selection() {
        let p = Product {
            id: 1,
            name: "Cola".to_string(),
            category: "soda".to_string(),
            cost_cents: 100,
            sale_cents: 200,
            stock: 10,
        };

        assert_eq!(p.unit_price(TransactionKind::Purchase).cents(), 100);
        assert_eq!(p.unit_price(TransactionKind::Sale).cents(), 200);
    }

    #[test]
    fn test_low_stock() {
        let mut p = Product {
            id: 1,
            name: "Cola".to_string(),
            category: "soda".to_string(),
            cost_cents: 100,
            sale_cents: 200,
            stock: 5,
        };

        assert!(p.is_low_stock(5));
        p.stock = 6;
        assert!(!p.is_low_stock(5));
    }

    #[test]
    fn test_summary_from_totals() {
        let s = FinancialSummary::from_totals(Money::from_cents(600), Money::from_cents(400));
        assert_eq!(s.total_sales.cents(), 600);
        assert_eq!(s.total_purchases.cents(), 400);
        assert_eq!(s.net_margin.cents(), 200);
        assert_eq!(s.margin_percent, 50.0);
    }

    /// No purchases yet: the percent is an explicit zero, not a NaN or an
    /// error. A brand-new store must be able to render its summary.
    #[test]
    fn test_summary_zero_purchases() {
        let s = FinancialSummary::from_totals(Money::from_cents(600), Money::zero());
        assert_eq!(s.net_margin.cents(), 600);
        assert_eq!(s.margin_percent, 0.0);
    }

    #[test]
    fn test_summary_negative_margin() {
        let s = FinancialSummary::from_totals(Money::from_cents(300), Money::from_cents(600));
        assert_eq!(s.net_margin.cents(), -300);
        assert_eq!(s.margin_percent, -50.0);
    }
}
