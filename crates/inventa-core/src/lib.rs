//! # inventa-core: Pure Business Logic for Inventa
//!
//! This crate is the **heart** of Inventa. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Inventa Architecture                           │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation Layer (external)               │   │
//! │  │   product forms ──► transaction form ──► report dialog      │   │
//! │  └───────────────────────────┬─────────────────────────────────┘   │
//! │                              │                                      │
//! │  ┌───────────────────────────▼─────────────────────────────────┐   │
//! │  │             ★ inventa-core (THIS CRATE) ★                   │   │
//! │  │                                                             │   │
//! │  │  ┌──────────┐ ┌──────────┐ ┌───────────┐ ┌─────────────┐   │   │
//! │  │  │  types   │ │  money   │ │   error   │ │ validation  │   │   │
//! │  │  │ Product  │ │  Money   │ │ typed     │ │   rules     │   │   │
//! │  │  │ Ledger   │ │ (cents)  │ │Validation │ │   checks    │   │   │
//! │  │  └──────────┘ └──────────┘ └───────────┘ └─────────────┘   │   │
//! │  │                                                             │   │
//! │  │  NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS         │   │
//! │  └───────────────────────────┬─────────────────────────────────┘   │
//! │                              │                                      │
//! │  ┌───────────────────────────▼─────────────────────────────────┐   │
//! │  │                inventa-db (Database Layer)                  │   │
//! │  │       SQLite repositories, migrations, engine, reports      │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, LedgerEntry, Account, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use inventa_core::Money` instead of
// `use inventa_core::money::Money`

pub use error::ValidationError;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Stock level at or below which a product counts as "low stock".
///
/// ## Business Reason
/// The presentation layer runs a low-stock check after every sale; five
/// units is the threshold the shop has always operated with. Callers can
/// pass their own threshold to `list_low_stock`.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Maximum quantity accepted for a single transaction.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
/// Nothing the shop stocks moves in volumes anywhere near this.
pub const MAX_TRANSACTION_QUANTITY: i64 = 9_999;

/// Name of the bootstrap administrator account.
pub const DEFAULT_ADMIN_NAME: &str = "admin";

/// Credential of the bootstrap administrator account.
///
/// Stored and compared in plaintext, matching the legacy contract. The
/// operator is expected to replace this account on first login.
pub const DEFAULT_ADMIN_CREDENTIAL: &str = "admin123";
