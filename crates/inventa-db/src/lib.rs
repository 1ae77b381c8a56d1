//! # inventa-db: Storage and Execution Layer for Inventa
//!
//! This crate owns the SQLite database behind the inventory tracker and
//! the transaction engine that writes to it. Pure domain types live in
//! `inventa-core`; everything that touches the database lives here.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Inventa Data Flow                                │
//! │                                                                         │
//! │  Caller (UI, seed binary, tests)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    inventa-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │ Transaction   │    │ Repositories │   │   │
//! │  │   │   (pool.rs)   │    │ Engine        │    │ product      │   │   │
//! │  │   │               │    │ (engine.rs)   │    │ ledger       │   │   │
//! │  │   │ SqlitePool    │◄───│ atomic stock  │◄───│ account      │   │   │
//! │  │   │ write lock    │    │ + ledger      │    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            SQLite Database (WAL)   inventa.db                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool, write lock, and the `Database` handle
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`engine`] - Atomic purchase/sale execution, summary, ledger reset
//! - [`repository`] - Repository implementations (product, ledger, account)
//! - [`report`] - CSV exports
//!
//! ## Usage
//!
//! ```rust,ignore
//! use inventa_db::{Database, DbConfig};
//! use inventa_core::TransactionKind;
//!
//! let db = Database::new(DbConfig::new("inventa.db")).await?;
//!
//! let product = db.products().create(&new_product).await?;
//! let done = db.engine().execute(TransactionKind::Sale, product.id, 3).await?;
//! let summary = db.engine().compute_summary().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod engine;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod report;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use engine::{ExecutedTransaction, TransactionEngine};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use report::ReportExporter;

// Repository re-exports for convenience
pub use repository::account::AccountRepository;
pub use repository::ledger::LedgerRepository;
pub use repository::product::ProductRepository;
