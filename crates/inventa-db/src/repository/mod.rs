//! # Repository Layer
//!
//! Data access for each aggregate, one repository per table.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Repository Pattern                              │
//! │                                                                     │
//! │  TransactionEngine / callers                                        │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐               │
//! │  │ ProductRepo  │  │ LedgerRepo   │  │ AccountRepo  │               │
//! │  └──────┬───────┘  └──────┬───────┘  └──────┬───────┘               │
//! │         │                 │                 │                       │
//! │         └────────────┬────┴─────────────────┘                       │
//! │                      ▼                                              │
//! │               SqlitePool (WAL)                                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each repository owns a pool clone and exposes pool-level methods. Where
//! the engine needs several writes in one transaction, the repository also
//! exposes a `pub(crate)` `*_on` variant taking `&mut SqliteConnection`,
//! so the SQL lives in exactly one place.

pub mod account;
pub mod ledger;
pub mod product;

pub use account::AccountRepository;
pub use ledger::LedgerRepository;
pub use product::ProductRepository;
