//! # Validation Module
//!
//! Input validation utilities for Inventa.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: Presentation (forms)                                      │
//! │  ├── Basic format checks (numeric fields parse, non-empty)          │
//! │  └── Immediate user feedback                                        │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE - business rule validation                    │
//! │  ├── Runs before any repository write                               │
//! │  └── Rejects the request with no state mutated                      │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  ├── NOT NULL / CHECK constraints                                   │
//! │  └── UNIQUE constraints (account names)                             │
//! │                                                                     │
//! │  Defense in depth: multiple layers catch different errors           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use inventa_core::validation::{validate_price_cents, validate_quantity};
//!
//! // Validate prices before a catalog write
//! validate_price_cents("cost price", 100).unwrap();
//!
//! // Validate quantity before executing a transaction
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::MAX_TRANSACTION_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 200 characters
///
/// ## Example
/// ```rust
/// use inventa_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Cola 330ml").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates an account name.
///
/// Same shape as product names; uniqueness is enforced by the store.
pub fn validate_account_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "account name".to_string(),
        });
    }

    if name.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "account name".to_string(),
            max: 100,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a transaction quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_TRANSACTION_QUANTITY
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────┐
/// │  Register Transaction                                               │
/// │                                                                     │
/// │  User enters quantity: 5                                            │
/// │       │                                                             │
/// │       ▼                                                             │
/// │  validate_quantity(5) ← THIS FUNCTION                               │
/// │       │                                                             │
/// │       ├── qty <= 0?   → Error: "quantity must be positive"          │
/// │       │                                                             │
/// │       ├── qty > 9999? → Error: out of range                         │
/// │       │                                                             │
/// │       └── OK → proceed to stock check                               │
/// └─────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_TRANSACTION_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_TRANSACTION_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be strictly positive (> 0); the catalog has no free items and a
///   zero price is always a data-entry slip
///
/// ## Example
/// ```rust
/// use inventa_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents("sale price", 200).is_ok());
/// assert!(validate_price_cents("sale price", 0).is_err());
/// assert!(validate_price_cents("sale price", -100).is_err());
/// ```
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates an initial stock level.
///
/// ## Rules
/// - Must be non-negative (>= 0); zero is a valid starting point
pub fn validate_initial_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates every field of a product creation request.
///
/// Runs all the individual validators; the first failure wins and the
/// request is rejected before any storage write.
pub fn validate_new_product(
    name: &str,
    cost_cents: i64,
    sale_cents: i64,
    stock: i64,
) -> ValidationResult<()> {
    validate_product_name(name)?;
    validate_price_cents("cost price", cost_cents)?;
    validate_price_cents("sale price", sale_cents)?;
    validate_initial_stock(stock)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Cola 330ml").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(100).is_ok());
        assert!(validate_quantity(9999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(10_000).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents("cost price", 100).is_ok());
        assert!(validate_price_cents("cost price", 0).is_err());
        assert!(validate_price_cents("cost price", -100).is_err());
    }

    #[test]
    fn test_validate_initial_stock() {
        assert!(validate_initial_stock(0).is_ok());
        assert!(validate_initial_stock(50).is_ok());
        assert!(validate_initial_stock(-1).is_err());
    }

    #[test]
    fn test_validate_new_product() {
        assert!(validate_new_product("Cola", 100, 200, 10).is_ok());
        assert!(validate_new_product("", 100, 200, 10).is_err());
        assert!(validate_new_product("Cola", 0, 200, 10).is_err());
        assert!(validate_new_product("Cola", 100, 0, 10).is_err());
        assert!(validate_new_product("Cola", 100, 200, -1).is_err());
    }

    #[test]
    fn test_validate_account_name() {
        assert!(validate_account_name("clerk").is_ok());
        assert!(validate_account_name("").is_err());
        assert!(validate_account_name(&"x".repeat(150)).is_err());
    }
}
