//! # Error Types
//!
//! Domain-specific error types for mostrador-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mostrador-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule violations (404/400-equivalent)  │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  mostrador-db errors (separate crate)                                  │
//! │  ├── DbError          - Storage failures (500-equivalent)              │
//! │  └── LedgerError      - Core | Storage, with ErrorCode mapping         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ─┐                                  │
//! │                          DbError ───┴─► LedgerError → caller           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (SKU, ID, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::money::Quantity;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These are recoverable: the caller gets a typed result and maps it to a
/// client-visible status.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    ///
    /// ## When This Occurs
    /// - Product ID doesn't exist in database
    /// - A sale line references a product that was never created
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Sale cannot be found.
    #[error("Sale not found: {0}")]
    SaleNotFound(i64),

    /// Treasury movement cannot be found.
    #[error("Treasury movement not found: {0}")]
    MovementNotFound(i64),

    /// Delivery note cannot be found.
    #[error("Delivery note not found: {0}")]
    DeliveryNoteNotFound(i64),

    /// Insufficient stock to complete a decrease.
    ///
    /// ## User Workflow
    /// ```text
    /// Register sale (qty: 5)
    ///      │
    ///      ▼
    /// Decrease stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { sku: "YERBA-1KG", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// Whole registration rolls back, nothing is numbered
    /// ```
    #[error("Insufficient stock for {sku} (product {product_id}): available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        sku: String,
        available: Quantity,
        requested: Quantity,
    },

    /// Sale is not in a state that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Editing a sale that was already voided
    #[error("Sale {sale_id} is {current_status}, cannot perform operation")]
    InvalidSaleStatus {
        sale_id: i64,
        current_status: String,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any storage work starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or more.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value exceeds the accepted range, or arithmetic on it would overflow.
    #[error("{field} must be at most {max}")]
    TooLarge { field: String, max: String },

    /// Invalid format (e.g., unknown payment method token).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate SKU).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product_id: 7,
            sku: "YERBA-1KG".to_string(),
            available: Quantity::new(dec!(3)),
            requested: Quantity::new(dec!(5)),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for YERBA-1KG (product 7): available 3, requested 5"
        );
        assert_eq!(CoreError::SaleNotFound(42).to_string(), "Sale not found: 42");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "sku".to_string(),
        };
        assert_eq!(err.to_string(), "sku is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "lines".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
