//! # Validation Module
//!
//! Input validation for Mostrador documents.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend / HTTP layer                                        │
//! │  └── Deserialization (serde): types and enum tokens                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Business rules on drafts, before any transaction opens            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE constraints                                     │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mostrador_core::validation::{validate_sku, validate_quantity};
//! use mostrador_core::Quantity;
//!
//! assert!(validate_sku("YERBA-1KG").is_ok());
//! assert!(validate_quantity(Quantity::units(0)).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::{Money, Quantity};
use crate::types::{DeliveryNoteDraft, NewMovement, ProductDraft, SaleDraft, SaleLineDraft};
use rust_decimal::Decimal;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest free-text field accepted (names, descriptions, references).
pub const MAX_TEXT_LEN: usize = 500;

/// Largest price, total or movement amount accepted (10^15).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Largest quantity accepted on a single line or movement (10^9).
pub const MAX_QUANTITY: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use mostrador_core::validation::validate_sku;
///
/// assert!(validate_sku("YERBA-1KG").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("has space").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.chars().count() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name: required, at most 200 characters.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Optional free text: anything up to [`MAX_TEXT_LEN`] characters.
pub fn validate_optional_text(field: &str, value: Option<&str>) -> ValidationResult<()> {
    match value {
        Some(text) if text.chars().count() > MAX_TEXT_LEN => Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity moved in or out of stock.
///
/// ## Rules
/// - Must be positive (> 0); fractional quantities are fine
/// - At most [`MAX_QUANTITY`]
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Sale line: 0.5 kg                                                      │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(0.5) ← THIS FUNCTION                                │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       ├── qty > MAX_QUANTITY? → Error: "quantity must be at most ..."  │
/// │       │                                                                 │
/// │       └── OK → Inventory Ledger decrease                               │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: Quantity) -> ValidationResult<()> {
    if !qty.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty.value() > MAX_QUANTITY {
        return Err(too_large("quantity", MAX_QUANTITY));
    }

    Ok(())
}

/// Validates a price. Zero is allowed (free items), negatives are not.
///
/// ## Example
/// ```rust
/// use mostrador_core::validation::validate_price;
/// use mostrador_core::Money;
///
/// assert!(validate_price("price", Money::from_cents(1099)).is_ok());
/// assert!(validate_price("price", Money::zero()).is_ok());
/// assert!(validate_price("price", Money::from_cents(-100)).is_err());
/// ```
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    if price.amount() > MAX_AMOUNT {
        return Err(too_large(field, MAX_AMOUNT));
    }

    Ok(())
}

/// Validates a treasury amount: strictly positive, direction carries the sign.
pub fn validate_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    if amount.amount() > MAX_AMOUNT {
        return Err(too_large("amount", MAX_AMOUNT));
    }

    Ok(())
}

/// Subtotal of one line, or `TooLarge` when it does not fit.
pub fn line_subtotal(line: &SaleLineDraft) -> ValidationResult<Money> {
    line.subtotal()
        .ok_or_else(|| too_large("subtotal", MAX_AMOUNT))
}

/// Total a sale will be stored with, or `TooLarge` when it does not fit
/// or exceeds [`MAX_AMOUNT`].
pub fn sale_total(draft: &SaleDraft) -> ValidationResult<Money> {
    match draft.total() {
        Some(total) if total.amount() <= MAX_AMOUNT => Ok(total),
        _ => Err(too_large("total", MAX_AMOUNT)),
    }
}

fn too_large(field: &str, max: Decimal) -> ValidationError {
    ValidationError::TooLarge {
        field: field.to_string(),
        max: max.to_string(),
    }
}

// =============================================================================
// Document Validators
// =============================================================================

/// Validates a product before insert or catalog edit.
pub fn validate_product_draft(draft: &ProductDraft) -> ValidationResult<()> {
    validate_sku(&draft.sku)?;
    validate_product_name(&draft.name)?;
    validate_price("cost_price", draft.cost_price)?;
    validate_price("sale_price", draft.sale_price)?;

    if draft.stock.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "stock".to_string(),
        });
    }

    if draft.stock.value() > MAX_QUANTITY {
        return Err(too_large("stock", MAX_QUANTITY));
    }

    Ok(())
}

/// Validates a sale before registration or update.
///
/// ## Rules
/// - At least one line
/// - Every line: positive quantity, non-negative unit price
/// - Explicit total, when given, must not be negative
/// - Every subtotal and the total fit within [`MAX_AMOUNT`]
/// - Free text within [`MAX_TEXT_LEN`]
pub fn validate_sale_draft(draft: &SaleDraft) -> ValidationResult<()> {
    if draft.lines.is_empty() {
        return Err(ValidationError::Required {
            field: "lines".to_string(),
        });
    }

    for line in &draft.lines {
        validate_quantity(line.quantity)?;
        validate_price("unit_price", line.unit_price)?;
        line_subtotal(line)?;
    }

    if let Some(total) = draft.total {
        validate_price("total", total)?;
    }
    sale_total(draft)?;

    validate_optional_text("customer_name", draft.customer_name.as_deref())?;
    validate_optional_text("description", draft.description.as_deref())?;
    validate_optional_text("check_bank", draft.check.bank.as_deref())?;
    validate_optional_text("check_drawer", draft.check.drawer.as_deref())?;

    Ok(())
}

/// Validates a manual treasury movement.
pub fn validate_new_movement(movement: &NewMovement) -> ValidationResult<()> {
    validate_amount(movement.amount)?;
    validate_optional_text("reference", movement.reference.as_deref())?;
    validate_optional_text("description", movement.description.as_deref())?;
    Ok(())
}

/// Validates a delivery note: at least one line, positive quantities.
pub fn validate_delivery_note_draft(draft: &DeliveryNoteDraft) -> ValidationResult<()> {
    if draft.lines.is_empty() {
        return Err(ValidationError::Required {
            field: "lines".to_string(),
        });
    }

    for line in &draft.lines {
        validate_quantity(line.quantity)?;
    }

    validate_optional_text("customer_name", draft.customer_name.as_deref())?;
    validate_optional_text("notes", draft.notes.as_deref())?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MovementDirection, SaleLineDraft};
    use crate::PaymentMethod;
    use rust_decimal_macros::dec;

    fn line(qty: Quantity, price: Money) -> SaleLineDraft {
        SaleLineDraft::new(1, qty, price)
    }

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("YERBA-1KG").is_ok());
        assert!(validate_sku("ABC123").is_ok());
        assert!(validate_sku("product_1").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Yerba Mate 1kg").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(Quantity::units(1)).is_ok());
        assert!(validate_quantity(Quantity::new(dec!(0.001))).is_ok());

        assert!(validate_quantity(Quantity::zero()).is_err());
        assert!(validate_quantity(Quantity::new(dec!(-1))).is_err());
    }

    #[test]
    fn test_validate_product_draft_rejects_negative_stock() {
        let draft = ProductDraft {
            sku: "P-1".to_string(),
            name: "Product".to_string(),
            cost_price: Money::new(dec!(5)),
            sale_price: Money::new(dec!(10)),
            stock: Quantity::new(dec!(-1)),
        };
        assert_eq!(
            validate_product_draft(&draft),
            Err(ValidationError::MustNotBeNegative {
                field: "stock".to_string()
            })
        );
    }

    #[test]
    fn test_validate_sale_draft() {
        let ok = SaleDraft {
            lines: vec![line(Quantity::units(2), Money::new(dec!(10)))],
            ..SaleDraft::default()
        };
        assert!(validate_sale_draft(&ok).is_ok());

        let empty = SaleDraft::default();
        assert!(matches!(
            validate_sale_draft(&empty),
            Err(ValidationError::Required { .. })
        ));

        let zero_qty = SaleDraft {
            lines: vec![line(Quantity::zero(), Money::new(dec!(10)))],
            ..SaleDraft::default()
        };
        assert!(validate_sale_draft(&zero_qty).is_err());

        let negative_total = SaleDraft {
            total: Some(Money::new(dec!(-1))),
            ..ok.clone()
        };
        assert!(validate_sale_draft(&negative_total).is_err());
    }

    #[test]
    fn test_validate_sale_draft_rejects_oversized_amounts() {
        let huge_line = SaleDraft {
            lines: vec![line(
                Quantity::new(dec!(1000000000000000)),
                Money::new(dec!(100000000000000000)),
            )],
            ..SaleDraft::default()
        };
        assert!(matches!(
            validate_sale_draft(&huge_line),
            Err(ValidationError::TooLarge { .. })
        ));

        // Each line within bounds, the sum beyond MAX_AMOUNT
        let big = line(Quantity::units(1_000_000), Money::new(dec!(999999999)));
        let summed = SaleDraft {
            lines: vec![big.clone(), big.clone(), big],
            ..SaleDraft::default()
        };
        assert_eq!(
            validate_sale_draft(&summed),
            Err(ValidationError::TooLarge {
                field: "total".to_string(),
                max: "1000000000000000".to_string(),
            })
        );

        let at_limit = SaleDraft {
            lines: vec![line(Quantity::units(1), Money::new(MAX_AMOUNT))],
            ..SaleDraft::default()
        };
        assert_eq!(sale_total(&at_limit), Ok(Money::new(MAX_AMOUNT)));
    }

    #[test]
    fn test_bounds_constants() {
        assert_eq!(MAX_AMOUNT, dec!(1000000000000000));
        assert_eq!(MAX_QUANTITY, dec!(1000000000));

        assert!(validate_quantity(Quantity::new(MAX_QUANTITY)).is_ok());
        assert!(validate_quantity(Quantity::new(dec!(1000000000.001))).is_err());
        assert!(validate_amount(Money::new(dec!(1000000000000000.01))).is_err());
    }

    #[test]
    fn test_validate_new_movement() {
        let movement = NewMovement {
            direction: MovementDirection::Expense,
            payment_method: PaymentMethod::Transfer,
            amount: Money::new(dec!(150)),
            reference: Some("Rent".to_string()),
            description: None,
            moved_at: None,
            check: Default::default(),
        };
        assert!(validate_new_movement(&movement).is_ok());

        let zero = NewMovement {
            amount: Money::zero(),
            ..movement
        };
        assert!(validate_new_movement(&zero).is_err());
    }
}
