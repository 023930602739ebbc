//! # Treasury Mirror Rules
//!
//! Pure mapping from a [`Sale`] to the treasury movement that mirrors it,
//! plus cash-flow totals.
//!
//! ## Mirror Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  register(sale) ──► mirror_of(sale) ──► INSERT movement (sale_id)      │
//! │                                                                         │
//! │  update(sale')  ──► mirror_of(sale') ──► overwrite live movement        │
//! │                     (check fields nulled when no longer a check)        │
//! │                                                                         │
//! │  void(sale)     ──► every movement with sale_id ──► voided = true       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every field the mirror owns is produced by [`mirror_of`]. Create and
//! sync both write exactly this set, so adding a field here is the only
//! change needed to keep the two paths in step.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{
    CheckDetails, CheckKind, MovementDirection, PaymentMethod, Sale, TreasuryMovement,
};

/// Description used when the sale has none.
pub const DEFAULT_SALE_DESCRIPTION: &str = "Income from product sale";

// =============================================================================
// Mirror Mapping
// =============================================================================

/// The fields of a treasury movement that are derived from a sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorFields {
    pub direction: MovementDirection,
    pub payment_method: PaymentMethod,
    pub amount: Money,
    pub reference: String,
    pub description: String,
    pub check: CheckDetails,
    pub check_kind: Option<CheckKind>,
}

/// Reference text stamped on a mirrored movement.
pub fn sale_reference(number: i64) -> String {
    format!("Sale #{}", number)
}

/// Maps a sale to its mirrored movement fields.
///
/// ## Rules
/// - Direction is always INGRESO, amount is the sale total
/// - Check variants copy every check field, with expiry derived
/// - Any other method clears every check field and the check kind
pub fn mirror_of(sale: &Sale) -> MirrorFields {
    let method = sale.payment_method;
    let (check, check_kind) = if method.is_check() {
        (
            sale.check.clone().with_derived_expiry(method),
            method.check_kind(),
        )
    } else {
        (CheckDetails::default(), None)
    };

    MirrorFields {
        direction: MovementDirection::Income,
        payment_method: method,
        amount: sale.total,
        reference: sale_reference(sale.number),
        description: sale
            .description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SALE_DESCRIPTION.to_string()),
        check,
        check_kind,
    }
}

// =============================================================================
// Summary
// =============================================================================

/// Cash-flow totals over non-voided movements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TreasurySummary {
    pub income: Money,
    pub expense: Money,
    /// income - expense
    pub balance: Money,
}

impl TreasurySummary {
    /// Totals `movements`, skipping voided ones.
    pub fn from_movements<'a, I>(movements: I) -> Self
    where
        I: IntoIterator<Item = &'a TreasuryMovement>,
    {
        let mut summary = TreasurySummary::default();
        for movement in movements.into_iter().filter(|m| !m.voided) {
            match movement.direction {
                MovementDirection::Income => summary.income += movement.amount,
                MovementDirection::Expense => summary.expense += movement.amount,
            }
        }
        summary.balance = summary.income - summary.expense;
        summary
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
