//! # Domain Types
//!
//! Core domain types used throughout Mostrador.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │    Product      │   │      Sale       │   │  TreasuryMovement    │  │
//! │  │  ─────────────  │   │  ─────────────  │   │  ──────────────────  │  │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)            │  │
//! │  │  sku (business) │   │  number (seq)   │   │  sale_id (weak ref)  │  │
//! │  │  stock          │   │  lines (owned)  │   │  direction           │  │
//! │  │  sale_price     │   │  total          │   │  amount, check data  │  │
//! │  └─────────────────┘   └─────────────────┘   └──────────────────────┘  │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │ PaymentMethod   │   │  CheckDetails   │   │   DocumentSeries     │  │
//! │  │  CASH, CHECK,   │   │  bank, number,  │   │  SALE, PURCHASE,     │  │
//! │  │  CHECK_ELEC...  │   │  dates          │   │  DELIVERY_NOTE       │  │
//! │  └─────────────────┘   └─────────────────┘   └──────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every document has:
//! - `id`: SQLite rowid - immutable, used for relations
//! - Business ID: (sku, sale number, delivery note number) - human-readable

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{Money, Quantity};

/// Days added to a check's due-for-deposit date when no expiry was given.
pub const CHECK_EXPIRY_DAYS: i64 = 30;

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog, with its stock on hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Stock Keeping Unit - unique business identifier.
    pub sku: String,

    pub name: String,

    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub cost_price: Money,

    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub sale_price: Money,

    /// Stock on hand. Only the Inventory Ledger moves this.
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub stock: Quantity,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// Bumped on every stock mutation.
    pub version: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Checks if `quantity` can be taken out of stock.
    pub fn has_stock_for(&self, quantity: Quantity) -> bool {
        self.stock >= quantity
    }
}

/// Catalog fields for creating or editing a product.
///
/// `stock` is only read on insert. Catalog edits never overwrite it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductDraft {
    pub sku: String,
    pub name: String,
    pub cost_price: Money,
    pub sale_price: Money,
    #[serde(default)]
    pub stock: Quantity,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale (or a manual treasury movement) was paid.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum PaymentMethod {
    Cash,
    Transfer,
    DebitCard,
    CreditCard,
    /// Paper (possibly postdated) check.
    Check,
    /// Electronic check (e-cheq).
    CheckElectronic,
    /// Digital wallet (QR / app payments).
    Wallet,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 7] = [
        PaymentMethod::Cash,
        PaymentMethod::Transfer,
        PaymentMethod::DebitCard,
        PaymentMethod::CreditCard,
        PaymentMethod::Check,
        PaymentMethod::CheckElectronic,
        PaymentMethod::Wallet,
    ];

    /// Canonical token, as stored and serialized.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Transfer => "TRANSFER",
            PaymentMethod::DebitCard => "DEBIT_CARD",
            PaymentMethod::CreditCard => "CREDIT_CARD",
            PaymentMethod::Check => "CHECK",
            PaymentMethod::CheckElectronic => "CHECK_ELECTRONIC",
            PaymentMethod::Wallet => "WALLET",
        }
    }

    /// True for both paper and electronic checks.
    pub const fn is_check(&self) -> bool {
        matches!(self, PaymentMethod::Check | PaymentMethod::CheckElectronic)
    }

    /// Check classification, `None` for non-check methods.
    pub const fn check_kind(&self) -> Option<CheckKind> {
        match self {
            PaymentMethod::CheckElectronic => Some(CheckKind::Electronic),
            PaymentMethod::Check => Some(CheckKind::Physical),
            _ => None,
        }
    }

    /// Lenient parse for legacy or partial data.
    ///
    /// Unknown, empty or missing tokens fall back to [`PaymentMethod::Cash`]
    /// and are logged. Use [`str::parse`] where bad input must be rejected.
    ///
    /// ## Example
    /// ```rust
    /// use mostrador_core::PaymentMethod;
    ///
    /// assert_eq!(PaymentMethod::from_token(Some("CHEQUE")), PaymentMethod::Check);
    /// assert_eq!(PaymentMethod::from_token(Some("BARTER")), PaymentMethod::Cash);
    /// assert_eq!(PaymentMethod::from_token(None), PaymentMethod::Cash);
    /// ```
    pub fn from_token(token: Option<&str>) -> PaymentMethod {
        match token {
            None => PaymentMethod::Cash,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(token = %raw, "Unknown payment method, defaulting to CASH");
                PaymentMethod::Cash
            }),
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse. Accepts canonical tokens and the legacy Spanish ones,
/// case-insensitively.
impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_uppercase();
        let method = match token.as_str() {
            "CASH" | "EFECTIVO" => PaymentMethod::Cash,
            "TRANSFER" | "TRANSFERENCIA" => PaymentMethod::Transfer,
            "DEBIT_CARD" | "TARJETA_DEBITO" => PaymentMethod::DebitCard,
            "CREDIT_CARD" | "TARJETA_CREDITO" => PaymentMethod::CreditCard,
            "CHECK" | "CHEQUE" => PaymentMethod::Check,
            "CHECK_ELECTRONIC" | "CHEQUE_ELECTRONICO" => PaymentMethod::CheckElectronic,
            "WALLET" | "MERCADO_PAGO" => PaymentMethod::Wallet,
            _ => {
                return Err(ValidationError::InvalidFormat {
                    field: "payment_method".to_string(),
                    reason: format!("unknown payment method '{}'", s.trim()),
                })
            }
        };
        Ok(method)
    }
}

// =============================================================================
// Checks
// =============================================================================

/// Physical vs electronic postdated check.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum CheckKind {
    Physical,
    Electronic,
}

/// Check metadata carried by sales and treasury movements.
///
/// All fields are optional; a non-check payment carries none of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckDetails {
    #[cfg_attr(feature = "sqlx", sqlx(rename = "check_bank"))]
    pub bank: Option<String>,

    #[cfg_attr(feature = "sqlx", sqlx(rename = "check_number"))]
    pub number: Option<String>,

    /// Who signed the check.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "check_drawer"))]
    pub drawer: Option<String>,

    #[cfg_attr(feature = "sqlx", sqlx(rename = "check_issue_date"))]
    #[ts(as = "Option<String>")]
    pub issue_date: Option<NaiveDate>,

    /// Due-for-deposit date.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "check_due_date"))]
    #[ts(as = "Option<String>")]
    pub due_date: Option<NaiveDate>,

    #[cfg_attr(feature = "sqlx", sqlx(rename = "check_expiry_date"))]
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,
}

impl CheckDetails {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == CheckDetails::default()
    }

    /// Returns a copy with the expiry derived for `method`.
    pub fn with_derived_expiry(mut self, method: PaymentMethod) -> Self {
        self.expiry_date = derive_expiry(method, self.due_date, self.expiry_date);
        self
    }
}

/// Expiry rule for checks.
///
/// For [`PaymentMethod::Check`], a missing expiry is derived as
/// due-for-deposit + [`CHECK_EXPIRY_DAYS`]. An explicit expiry always wins.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use mostrador_core::types::{derive_expiry, PaymentMethod};
///
/// let due = NaiveDate::from_ymd_opt(2024, 1, 1);
/// let expiry = derive_expiry(PaymentMethod::Check, due, None);
/// assert_eq!(expiry, NaiveDate::from_ymd_opt(2024, 1, 31));
/// ```
pub fn derive_expiry(
    method: PaymentMethod,
    due_date: Option<NaiveDate>,
    expiry_date: Option<NaiveDate>,
) -> Option<NaiveDate> {
    match (method, due_date, expiry_date) {
        (_, _, Some(explicit)) => Some(explicit),
        (PaymentMethod::Check, Some(due), None) => Some(window_end(due, CHECK_EXPIRY_DAYS)),
        _ => None,
    }
}

/// Exclusive end of the `days`-long window starting on `start`.
///
/// Saturates at [`NaiveDate::MAX`]; a window of zero or fewer days is empty
/// and ends on `start`.
///
/// ```rust
/// use chrono::NaiveDate;
/// use mostrador_core::types::window_end;
///
/// let start = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
/// assert_eq!(window_end(start, 7), NaiveDate::from_ymd_opt(2024, 3, 17).unwrap());
/// assert_eq!(window_end(start, i64::MAX), NaiveDate::MAX);
/// assert_eq!(window_end(start, -3), start);
/// ```
pub fn window_end(start: NaiveDate, days: i64) -> NaiveDate {
    if days <= 0 {
        return start;
    }
    start
        .checked_add_days(Days::new(days as u64))
        .unwrap_or(NaiveDate::MAX)
}

// =============================================================================
// Sale Status
// =============================================================================

/// Lifecycle label of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum SaleStatus {
    /// Numbered, stock taken, movement mirrored.
    Registered,
    /// Soft-cancelled. Stock is not restored.
    Voided,
}

impl Default for SaleStatus {
    fn default() -> Self {
        SaleStatus::Registered
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaleStatus::Registered => f.write_str("REGISTERED"),
            SaleStatus::Voided => f.write_str("VOIDED"),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A registered sale with its owned lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub id: i64,

    /// Gap-free series number. Assigned once, never changed.
    pub number: i64,

    #[ts(as = "String")]
    pub sold_at: DateTime<Utc>,

    pub customer_id: Option<i64>,

    /// Free-text customer for walk-in sales.
    pub customer_name: Option<String>,

    pub description: Option<String>,

    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub total: Money,

    pub payment_method: PaymentMethod,

    pub status: SaleStatus,

    pub voided: bool,

    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub check: CheckDetails,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,

    /// Loaded separately from `sale_lines`.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub lines: Vec<SaleLine>,
}

/// A line item in a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleLine {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub quantity: Quantity,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub unit_price: Money,
    /// quantity × unit_price
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub subtotal: Money,
}

/// Caller input for registering or updating a sale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleDraft {
    /// Defaults to now on registration.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub sold_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub customer_id: Option<i64>,

    #[serde(default)]
    pub customer_name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Defaults to CASH.
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,

    /// Defaults to the sum of line subtotals.
    #[serde(default)]
    pub total: Option<Money>,

    #[serde(default)]
    pub check: CheckDetails,

    pub lines: Vec<SaleLineDraft>,
}

impl SaleDraft {
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method.unwrap_or_default()
    }

    /// Sum of line subtotals, `None` on decimal overflow.
    pub fn lines_total(&self) -> Option<Money> {
        self.lines
            .iter()
            .try_fold(Money::zero(), |acc, line| acc.checked_add(line.subtotal()?))
    }

    /// Explicit total if given, otherwise the lines total.
    pub fn total(&self) -> Option<Money> {
        self.total.or_else(|| self.lines_total())
    }

    /// Check fields to persist: expiry derived for check payments,
    /// everything cleared for other methods.
    pub fn check_details(&self) -> CheckDetails {
        let method = self.payment_method();
        if method.is_check() {
            self.check.clone().with_derived_expiry(method)
        } else {
            CheckDetails::default()
        }
    }
}

/// Caller input for one sale line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleLineDraft {
    pub product_id: i64,
    pub quantity: Quantity,
    pub unit_price: Money,
}

impl SaleLineDraft {
    pub fn new(product_id: i64, quantity: Quantity, unit_price: Money) -> Self {
        SaleLineDraft {
            product_id,
            quantity,
            unit_price,
        }
    }

    /// Quantity × unit price in cents, `None` on decimal overflow.
    #[inline]
    pub fn subtotal(&self) -> Option<Money> {
        self.unit_price.checked_times(self.quantity)
    }
}

// =============================================================================
// Treasury
// =============================================================================

/// Cash-flow direction.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum MovementDirection {
    #[serde(rename = "INGRESO")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "INGRESO"))]
    Income,
    #[serde(rename = "EGRESO")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "EGRESO"))]
    Expense,
}

impl fmt::Display for MovementDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovementDirection::Income => f.write_str("INGRESO"),
            MovementDirection::Expense => f.write_str("EGRESO"),
        }
    }
}

/// A treasury (cash-flow) movement.
///
/// Movements mirrored from a sale carry `sale_id`; manual movements don't.
/// At most one non-voided movement exists per sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TreasuryMovement {
    pub id: i64,
    pub direction: MovementDirection,
    pub payment_method: PaymentMethod,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub amount: Money,
    pub reference: Option<String>,
    pub description: Option<String>,
    #[ts(as = "String")]
    pub moved_at: DateTime<Utc>,
    /// Weak link to the originating sale.
    pub sale_id: Option<i64>,
    pub voided: bool,
    /// Check was cashed.
    pub collected: bool,
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub check: CheckDetails,
    pub check_kind: Option<CheckKind>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl TreasuryMovement {
    /// Expiry passed as of `today`. False when expiry is unset.
    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        matches!(self.check.expiry_date, Some(expiry) if expiry < today)
    }

    /// Expiry falls within `[today, today + days)`. False when expiry is unset.
    pub fn is_due_within_on(&self, days: i64, today: NaiveDate) -> bool {
        match self.check.expiry_date {
            Some(expiry) => expiry >= today && expiry < window_end(today, days),
            None => false,
        }
    }

    pub fn is_overdue(&self) -> bool {
        self.is_overdue_on(Utc::now().date_naive())
    }

    pub fn is_due_within(&self, days: i64) -> bool {
        self.is_due_within_on(days, Utc::now().date_naive())
    }
}

/// Caller input for a manual treasury movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewMovement {
    pub direction: MovementDirection,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub amount: Money,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to now.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub moved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub check: CheckDetails,
}

// =============================================================================
// Document Series
// =============================================================================

/// Numbered document families, each with its own gap-free counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum DocumentSeries {
    Sale,
    Purchase,
    DeliveryNote,
}

impl DocumentSeries {
    /// Key of the counter row.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DocumentSeries::Sale => "SALE",
            DocumentSeries::Purchase => "PURCHASE",
            DocumentSeries::DeliveryNote => "DELIVERY_NOTE",
        }
    }

    /// Table whose `number` column seeds the counter on first use.
    ///
    /// Purchases are not stored in this workspace, so their counter
    /// starts from zero.
    pub const fn numbered_table(&self) -> Option<&'static str> {
        match self {
            DocumentSeries::Sale => Some("sales"),
            DocumentSeries::Purchase => None,
            DocumentSeries::DeliveryNote => Some("delivery_notes"),
        }
    }
}

impl fmt::Display for DocumentSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Delivery Note
// =============================================================================

/// A numbered delivery note (remito). Does not move stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DeliveryNote {
    pub id: i64,
    pub number: i64,
    #[ts(as = "String")]
    pub issued_at: DateTime<Utc>,
    pub customer_name: Option<String>,
    pub customer_address: Option<String>,
    pub customer_postal_code: Option<String>,
    /// Signature clarification / contact person.
    pub customer_note: Option<String>,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub lines: Vec<DeliveryNoteLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DeliveryNoteLine {
    pub id: i64,
    pub delivery_note_id: i64,
    pub product_id: i64,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub quantity: Quantity,
    pub notes: Option<String>,
}

/// Caller input for creating or replacing a delivery note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DeliveryNoteDraft {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_address: Option<String>,
    #[serde(default)]
    pub customer_postal_code: Option<String>,
    #[serde(default)]
    pub customer_note: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub lines: Vec<DeliveryNoteLineDraft>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DeliveryNoteLineDraft {
    pub product_id: i64,
    pub quantity: Quantity,
    #[serde(default)]
    pub notes: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
