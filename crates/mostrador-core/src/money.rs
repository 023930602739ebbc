//! # Money Module
//!
//! Provides the `Money` and `Quantity` types for monetary values and stock
//! levels.
//!
//! ## Why Decimals?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Stock is sold by the unit AND by weight/length:                        │
//! │    0.125 kg × 800 sales drifts if every step rounds                     │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 decimals (rust_decimal)                          │
//! │    Exact for every value a cashier can type                             │
//! │    Stored as TEXT in SQLite, never REAL                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mostrador_core::money::{Money, Quantity};
//! use rust_decimal::Decimal;
//!
//! let price = Money::from_cents(1000);            // $10.00
//! let qty = Quantity::new(Decimal::from(2));      // 2 units
//!
//! let subtotal = price.checked_times(qty).unwrap();
//! assert_eq!(subtotal.amount().to_string(), "20.00");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Decimal places kept on computed amounts (line subtotals).
pub const MONEY_SCALE: u32 = 2;

/// A monetary amount.
///
/// ## Design Decisions
/// - **Decimal (signed)**: negative values show up in balances (income - expense)
/// - **Single field tuple struct**: zero-cost wrapper over `Decimal`
/// - **Serialized as string**: `"20.00"` survives JSON and JavaScript intact
///
/// ## Where Money is Used
/// ```text
/// Product.sale_price ──► SaleLine.unit_price ──► SaleLine.subtotal
///                                                      │
///                                                      ▼
///                           Sale.total ──► TreasuryMovement.amount
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Wraps a decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from cents (two decimal places).
    ///
    /// ## Example
    /// ```rust
    /// use mostrador_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.to_string(), "$10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Returns the underlying decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies a unit price by a quantity, rounded half away from zero
    /// to [`MONEY_SCALE`] places.
    ///
    /// `None` when the product does not fit in a decimal.
    ///
    /// ## Example
    /// ```rust
    /// use mostrador_core::money::{Money, Quantity};
    /// use rust_decimal::Decimal;
    ///
    /// let per_kg = Money::from_cents(800);                 // $8.00 / kg
    /// let weight = Quantity::new(Decimal::new(125, 3));    // 0.125 kg
    /// let subtotal = per_kg.checked_times(weight).unwrap();
    /// assert_eq!(subtotal.amount().to_string(), "1.00");
    /// ```
    ///
    /// ## User Workflow
    /// ```text
    /// Line: 2 × $10.00
    ///      │
    ///      ▼
    /// checked_times(2) ← THIS FUNCTION
    ///      │
    ///      ├── overflow? → None (validation reports "too large")
    ///      │
    ///      ▼
    /// Subtotal: $20.00
    /// ```
    pub fn checked_times(&self, qty: Quantity) -> Option<Money> {
        self.0.checked_mul(qty.value()).map(|product| {
            let mut cents =
                product.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
            cents.rescale(MONEY_SCALE);
            Money(cents)
        })
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }
}

// =============================================================================
// Money Trait Implementations
// =============================================================================

/// Always two decimal places, sign before the currency symbol.
///
/// ## Note
/// Debug/log formatting only. Frontends localize on their own.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        write!(f, "{}${:.2}", sign, self.0.abs())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money)
    }
}

/// Decoding hook for TEXT columns (`sqlx(try_from = "String")`).
impl TryFrom<String> for Money {
    type Error = rust_decimal::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Quantity Type
// =============================================================================

/// A stock quantity (units, kilograms, meters...).
///
/// Stock on hand must never go negative; the Inventory Ledger enforces that,
/// this type only carries the number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Quantity(#[ts(type = "string")] Decimal);

impl Quantity {
    #[inline]
    pub const fn new(value: Decimal) -> Self {
        Quantity(value)
    }

    /// Whole units.
    #[inline]
    pub fn units(n: i64) -> Self {
        Quantity(Decimal::from(n))
    }

    #[inline]
    pub const fn zero() -> Self {
        Quantity(Decimal::ZERO)
    }

    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Adds two quantities, `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Quantity) -> Option<Quantity> {
        self.0.checked_add(other.0).map(Quantity)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::zero()
    }
}

impl From<Decimal> for Quantity {
    fn from(value: Decimal) -> Self {
        Quantity(value)
    }
}

impl FromStr for Quantity {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Quantity)
    }
}

impl TryFrom<String> for Quantity {
    type Error = rust_decimal::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Add for Quantity {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Quantity(self.0 + other.0)
    }
}

impl Sub for Quantity {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Quantity(self.0 - other.0)
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Quantity>>(iter: I) -> Self {
        iter.fold(Quantity::zero(), |acc, q| acc + q)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.amount(), dec!(10.99));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::new(dec!(20)).to_string(), "$20.00");
        assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
        assert_eq!(Money::new(dec!(-5.5)).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::new(dec!(10.00));
        let b = Money::new(dec!(5.00));

        assert_eq!(a + b, Money::new(dec!(15)));
        assert_eq!(a - b, Money::new(dec!(5)));
        assert_eq!(-(b - a), Money::new(dec!(5)));

        let mut c = a;
        c += b;
        c -= Money::new(dec!(1));
        assert_eq!(c.amount(), dec!(14));
    }

    #[test]
    fn test_checked_times_quantity() {
        let price = Money::new(dec!(10.00));
        assert_eq!(price.checked_times(Quantity::units(2)), Some(Money::new(dec!(20))));

        let per_kg = Money::new(dec!(8.00));
        let weight = Quantity::new(dec!(0.125));
        assert_eq!(per_kg.checked_times(weight), Some(Money::new(dec!(1))));
    }

    #[test]
    fn test_checked_times_keeps_cents_scale() {
        let whole = Money::new(dec!(10)).checked_times(Quantity::units(2)).unwrap();
        assert_eq!(whole.amount().to_string(), "20.00");

        // 0.333 kg × $1.00 = 0.333 → 0.33, 0.335 → 0.34
        let per_kg = Money::new(dec!(1.00));
        let down = per_kg.checked_times(Quantity::new(dec!(0.333))).unwrap();
        let up = per_kg.checked_times(Quantity::new(dec!(0.335))).unwrap();
        assert_eq!(down.amount().to_string(), "0.33");
        assert_eq!(up.amount().to_string(), "0.34");
    }

    #[test]
    fn test_checked_arithmetic_overflow_is_none() {
        let huge_price = Money::new(dec!(100000000000000000));
        let huge_qty = Quantity::new(dec!(1000000000000000));
        assert_eq!(huge_price.checked_times(huge_qty), None);

        assert_eq!(Money::new(Decimal::MAX).checked_add(Money::from_cents(1)), None);
        assert_eq!(Quantity::new(Decimal::MAX).checked_add(Quantity::units(1)), None);
        assert_eq!(
            Quantity::units(2).checked_add(Quantity::new(dec!(0.5))),
            Some(Quantity::new(dec!(2.5)))
        );
    }

    /// The drift floats accumulate over many small sales must not happen here.
    #[test]
    fn test_no_drift_over_many_small_additions() {
        let tenth = Money::new(dec!(0.1));
        let total: Money = std::iter::repeat(tenth).take(1000).sum();
        assert_eq!(total.amount(), dec!(100));

        let grams = Quantity::new(dec!(0.001));
        let stock: Quantity = std::iter::repeat(grams).take(3000).sum();
        assert_eq!(stock.value(), dec!(3));
    }

    #[test]
    fn test_zero_and_sign_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::new(dec!(1)).is_positive());
        assert!(Money::new(dec!(-1)).is_negative());
        assert_eq!(Money::new(dec!(-3)).abs(), Money::new(dec!(3)));

        assert!(Quantity::zero().is_zero());
        assert!(!Quantity::zero().is_positive());
        assert!(Quantity::new(dec!(-0.5)).is_negative());
    }

    #[test]
    fn test_parse_from_text_column() {
        let money = Money::try_from("20.00".to_string()).unwrap();
        assert_eq!(money.amount(), dec!(20));

        let qty: Quantity = " 2.5 ".parse().unwrap();
        assert_eq!(qty.value(), dec!(2.5));

        assert!(Money::try_from("twenty".to_string()).is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Money::new(dec!(20.00))).unwrap();
        assert_eq!(json, "\"20.00\"");

        let back: Quantity = serde_json::from_str("\"3\"").unwrap();
        assert_eq!(back, Quantity::units(3));
    }

    #[test]
    fn test_quantity_display_is_normalized() {
        assert_eq!(Quantity::new(dec!(3.000)).to_string(), "3");
        assert_eq!(Quantity::new(dec!(0.250)).to_string(), "0.25");
    }
}
