//! # Money Module
//!
//! Provides the `Money` type for handling monetary values exactly.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ORDER TOTAL INVARIANT                                                  │
//! │                                                                         │
//! │    subtotal == Σ line.total_price      (must hold to the kopeck)       │
//! │                                                                         │
//! │  With floats:  3 × 0.10 + 0.70 = 0.9999999999999999  ❌                 │
//! │  With cents:   3 × 10   + 70   = 100                 ✅                 │
//! │                                                                         │
//! │  The only rounding point in the system is the percentage discount.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use atelier_core::money::Money;
//!
//! let ring = Money::from_major_minor(22500, 0);
//! let line = ring.multiply_quantity(2);
//! assert_eq!(line.cents(), 4_500_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in minor currency units (cents / kopecks).
///
/// Signed so that intermediate results (`subtotal - discount`) can be checked
/// before being clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use atelier_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity, saturating at the i64 bounds.
    ///
    /// Use [`Money::checked_multiply_quantity`] where an overflow must be
    /// reported rather than clamped.
    ///
    /// ## Example
    /// ```rust
    /// use atelier_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Multiplies a unit price by a quantity. `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts. `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Returns `bps` basis points of this amount, rounded half up to the
    /// nearest minor unit.
    ///
    /// ## Implementation
    /// Integer math only: `(amount * bps + 5000) / 10000`, widened to i128 so
    /// large order totals cannot overflow.
    ///
    /// ## Example
    /// ```rust
    /// use atelier_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(100_000); // 1000.00
    /// assert_eq!(subtotal.percentage(1000).cents(), 10_000); // 10% = 100.00
    ///
    /// // 0.05 × 10% = 0.005 → rounds up to 0.01
    /// assert_eq!(Money::from_cents(5).percentage(1000).cents(), 1);
    /// ```
    pub fn percentage(&self, bps: u32) -> Money {
        let share = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_cents(share as i64)
    }

    /// Subtracts `other`, clamping the result at zero.
    ///
    /// ## Example
    /// ```rust
    /// use atelier_core::money::Money;
    ///
    /// let a = Money::from_cents(500);
    /// assert_eq!(a.saturating_sub_to_zero(Money::from_cents(800)), Money::zero());
    /// ```
    #[inline]
    pub fn saturating_sub_to_zero(&self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0).max(0))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering (`1234.50`), no currency sign. Single-currency
/// deployments format the symbol at the presentation edge.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
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
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(100_000).to_string(), "1000.00");
        assert_eq!(Money::from_cents(505).to_string(), "5.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        // 12.35 × 10% = 1.235 → 1.24
        assert_eq!(Money::from_cents(1235).percentage(1000).cents(), 124);
        // 12.34 × 10% = 1.234 → 1.23
        assert_eq!(Money::from_cents(1234).percentage(1000).cents(), 123);
        assert_eq!(Money::from_cents(1234).percentage(0).cents(), 0);
    }

    #[test]
    fn test_percentage_large_amount_does_not_overflow() {
        let huge = Money::from_cents(i64::MAX / 2);
        let share = huge.percentage(10_000);
        assert_eq!(share, huge);
    }

    #[test]
    fn test_sum_is_exact() {
        let lines = [
            Money::from_cents(10),
            Money::from_cents(10),
            Money::from_cents(10),
            Money::from_cents(70),
        ];
        let total: Money = lines.iter().sum();
        assert_eq!(total.cents(), 100);
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        let price = Money::from_cents(i64::MAX / 2 + 1);
        assert_eq!(price.checked_multiply_quantity(2), None);
        assert_eq!(price.checked_add(price), None);
        assert_eq!(
            Money::from_cents(299).checked_multiply_quantity(3),
            Some(Money::from_cents(897))
        );

        // operators clamp instead of wrapping
        assert_eq!(price.multiply_quantity(2).cents(), i64::MAX);
        assert_eq!((price + price).cents(), i64::MAX);
    }

    #[test]
    fn test_saturating_sub_to_zero() {
        let a = Money::from_cents(1000);
        assert_eq!(a.saturating_sub_to_zero(Money::from_cents(100)).cents(), 900);
        assert_eq!(a.saturating_sub_to_zero(Money::from_cents(1000)), Money::zero());
        assert_eq!(a.saturating_sub_to_zero(Money::from_cents(5000)), Money::zero());
    }
}
