//! # Order Totals
//!
//! Line snapshots and the arithmetic that turns them into order totals.
//!
//! ```text
//! PricedLine × N ──► compute_subtotal ──► DiscountPolicy ──► compute_final
//!                         Σ total              discount        max(0, s - d)
//! ```
//!
//! Computed exactly once, when the order is created. Line items are immutable
//! afterwards, so nothing here is ever re-run against a stored order.

use serde::{Deserialize, Serialize};

use crate::discount::DiscountPolicy;
use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{ClientSummary, Product};
use crate::validation::{validate_quantity, ValidationResult};

// =============================================================================
// Priced Line
// =============================================================================

/// A product captured at order time together with the quantity ordered.
///
/// The unit price is copied out of the product, so later catalog price
/// changes do not alter an existing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedLine {
    pub product_id: String,
    pub sku: String,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
}

impl PricedLine {
    /// Snapshots `product` for `quantity` units.
    ///
    /// Fails with `AmountTooLarge` when the line total would not fit.
    pub fn snapshot(product: &Product, quantity: i64) -> ValidationResult<Self> {
        validate_quantity(quantity)?;
        if product.price().checked_multiply_quantity(quantity).is_none() {
            return Err(ValidationError::AmountTooLarge {
                field: "total_price".to_string(),
            });
        }

        Ok(PricedLine {
            product_id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            unit_price: product.price(),
            quantity,
        })
    }

    /// unit_price × quantity.
    #[inline]
    pub fn total_price(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Σ line totals. Fails with `AmountTooLarge` instead of overflowing.
pub fn compute_subtotal(lines: &[PricedLine]) -> ValidationResult<Money> {
    lines
        .iter()
        .try_fold(Money::zero(), |acc, line| {
            line.unit_price
                .checked_multiply_quantity(line.quantity)
                .and_then(|total| acc.checked_add(total))
        })
        .ok_or_else(|| ValidationError::AmountTooLarge {
            field: "subtotal".to_string(),
        })
}

/// max(0, subtotal - discount).
pub fn compute_final(subtotal: Money, discount: Money) -> Money {
    subtotal.saturating_sub_to_zero(discount)
}

/// The three amounts stored on an order header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub discount: Money,
    pub final_amount: Money,
}

impl OrderTotals {
    /// Runs the full pricing pipeline for a set of lines.
    ///
    /// ## Example
    /// ```rust
    /// use atelier_core::discount::NoDiscount;
    /// use atelier_core::money::Money;
    /// use atelier_core::totals::{OrderTotals, PricedLine};
    /// use atelier_core::types::ClientSummary;
    ///
    /// let lines = vec![PricedLine {
    ///     product_id: "p-1".into(),
    ///     sku: "EAR-SV-010".into(),
    ///     name: "Silver earrings".into(),
    ///     unit_price: Money::from_cents(450_000),
    ///     quantity: 2,
    /// }];
    /// let client = ClientSummary { id: "c".into(), full_name: "C".into(), is_permanent: false };
    ///
    /// let totals = OrderTotals::calculate(&lines, &NoDiscount, &client).unwrap();
    /// assert_eq!(totals.final_amount.cents(), 900_000);
    /// ```
    pub fn calculate(
        lines: &[PricedLine],
        policy: &dyn DiscountPolicy,
        client: &ClientSummary,
    ) -> ValidationResult<Self> {
        let subtotal = compute_subtotal(lines)?;
        let discount = policy.compute_discount(subtotal, client);
        Ok(OrderTotals {
            subtotal,
            discount,
            final_amount: compute_final(subtotal, discount),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discount::{LoyaltyDiscount, NoDiscount};
    use chrono::Utc;

    fn product(price_cents: i64) -> Product {
        let now = Utc::now();
        Product {
            id: "p-1".to_string(),
            sku: "BRC-GD-002".to_string(),
            name: "Gold bracelet".to_string(),
            description: None,
            price_cents,
            in_stock: 10,
            created_at: now,
            updated_at: now,
        }
    }

    fn line(unit_cents: i64, quantity: i64) -> PricedLine {
        PricedLine::snapshot(&product(unit_cents), quantity).unwrap()
    }

    fn client(is_permanent: bool) -> ClientSummary {
        ClientSummary {
            id: "c-1".to_string(),
            full_name: "Ivanova Anna".to_string(),
            is_permanent,
        }
    }

    #[test]
    fn test_snapshot_freezes_price() {
        let mut p = product(1000);
        let l = PricedLine::snapshot(&p, 3).unwrap();
        p.price_cents = 5000;
        assert_eq!(l.unit_price.cents(), 1000);
        assert_eq!(l.total_price().cents(), 3000);
    }

    #[test]
    fn test_snapshot_rejects_bad_quantity() {
        assert!(PricedLine::snapshot(&product(1000), 0).is_err());
        assert!(PricedLine::snapshot(&product(1000), -2).is_err());
    }

    #[test]
    fn test_subtotal_is_sum_of_lines() {
        let lines = vec![line(10, 3), line(70, 1), line(12_345, 7)];
        let expected: i64 = lines.iter().map(|l| l.total_price().cents()).sum();
        assert_eq!(compute_subtotal(&lines).unwrap().cents(), expected);
        assert_eq!(compute_subtotal(&lines).unwrap().cents(), 30 + 70 + 86_415);
    }

    #[test]
    fn test_oversized_amounts_are_rejected() {
        let err = PricedLine::snapshot(&product(i64::MAX / 2), 3).unwrap_err();
        assert!(matches!(err, ValidationError::AmountTooLarge { ref field } if field == "total_price"));

        let big = line(i64::MAX / 2, 1);
        let err = compute_subtotal(&[big.clone(), big.clone(), big]).unwrap_err();
        assert!(matches!(err, ValidationError::AmountTooLarge { ref field } if field == "subtotal"));
    }

    #[test]
    fn test_subtotal_of_nothing_is_zero() {
        assert_eq!(compute_subtotal(&[]).unwrap(), Money::zero());
    }

    #[test]
    fn test_final_is_clamped() {
        assert_eq!(
            compute_final(Money::from_cents(1000), Money::from_cents(100)).cents(),
            900
        );
        assert_eq!(
            compute_final(Money::from_cents(1000), Money::from_cents(2000)),
            Money::zero()
        );
    }

    #[test]
    fn test_permanent_client_scenario() {
        // 1000.00 subtotal
        let lines = vec![line(50_000, 2)];

        let totals = OrderTotals::calculate(&lines, &LoyaltyDiscount::default(), &client(true)).unwrap();
        assert_eq!(totals.subtotal, Money::from_major_minor(1000, 0));
        assert_eq!(totals.discount, Money::from_major_minor(100, 0));
        assert_eq!(totals.final_amount, Money::from_major_minor(900, 0));

        let totals = OrderTotals::calculate(&lines, &LoyaltyDiscount::default(), &client(false)).unwrap();
        assert_eq!(totals.discount, Money::zero());
        assert_eq!(totals.final_amount, Money::from_major_minor(1000, 0));
    }

    #[test]
    fn test_no_discount_policy() {
        let lines = vec![line(50_000, 2)];
        let totals = OrderTotals::calculate(&lines, &NoDiscount, &client(true)).unwrap();
        assert_eq!(totals.discount, Money::zero());
        assert_eq!(totals.final_amount, totals.subtotal);
    }
}
