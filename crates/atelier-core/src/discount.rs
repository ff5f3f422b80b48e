//! # Discount Policies
//!
//! Discounts are a strategy behind the [`DiscountPolicy`] trait so the order
//! service can be handed a different rule without changing how orders are
//! built.
//!
//! ```text
//! OrderService ──holds──► Arc<dyn DiscountPolicy>
//!                              │
//!                              ├── LoyaltyDiscount (default: 10% for permanent clients)
//!                              └── NoDiscount
//! ```

use std::fmt::Debug;

use crate::money::Money;
use crate::types::ClientSummary;
use crate::DEFAULT_LOYALTY_DISCOUNT_BPS;

/// Maps an order subtotal and the ordering client to a discount amount.
///
/// Implementations must be pure: same inputs, same discount. The result is
/// clamped by the totals calculator, so returning more than the subtotal is
/// harmless but pointless.
pub trait DiscountPolicy: Debug + Send + Sync {
    fn compute_discount(&self, subtotal: Money, client: &ClientSummary) -> Money;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Percentage discount for permanent (loyalty-qualified) clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoyaltyDiscount {
    rate_bps: u32,
}

impl LoyaltyDiscount {
    /// `rate_bps` in basis points (1000 = 10%).
    pub const fn new(rate_bps: u32) -> Self {
        LoyaltyDiscount { rate_bps }
    }

    pub const fn rate_bps(&self) -> u32 {
        self.rate_bps
    }
}

impl Default for LoyaltyDiscount {
    fn default() -> Self {
        LoyaltyDiscount::new(DEFAULT_LOYALTY_DISCOUNT_BPS)
    }
}

impl DiscountPolicy for LoyaltyDiscount {
    fn compute_discount(&self, subtotal: Money, client: &ClientSummary) -> Money {
        if client.is_permanent && !subtotal.is_negative() {
            subtotal.percentage(self.rate_bps)
        } else {
            Money::zero()
        }
    }

    fn name(&self) -> &'static str {
        "loyalty"
    }
}

/// Never discounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoDiscount;

impl DiscountPolicy for NoDiscount {
    fn compute_discount(&self, _subtotal: Money, _client: &ClientSummary) -> Money {
        Money::zero()
    }

    fn name(&self) -> &'static str {
        "none"
    }
}
