//! # atelier-core: Pure Business Logic for Atelier Orders
//!
//! Everything that decides *what* an order is worth and *how* it may move
//! through its lifecycle lives here, as deterministic functions with no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Atelier Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 atelier-orders (OrderService)                   │   │
//! │  │    create_order, get_order, cancel_order, change_status         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ atelier-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  totals   │  │  status   │  │   │
//! │  │   │  Product  │  │   Money   │  │PricedLine │  │OrderStatus│  │   │
//! │  │   │   Order   │  │           │  │OrderTotals│  │Transition │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐                                 │   │
//! │  │   │ discount  │  │validation │                                 │   │
//! │  │   └───────────┘  └───────────┘                                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              atelier-db (Database Layer)                        │   │
//! │  │        SQLite queries, migrations, Stock Ledger                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Client, Order, line items)
//! - [`money`] - Money type with integer arithmetic
//! - [`totals`] - Line snapshots and the order totals calculator
//! - [`discount`] - Replaceable discount strategies
//! - [`status`] - Order status state machine
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use atelier_core::discount::{DiscountPolicy, LoyaltyDiscount};
//! use atelier_core::money::Money;
//! use atelier_core::types::ClientSummary;
//!
//! let client = ClientSummary {
//!     id: "c-1".to_string(),
//!     full_name: "Ivanova Anna".to_string(),
//!     is_permanent: true,
//! };
//!
//! let subtotal = Money::from_major_minor(1000, 0);
//! let discount = LoyaltyDiscount::default().compute_discount(subtotal, &client);
//! assert_eq!(discount, Money::from_major_minor(100, 0));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod discount;
pub mod error;
pub mod money;
pub mod status;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use discount::{DiscountPolicy, LoyaltyDiscount, NoDiscount};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use status::{OrderStatus, Transition};
pub use totals::{OrderTotals, PricedLine};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of lines in a single order.
///
/// ## Business Reason
/// Keeps one order inside one reasonably sized transaction.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Loyalty discount for permanent clients, in basis points (1000 = 10%).
pub const DEFAULT_LOYALTY_DISCOUNT_BPS: u32 = 1000;

/// Maximum length of free-text order notes.
pub const MAX_NOTES_LENGTH: usize = 2000;
