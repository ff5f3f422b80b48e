//! # Domain Types
//!
//! Core domain types used throughout Atelier.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Order       │   │  OrderLineItem  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  order_id (FK)  │       │
//! │  │  sku            │◄──│  client_id (FK) │◄──│  product_id     │       │
//! │  │  price_cents    │   │  status         │   │  *_snapshot     │       │
//! │  │  in_stock       │   │  *_cents totals │   │  quantity       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │     Client      │   │   StaffMember   │                             │
//! │  │  is_permanent   │   │   role          │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Products, clients and staff are owned by other parts of the system; the
//! order engine only reads them. Product stock is the one exception and is
//! changed exclusively through the Stock Ledger in atelier-db.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::status::OrderStatus;

// =============================================================================
// Product
// =============================================================================

/// A catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit, e.g. `RING-GD-001`.
    pub sku: String,

    pub name: String,

    pub description: Option<String>,

    /// Current unit price in minor units.
    pub price_cents: i64,

    /// Units available for new orders. Never negative.
    pub in_stock: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Derived availability flag: something is left on the shelf.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.in_stock > 0
    }
}

// =============================================================================
// Client
// =============================================================================

/// A registered client, as far as ordering is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Client {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub patronymic: Option<String>,
    pub phone: Option<String>,
    /// Loyalty flag; permanent clients get the loyalty discount.
    pub is_permanent: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Client {
    /// "Last First [Patronymic]".
    pub fn full_name(&self) -> String {
        let mut name = format!("{} {}", self.last_name, self.first_name);
        if let Some(patronymic) = self.patronymic.as_deref().filter(|p| !p.is_empty()) {
            name.push(' ');
            name.push_str(patronymic);
        }
        name
    }

    pub fn summary(&self) -> ClientSummary {
        ClientSummary {
            id: self.id.clone(),
            full_name: self.full_name(),
            is_permanent: self.is_permanent,
        }
    }
}

/// The slice of a client that orders carry around: identity plus the loyalty
/// flag the discount policy needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ClientSummary {
    pub id: String,
    pub full_name: String,
    pub is_permanent: bool,
}

impl From<&Client> for ClientSummary {
    fn from(client: &Client) -> Self {
        client.summary()
    }
}

// =============================================================================
// Staff
// =============================================================================

/// Role of an authenticated account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffRole {
    Client,
    Seller,
    Admin,
}

impl StaffRole {
    /// Sellers and admins may move orders through their lifecycle.
    pub const fn can_manage_orders(&self) -> bool {
        matches!(self, StaffRole::Seller | StaffRole::Admin)
    }
}

/// An account acting on orders from the shop side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StaffMember {
    pub id: String,
    pub display_name: String,
    pub role: StaffRole,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Order
// =============================================================================

/// An order header. Totals are fixed at creation; afterwards only `status`,
/// `updated_at` and `completed_at` change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub client_id: String,
    pub status: OrderStatus,
    /// Σ line totals.
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    /// max(0, subtotal - discount).
    pub final_cents: i64,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    /// Set when the order enters COMPLETED or DELIVERED.
    #[ts(as = "Option<String>")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Order {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn discount(&self) -> Money {
        Money::from_cents(self.discount_cents)
    }

    #[inline]
    pub fn final_amount(&self) -> Money {
        Money::from_cents(self.final_cents)
    }
}

// =============================================================================
// Order Line Item
// =============================================================================

/// A persisted order line.
/// Uses snapshot pattern to freeze product data at order time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderLineItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    /// Zero-based position in the order as requested.
    pub position: i64,
    pub sku_snapshot: String,
    pub name_snapshot: String,
    /// Unit price at order time (frozen).
    pub unit_price_cents: i64,
    pub quantity: i64,
    /// unit_price × quantity.
    pub total_price_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl OrderLineItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }
}

// =============================================================================
// Requests
// =============================================================================

/// One requested line of a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderItemRequest {
    pub product_id: String,
    pub quantity: i64,
}

impl OrderItemRequest {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        OrderItemRequest {
            product_id: product_id.into(),
            quantity,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
