//! # Order Snapshots
//!
//! The read model handed back by every service call: the order header, the
//! ordering client and the frozen line items, in one serializable value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atelier_core::{ClientSummary, Money, Order, OrderLineItem, OrderStatus};

/// A complete, immutable view of one order.
///
/// ## JSON Shape
/// ```text
/// {
///   "id": "…", "status": "PENDING",
///   "client": { "id": "…", "fullName": "Ivanova Anna", "isPermanent": true },
///   "subtotal": 100000, "discount": 10000, "finalAmount": 90000,
///   "notes": null,
///   "items": [ { "productId": "…", "name": "…", "sku": "…",
///                "quantity": 2, "unitPrice": 50000, "totalPrice": 100000 } ],
///   "createdAt": "…", "updatedAt": "…", "completedAt": null
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSnapshot {
    pub id: String,
    pub status: OrderStatus,
    pub client: ClientSummary,
    pub subtotal: Money,
    pub discount: Money,
    pub final_amount: Money,
    pub notes: Option<String>,
    pub items: Vec<LineSnapshot>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl OrderSnapshot {
    /// Builds a snapshot from stored rows. `items` must already be in
    /// position order.
    pub fn assemble(order: Order, client: ClientSummary, items: Vec<OrderLineItem>) -> Self {
        OrderSnapshot {
            subtotal: order.subtotal(),
            discount: order.discount(),
            final_amount: order.final_amount(),
            id: order.id,
            status: order.status,
            client,
            notes: order.notes,
            items: items.iter().map(LineSnapshot::from).collect(),
            created_at: order.created_at,
            updated_at: order.updated_at,
            completed_at: order.completed_at,
        }
    }

    /// Total units across all lines.
    pub fn unit_count(&self) -> i64 {
        self.items.iter().map(|l| l.quantity).sum()
    }
}

/// One frozen order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSnapshot {
    pub product_id: String,
    pub name: String,
    pub sku: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub total_price: Money,
}

impl From<&OrderLineItem> for LineSnapshot {
    fn from(item: &OrderLineItem) -> Self {
        LineSnapshot {
            product_id: item.product_id.clone(),
            name: item.name_snapshot.clone(),
            sku: item.sku_snapshot.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price(),
            total_price: item.total_price(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OrderSnapshot {
        let now = Utc::now();
        let order = Order {
            id: "o-1".into(),
            client_id: "c-1".into(),
            status: OrderStatus::Pending,
            subtotal_cents: 100_000,
            discount_cents: 10_000,
            final_cents: 90_000,
            notes: Some("gift wrap".into()),
            created_at: now,
            updated_at: now,
            completed_at: None,
        };
        let items = vec![OrderLineItem {
            id: "i-1".into(),
            order_id: "o-1".into(),
            product_id: "p-1".into(),
            position: 0,
            sku_snapshot: "RING-GD-001".into(),
            name_snapshot: "Gold ring".into(),
            unit_price_cents: 50_000,
            quantity: 2,
            total_price_cents: 100_000,
            created_at: now,
        }];
        let client = ClientSummary {
            id: "c-1".into(),
            full_name: "Ivanova Anna".into(),
            is_permanent: true,
        };
        OrderSnapshot::assemble(order, client, items)
    }

    #[test]
    fn test_assemble() {
        let snapshot = sample();
        assert_eq!(snapshot.final_amount, Money::from_cents(90_000));
        assert_eq!(snapshot.items[0].sku, "RING-GD-001");
        assert_eq!(snapshot.unit_count(), 2);
    }

    #[test]
    fn test_json_is_camel_case() {
        let snapshot = sample();
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["finalAmount"], 90_000);
        assert_eq!(json["client"]["isPermanent"], true);
        assert_eq!(json["items"][0]["unitPrice"], 50_000);
        assert!(json["completedAt"].is_null());

        let back: OrderSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }
}
