//! # Reservation Journal
//!
//! Records every successful stock reservation made while building one order,
//! so a failure part-way through can put exactly those units back.
//!
//! ```text
//! items: [(A, 2), (B, 1), (C, 4)]
//!
//!   reserve A ✓  journal: [A×2]
//!   reserve B ✓  journal: [A×2, B×1]
//!   reserve C ✗  ──► unwind: restock B×1, restock A×2 ──► rollback
//! ```
//!
//! The unwind runs on the same connection, inside the transaction that is
//! about to be rolled back.

use sqlx::SqliteConnection;
use tracing::{error, warn};

use atelier_db::ledger;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Reservation {
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Default)]
pub(crate) struct ReservationJournal {
    entries: Vec<Reservation>,
}

impl ReservationJournal {
    pub fn record(&mut self, product_id: impl Into<String>, quantity: i64) {
        self.entries.push(Reservation {
            product_id: product_id.into(),
            quantity,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Restocks every recorded reservation, newest first.
    ///
    /// Keeps going past individual failures and returns how many entries
    /// were restored.
    pub async fn unwind(&self, conn: &mut SqliteConnection) -> usize {
        if self.is_empty() {
            return 0;
        }

        warn!(reservations = self.len(), "Compensating partial order");

        let mut restored = 0;
        for entry in self.entries.iter().rev() {
            match ledger::restock(&mut *conn, &entry.product_id, entry.quantity).await {
                Ok(()) => restored += 1,
                Err(e) => error!(
                    product_id = %entry.product_id,
                    quantity = entry.quantity,
                    error = %e,
                    "Compensating restock failed"
                ),
            }
        }
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::Product;
    use atelier_db::repository::product::generate_product_id;
    use atelier_db::{Database, DbConfig};
    use chrono::Utc;

    async fn product(db: &Database, sku: &str, in_stock: i64) -> String {
        let now = Utc::now();
        let p = Product {
            id: generate_product_id(),
            sku: sku.to_string(),
            name: sku.to_string(),
            description: None,
            price_cents: 100,
            in_stock,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&p).await.unwrap();
        p.id
    }

    #[tokio::test]
    async fn test_unwind_restores_recorded_reservations() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let a = product(&db, "A-1", 5).await;
        let b = product(&db, "B-1", 5).await;

        let mut journal = ReservationJournal::default();
        let mut conn = db.pool().acquire().await.unwrap();
        assert!(ledger::reserve(&mut conn, &a, 2).await.unwrap());
        journal.record(&a, 2);
        assert!(ledger::reserve(&mut conn, &b, 1).await.unwrap());
        journal.record(&b, 1);

        assert_eq!(journal.unwind(&mut conn).await, 2);
        assert_eq!(ledger::available(&mut conn, &a).await.unwrap(), Some(5));
        assert_eq!(ledger::available(&mut conn, &b).await.unwrap(), Some(5));
    }

    #[tokio::test]
    async fn test_unwind_skips_missing_products() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let a = product(&db, "A-1", 1).await;

        let mut journal = ReservationJournal::default();
        journal.record("gone", 1);
        journal.record(&a, 1);

        let mut conn = db.pool().acquire().await.unwrap();
        assert_eq!(journal.unwind(&mut conn).await, 1);
        assert_eq!(ledger::available(&mut conn, &a).await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_empty_journal_is_a_no_op() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();
        assert_eq!(ReservationJournal::default().unwind(&mut conn).await, 0);
    }
}
