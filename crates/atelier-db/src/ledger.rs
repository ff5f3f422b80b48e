//! # Stock Ledger
//!
//! The only code that changes `products.in_stock` after a product exists.
//!
//! ## Reserve Is One Statement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Check-and-Decrement                                  │
//! │                                                                         │
//! │  ❌ WRONG: read, compare in Rust, write                                │
//! │     SELECT in_stock ...          (two callers both see 5)              │
//! │     UPDATE ... SET in_stock = 2  (both write; 6 units sold from 5)     │
//! │                                                                         │
//! │  ✅ CORRECT: the guard is part of the write                            │
//! │     UPDATE products SET in_stock = in_stock - :qty                     │
//! │     WHERE id = :id AND in_stock >= :qty                                │
//! │                                                                         │
//! │     rows_affected == 1  → reserved                                     │
//! │     rows_affected == 0  → not enough stock (or no such product)        │
//! │                                                                         │
//! │  SQLite serializes writers, so the second caller sees the first        │
//! │  caller's decrement and its guard fails instead of overselling.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function takes a `&mut SqliteConnection` so it runs inside the
//! caller's transaction. Pass `&mut *tx`.

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Atomically takes `quantity` units of `product_id` out of stock.
///
/// Returns `Ok(false)` when stock is short or the product does not exist;
/// nothing is written in that case.
pub async fn reserve(
    conn: &mut SqliteConnection,
    product_id: &str,
    quantity: i64,
) -> DbResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET in_stock = in_stock - ?2,
            updated_at = ?3
        WHERE id = ?1 AND in_stock >= ?2
        "#,
    )
    .bind(product_id)
    .bind(quantity)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    let reserved = result.rows_affected() == 1;
    debug!(product_id = %product_id, quantity, reserved, "Stock reserve");

    Ok(reserved)
}

/// Puts `quantity` units of `product_id` back into stock.
///
/// Used to compensate a partially reserved order and to release stock of
/// a cancelled one.
pub async fn restock(conn: &mut SqliteConnection, product_id: &str, quantity: i64) -> DbResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET in_stock = in_stock + ?2,
            updated_at = ?3
        WHERE id = ?1
        "#,
    )
    .bind(product_id)
    .bind(quantity)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Product", product_id));
    }

    debug!(product_id = %product_id, quantity, "Stock restored");
    Ok(())
}

/// Current stock of a product, or `None` if it does not exist.
///
/// For error reporting only. Never use this value to decide whether to
/// reserve.
pub async fn available(conn: &mut SqliteConnection, product_id: &str) -> DbResult<Option<i64>> {
    let in_stock: Option<i64> = sqlx::query_scalar("SELECT in_stock FROM products WHERE id = ?1")
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(in_stock)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::generate_product_id;
    use atelier_core::Product;

    async fn setup(in_stock: i64) -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            sku: "PND-SV-003".to_string(),
            name: "Silver pendant".to_string(),
            description: None,
            price_cents: 890_000,
            in_stock,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();
        (db, product.id)
    }

    async fn stock_of(db: &Database, id: &str) -> i64 {
        db.products().get_by_id(id).await.unwrap().unwrap().in_stock
    }

    #[tokio::test]
    async fn test_reserve_decrements() {
        let (db, id) = setup(5).await;

        let mut conn = db.pool().acquire().await.unwrap();
        assert!(reserve(&mut conn, &id, 3).await.unwrap());
        drop(conn);

        assert_eq!(stock_of(&db, &id).await, 2);
    }

    #[tokio::test]
    async fn test_reserve_exact_stock_reaches_zero() {
        let (db, id) = setup(4).await;

        let mut conn = db.pool().acquire().await.unwrap();
        assert!(reserve(&mut conn, &id, 4).await.unwrap());
        assert!(!reserve(&mut conn, &id, 1).await.unwrap());
        drop(conn);

        assert_eq!(stock_of(&db, &id).await, 0);
    }

    #[tokio::test]
    async fn test_reserve_shortfall_writes_nothing() {
        let (db, id) = setup(2).await;

        let mut conn = db.pool().acquire().await.unwrap();
        assert!(!reserve(&mut conn, &id, 3).await.unwrap());
        assert_eq!(available(&mut conn, &id).await.unwrap(), Some(2));
        drop(conn);

        assert_eq!(stock_of(&db, &id).await, 2);
    }

    #[tokio::test]
    async fn test_reserve_unknown_product() {
        let (db, _) = setup(2).await;

        let mut conn = db.pool().acquire().await.unwrap();
        assert!(!reserve(&mut conn, "nope", 1).await.unwrap());
        assert_eq!(available(&mut conn, "nope").await.unwrap(), None);
        assert!(matches!(
            restock(&mut conn, "nope", 1).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_restock_increments() {
        let (db, id) = setup(0).await;

        let mut conn = db.pool().acquire().await.unwrap();
        restock(&mut conn, &id, 7).await.unwrap();
        drop(conn);

        assert_eq!(stock_of(&db, &id).await, 7);
    }

    #[tokio::test]
    async fn test_rolled_back_reserve_leaves_stock() {
        let (db, id) = setup(5).await;

        let mut tx = db.begin().await.unwrap();
        assert!(reserve(&mut tx, &id, 5).await.unwrap());
        tx.rollback().await.unwrap();

        assert_eq!(stock_of(&db, &id).await, 5);
    }
}
