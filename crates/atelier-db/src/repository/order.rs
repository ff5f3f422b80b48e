//! # Order Repository
//!
//! Persistence for order headers and their line items.
//!
//! ## Write Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  insert(conn, order, items)   header + all lines, one transaction      │
//! │                                                                         │
//! │  update_status(conn, id, expected, next, ..)                           │
//! │     UPDATE orders SET status = :next ...                               │
//! │     WHERE id = :id AND status = :expected                              │
//! │                                                                         │
//! │     A concurrent change between read and write leaves 0 rows           │
//! │     affected, which the caller reports as a conflict instead of        │
//! │     silently overwriting.                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both writes take a `&mut SqliteConnection`; the order service always runs
//! them in the transaction that also touches stock. Reads are available on
//! the pool through [`OrderRepository`].

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use atelier_core::{Order, OrderLineItem, OrderStatus};

const SELECT_ORDER: &str = r#"
    SELECT id, client_id, status, subtotal_cents, discount_cents, final_cents,
           notes, created_at, updated_at, completed_at
    FROM orders
"#;

/// Repository for orders.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    // =========================================================================
    // Executor-generic reads
    // =========================================================================

    /// Reads an order header on any executor.
    pub async fn fetch<'e, E>(executor: E, id: &str) -> DbResult<Option<Order>>
    where
        E: SqliteExecutor<'e>,
    {
        let order = sqlx::query_as::<_, Order>(&format!("{SELECT_ORDER} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(order)
    }

    /// Reads an order's lines in request order.
    pub async fn fetch_items<'e, E>(executor: E, order_id: &str) -> DbResult<Vec<OrderLineItem>>
    where
        E: SqliteExecutor<'e>,
    {
        let items = sqlx::query_as::<_, OrderLineItem>(
            r#"
            SELECT id, order_id, product_id, position, sku_snapshot, name_snapshot,
                   unit_price_cents, quantity, total_price_cents, created_at
            FROM order_items
            WHERE order_id = ?1
            ORDER BY position
            "#,
        )
        .bind(order_id)
        .fetch_all(executor)
        .await?;

        Ok(items)
    }

    // =========================================================================
    // Transactional writes
    // =========================================================================

    /// Inserts the header and all line items.
    pub async fn insert(
        conn: &mut SqliteConnection,
        order: &Order,
        items: &[OrderLineItem],
    ) -> DbResult<()> {
        debug!(
            order_id = %order.id,
            client_id = %order.client_id,
            lines = items.len(),
            final_cents = order.final_cents,
            "Inserting order"
        );

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, client_id, status, subtotal_cents, discount_cents, final_cents,
                notes, created_at, updated_at, completed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&order.id)
        .bind(&order.client_id)
        .bind(order.status)
        .bind(order.subtotal_cents)
        .bind(order.discount_cents)
        .bind(order.final_cents)
        .bind(&order.notes)
        .bind(order.created_at)
        .bind(order.updated_at)
        .bind(order.completed_at)
        .execute(&mut *conn)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, product_id, position, sku_snapshot, name_snapshot,
                    unit_price_cents, quantity, total_price_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )
            .bind(&item.id)
            .bind(&item.order_id)
            .bind(&item.product_id)
            .bind(item.position)
            .bind(&item.sku_snapshot)
            .bind(&item.name_snapshot)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .bind(item.total_price_cents)
            .bind(item.created_at)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Moves an order from `expected` to `next`.
    ///
    /// `completed_at` is written only when `Some`; an existing completion
    /// time is otherwise kept.
    ///
    /// ## Returns
    /// * `Ok(true)` - status changed
    /// * `Ok(false)` - the order is missing or no longer in `expected`
    pub async fn update_status(
        conn: &mut SqliteConnection,
        id: &str,
        expected: OrderStatus,
        next: OrderStatus,
        updated_at: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = ?3,
                updated_at = ?4,
                completed_at = COALESCE(?5, completed_at)
            WHERE id = ?1 AND status = ?2
            "#,
        )
        .bind(id)
        .bind(expected)
        .bind(next)
        .bind(updated_at)
        .bind(completed_at)
        .execute(&mut *conn)
        .await?;

        let changed = result.rows_affected() == 1;
        debug!(order_id = %id, from = %expected, to = %next, changed, "Order status write");

        Ok(changed)
    }

    // =========================================================================
    // Pool reads
    // =========================================================================

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        Self::fetch(&self.pool, id).await
    }

    pub async fn get_items(&self, order_id: &str) -> DbResult<Vec<OrderLineItem>> {
        Self::fetch_items(&self.pool, order_id).await
    }

    /// A client's orders, newest first.
    ///
    /// With `exclude_cancelled` the CANCELLED ones are left out.
    pub async fn list_for_client(
        &self,
        client_id: &str,
        exclude_cancelled: bool,
        limit: u32,
        offset: u32,
    ) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            r#"{SELECT_ORDER}
            WHERE client_id = ?1 AND (?2 = 0 OR status <> 'CANCELLED')
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?3 OFFSET ?4
            "#
        ))
        .bind(client_id)
        .bind(exclude_cancelled)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    pub async fn count_for_client(&self, client_id: &str, exclude_cancelled: bool) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM orders
            WHERE client_id = ?1 AND (?2 = 0 OR status <> 'CANCELLED')
            "#,
        )
        .bind(client_id)
        .bind(exclude_cancelled)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// All orders, newest first.
    pub async fn list_all(&self, limit: u32, offset: u32) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "{SELECT_ORDER} ORDER BY created_at DESC, rowid DESC LIMIT ?1 OFFSET ?2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    pub async fn count_all(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new order ID.
pub fn generate_order_id() -> String {
    Uuid::new_v4().to_string()
}

/// Helper to generate a new line item ID.
pub fn generate_item_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use crate::repository::client::generate_client_id;
    use crate::repository::product::generate_product_id;
    use atelier_core::{Client, Product};

    async fn setup() -> (Database, Client, Product) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();

        let client = Client {
            id: generate_client_id(),
            first_name: "Ivan".to_string(),
            last_name: "Sidorov".to_string(),
            patronymic: None,
            phone: Some("+7 900 000-00-00".to_string()),
            is_permanent: false,
            created_at: now,
        };
        db.clients().insert(&client).await.unwrap();

        let product = Product {
            id: generate_product_id(),
            sku: "EAR-SV-010".to_string(),
            name: "Silver earrings".to_string(),
            description: None,
            price_cents: 450_000,
            in_stock: 10,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();

        (db, client, product)
    }

    fn order_for(client: &Client, product: &Product, quantity: i64) -> (Order, Vec<OrderLineItem>) {
        let now = Utc::now();
        let total = product.price_cents * quantity;
        let order = Order {
            id: generate_order_id(),
            client_id: client.id.clone(),
            status: OrderStatus::Pending,
            subtotal_cents: total,
            discount_cents: 0,
            final_cents: total,
            notes: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        };
        let items = vec![OrderLineItem {
            id: generate_item_id(),
            order_id: order.id.clone(),
            product_id: product.id.clone(),
            position: 0,
            sku_snapshot: product.sku.clone(),
            name_snapshot: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity,
            total_price_cents: total,
            created_at: now,
        }];
        (order, items)
    }

    async fn insert(db: &Database, order: &Order, items: &[OrderLineItem]) {
        let mut tx = db.begin().await.unwrap();
        OrderRepository::insert(&mut tx, order, items).await.unwrap();
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_and_read_back() {
        let (db, client, product) = setup().await;
        let (order, items) = order_for(&client, &product, 2);
        insert(&db, &order, &items).await;

        let loaded = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(loaded, order);
        assert_eq!(db.orders().get_items(&order.id).await.unwrap(), items);
    }

    #[tokio::test]
    async fn test_unknown_client_rejected_by_foreign_key() {
        let (db, mut client, product) = setup().await;
        client.id = "ghost".to_string();
        let (order, items) = order_for(&client, &product, 1);

        let mut tx = db.begin().await.unwrap();
        let err = OrderRepository::insert(&mut tx, &order, &items)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_status_write_is_conditional() {
        let (db, client, product) = setup().await;
        let (order, items) = order_for(&client, &product, 1);
        insert(&db, &order, &items).await;

        let now = Utc::now();
        let mut tx = db.begin().await.unwrap();
        let changed = OrderRepository::update_status(
            &mut tx,
            &order.id,
            OrderStatus::Pending,
            OrderStatus::Completed,
            now,
            Some(now),
        )
        .await
        .unwrap();
        assert!(changed);

        // Stale expectation: the row is no longer PENDING
        let changed = OrderRepository::update_status(
            &mut tx,
            &order.id,
            OrderStatus::Pending,
            OrderStatus::Cancelled,
            now,
            None,
        )
        .await
        .unwrap();
        assert!(!changed);
        tx.commit().await.unwrap();

        let loaded = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, OrderStatus::Completed);
        assert_eq!(loaded.completed_at, Some(now));
    }

    #[tokio::test]
    async fn test_client_listing_and_counts() {
        let (db, client, product) = setup().await;

        let mut ids = Vec::new();
        for _ in 0..3 {
            let (order, items) = order_for(&client, &product, 1);
            insert(&db, &order, &items).await;
            ids.push(order.id);
        }

        let mut tx = db.begin().await.unwrap();
        OrderRepository::update_status(
            &mut tx,
            &ids[0],
            OrderStatus::Pending,
            OrderStatus::Cancelled,
            Utc::now(),
            None,
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();

        let repo = db.orders();
        assert_eq!(repo.count_for_client(&client.id, false).await.unwrap(), 3);
        assert_eq!(repo.count_for_client(&client.id, true).await.unwrap(), 2);
        assert_eq!(repo.count_all().await.unwrap(), 3);

        let newest_first: Vec<String> = repo
            .list_for_client(&client.id, false, 10, 0)
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(newest_first, vec![ids[2].clone(), ids[1].clone(), ids[0].clone()]);

        let active = repo.list_for_client(&client.id, true, 10, 0).await.unwrap();
        assert!(active.iter().all(|o| o.status != OrderStatus::Cancelled));

        let page = repo.list_all(1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, ids[1]);
    }
}
