//! # Order Service
//!
//! Order creation, status changes and order queries.
//!
//! ## Create
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_order(client, items, notes)                                    │
//! │       │                                                                 │
//! │       ├── validate items / notes           (nothing touched yet)       │
//! │       ▼                                                                 │
//! │  BEGIN                                                                 │
//! │       ├── client exists?                                               │
//! │       ├── for each item:                                               │
//! │       │     read product once (price snapshot)                         │
//! │       │     ledger::reserve  ──✗──► journal.unwind, ROLLBACK, error    │
//! │       │     journal.record                                             │
//! │       ├── totals = subtotal, discount policy, final                    │
//! │       ├── INSERT order + lines (PENDING)                               │
//! │       ▼                                                                 │
//! │  COMMIT ──► OrderSnapshot                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Changes
//! The new status is written with `WHERE status = <status just read>`, and
//! cancellation restocks in the same transaction. Two racing cancellations
//! therefore restock once; the loser gets `InvalidTransition`.
//!
//! While a transaction is open every read goes through it. Nothing here takes
//! a second pooled connection mid-transaction.

use chrono::Utc;
use sqlx::SqliteConnection;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use atelier_core::validation::{validate_notes, validate_order_items};
use atelier_core::{
    Client, ClientSummary, DiscountPolicy, Order, OrderItemRequest, OrderLineItem, OrderStatus,
    OrderTotals, PricedLine, Transition,
};
use atelier_db::repository::order::{generate_item_id, generate_order_id};
use atelier_db::{ledger, ClientRepository, Database, DbError, OrderRepository, ProductRepository};

use crate::config::OrderConfig;
use crate::error::{OrderError, OrderResult};
use crate::journal::ReservationJournal;
use crate::page::{Page, Paged, MAX_PAGE_SIZE};
use crate::snapshot::OrderSnapshot;

/// Entry point for everything that creates, changes or reads orders.
///
/// Cheap to clone; clones share the pool and the discount policy.
///
/// ## Usage
/// ```rust,ignore
/// let service = OrderService::new(db, Arc::new(LoyaltyDiscount::default()));
///
/// let order = service
///     .create_order(&client_id, &[OrderItemRequest::new(&ring_id, 1)], None)
///     .await?;
///
/// service.change_status(&order.id, "PROCESSING", &seller_id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OrderService {
    db: Database,
    policy: Arc<dyn DiscountPolicy>,
    max_page_size: u32,
}

impl OrderService {
    pub fn new(db: Database, policy: Arc<dyn DiscountPolicy>) -> Self {
        OrderService {
            db,
            policy,
            max_page_size: MAX_PAGE_SIZE,
        }
    }

    /// Builds a service over an existing database using `config`'s policy
    /// and page limit.
    pub fn with_config(db: Database, config: &OrderConfig) -> Self {
        OrderService {
            db,
            policy: config.discount_policy(),
            max_page_size: config.max_page_size,
        }
    }

    /// Opens (and migrates) the configured database.
    pub async fn connect(config: &OrderConfig) -> OrderResult<Self> {
        let db = Database::new(config.db_config()).await?;
        Ok(Self::with_config(db, config))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn discount_policy(&self) -> &dyn DiscountPolicy {
        self.policy.as_ref()
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Places an order for `client_id`, reserving stock for every item.
    ///
    /// Either every reservation and the order are committed together, or
    /// nothing changes.
    ///
    /// ## Errors
    /// * `Validation` - empty or oversized item list, bad quantity, notes too
    ///   long, an amount too large to represent
    /// * `NotFound` - unknown client or product
    /// * `InsufficientStock` - first item whose reservation failed
    pub async fn create_order(
        &self,
        client_id: &str,
        items: &[OrderItemRequest],
        notes: Option<&str>,
    ) -> OrderResult<OrderSnapshot> {
        validate_order_items(items)?;
        let notes = validate_notes(notes)?;

        debug!(client_id = %client_id, lines = items.len(), "Creating order");

        let mut tx = self.db.begin().await?;
        let mut journal = ReservationJournal::default();

        let placed = self
            .place_order(&mut tx, client_id, items, notes, &mut journal)
            .await;

        match placed {
            Ok(snapshot) => {
                tx.commit().await?;
                info!(
                    order_id = %snapshot.id,
                    client_id = %client_id,
                    lines = snapshot.items.len(),
                    final_amount = %snapshot.final_amount,
                    "Order created"
                );
                Ok(snapshot)
            }
            Err(err) => {
                journal.unwind(&mut tx).await;
                if let Err(rollback) = tx.rollback().await {
                    warn!(error = %rollback, "Rollback after failed order failed");
                }
                debug!(client_id = %client_id, error = %err, "Order rejected");
                Err(err)
            }
        }
    }

    async fn place_order(
        &self,
        conn: &mut SqliteConnection,
        client_id: &str,
        items: &[OrderItemRequest],
        notes: Option<String>,
        journal: &mut ReservationJournal,
    ) -> OrderResult<OrderSnapshot> {
        let client = ClientRepository::fetch(&mut *conn, client_id)
            .await?
            .ok_or_else(|| OrderError::not_found("Client", client_id))?;

        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let product = ProductRepository::fetch(&mut *conn, &item.product_id)
                .await?
                .ok_or_else(|| OrderError::not_found("Product", &item.product_id))?;
            let line = PricedLine::snapshot(&product, item.quantity)?;

            if !ledger::reserve(&mut *conn, &product.id, item.quantity).await? {
                let available = ledger::available(&mut *conn, &product.id)
                    .await?
                    .unwrap_or(0);
                return Err(OrderError::InsufficientStock {
                    product_id: product.id,
                    requested: item.quantity,
                    available,
                });
            }
            journal.record(&product.id, item.quantity);
            lines.push(line);
        }

        let summary = client.summary();
        let totals = OrderTotals::calculate(&lines, self.policy.as_ref(), &summary)?;

        let now = Utc::now();
        let order = Order {
            id: generate_order_id(),
            client_id: client.id.clone(),
            status: OrderStatus::Pending,
            subtotal_cents: totals.subtotal.cents(),
            discount_cents: totals.discount.cents(),
            final_cents: totals.final_amount.cents(),
            notes,
            created_at: now,
            updated_at: now,
            completed_at: None,
        };

        let line_items: Vec<OrderLineItem> = lines
            .iter()
            .enumerate()
            .map(|(position, line)| OrderLineItem {
                id: generate_item_id(),
                order_id: order.id.clone(),
                product_id: line.product_id.clone(),
                position: position as i64,
                sku_snapshot: line.sku.clone(),
                name_snapshot: line.name.clone(),
                unit_price_cents: line.unit_price.cents(),
                quantity: line.quantity,
                total_price_cents: line.total_price().cents(),
                created_at: now,
            })
            .collect();

        OrderRepository::insert(&mut *conn, &order, &line_items).await?;

        debug!(
            order_id = %order.id,
            policy = self.policy.name(),
            subtotal = %totals.subtotal,
            discount = %totals.discount,
            "Order totals"
        );

        Ok(OrderSnapshot::assemble(order, summary, line_items))
    }

    // =========================================================================
    // Status changes
    // =========================================================================

    /// Staff-driven status change.
    ///
    /// ## Errors
    /// * `Validation` - `new_status` is not a known status
    /// * `NotFound` - unknown actor or order
    /// * `Unauthorized` - actor is not a seller or admin
    /// * `InvalidTransition` - not allowed from the current status, or the
    ///   order changed concurrently
    pub async fn change_status(
        &self,
        order_id: &str,
        new_status: &str,
        actor_id: &str,
    ) -> OrderResult<OrderSnapshot> {
        let requested: OrderStatus = new_status.parse()?;

        let actor = self
            .db
            .staff()
            .get_by_id(actor_id)
            .await?
            .ok_or_else(|| OrderError::not_found("Staff", actor_id))?;

        if !actor.role.can_manage_orders() {
            warn!(actor_id = %actor_id, role = ?actor.role, "Status change refused");
            return Err(OrderError::Unauthorized(format!(
                "{} may not change order status",
                actor.display_name
            )));
        }

        let mut tx = self.db.begin().await?;

        let order = OrderRepository::fetch(&mut *tx, order_id)
            .await?
            .ok_or_else(|| OrderError::not_found("Order", order_id))?;

        let transition = order.status.transition(requested).map_err(|e| {
            warn!(order_id = %order_id, current = %order.status, requested = %requested, "Transition rejected");
            OrderError::from(e)
        })?;

        self.apply_transition(&mut tx, order_id, transition).await?;
        let snapshot = load_snapshot(&mut tx, order_id).await?;
        tx.commit().await?;

        info!(
            order_id = %order_id,
            from = %transition.from,
            to = %transition.to,
            actor_id = %actor_id,
            "Order status changed"
        );
        Ok(snapshot)
    }

    /// Client-initiated cancellation. Only the owner may cancel, and only
    /// while the order is PENDING or PROCESSING.
    pub async fn cancel_order(&self, order_id: &str, client_id: &str) -> OrderResult<OrderSnapshot> {
        let mut tx = self.db.begin().await?;

        let order = OrderRepository::fetch(&mut *tx, order_id)
            .await?
            .ok_or_else(|| OrderError::not_found("Order", order_id))?;

        if order.client_id != client_id {
            warn!(order_id = %order_id, client_id = %client_id, "Cancellation by non-owner refused");
            return Err(OrderError::Unauthorized(
                "order belongs to another client".to_string(),
            ));
        }

        let transition = order.status.client_cancel()?;

        self.apply_transition(&mut tx, order_id, transition).await?;
        let snapshot = load_snapshot(&mut tx, order_id).await?;
        tx.commit().await?;

        info!(order_id = %order_id, client_id = %client_id, "Order cancelled by client");
        Ok(snapshot)
    }

    /// Writes `transition` and applies its side effects on `conn`.
    async fn apply_transition(
        &self,
        conn: &mut SqliteConnection,
        order_id: &str,
        transition: Transition,
    ) -> OrderResult<()> {
        let now = Utc::now();
        let completed_at = transition.completes.then_some(now);

        let changed = OrderRepository::update_status(
            &mut *conn,
            order_id,
            transition.from,
            transition.to,
            now,
            completed_at,
        )
        .await?;

        if !changed {
            // Someone else moved the order between our read and write.
            let current = OrderRepository::fetch(&mut *conn, order_id)
                .await?
                .ok_or_else(|| OrderError::not_found("Order", order_id))?
                .status;
            warn!(order_id = %order_id, expected = %transition.from, current = %current, "Concurrent status change");
            return Err(OrderError::InvalidTransition {
                current,
                requested: transition.to,
            });
        }

        if transition.restocks {
            let items = OrderRepository::fetch_items(&mut *conn, order_id).await?;
            for item in &items {
                ledger::restock(&mut *conn, &item.product_id, item.quantity).await?;
            }
            info!(order_id = %order_id, lines = items.len(), "Order stock returned");
        }

        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Reads one order. With `requesting_client_id`, the order must belong to
    /// that client.
    pub async fn get_order(
        &self,
        order_id: &str,
        requesting_client_id: Option<&str>,
    ) -> OrderResult<OrderSnapshot> {
        let mut conn = self.db.pool().acquire().await.map_err(DbError::from)?;
        let snapshot = load_snapshot(&mut conn, order_id).await?;

        if let Some(client_id) = requesting_client_id {
            if snapshot.client.id != client_id {
                return Err(OrderError::Unauthorized(
                    "order belongs to another client".to_string(),
                ));
            }
        }

        Ok(snapshot)
    }

    /// The client's orders that are not cancelled, newest first.
    pub async fn list_active_orders(
        &self,
        client_id: &str,
        page: Page,
    ) -> OrderResult<Paged<OrderSnapshot>> {
        self.list_for_client(client_id, true, page).await
    }

    /// All of the client's orders, newest first.
    pub async fn order_history(
        &self,
        client_id: &str,
        page: Page,
    ) -> OrderResult<Paged<OrderSnapshot>> {
        self.list_for_client(client_id, false, page).await
    }

    /// Every order, newest first. Staff view.
    pub async fn list_all_orders(&self, page: Page) -> OrderResult<Paged<OrderSnapshot>> {
        let page = page.limited_to(self.max_page_size);
        let repo = self.db.orders();

        let orders = repo.list_all(page.size(), page.offset()).await?;
        let total = repo.count_all().await?;

        let mut clients: HashMap<String, ClientSummary> = HashMap::new();
        let mut snapshots = Vec::with_capacity(orders.len());
        for order in orders {
            let summary = match clients.get(&order.client_id) {
                Some(summary) => summary.clone(),
                None => {
                    let summary = self.client(&order.client_id).await?.summary();
                    clients.insert(order.client_id.clone(), summary.clone());
                    summary
                }
            };
            let items = repo.get_items(&order.id).await?;
            snapshots.push(OrderSnapshot::assemble(order, summary, items));
        }

        Ok(Paged::new(snapshots, page, total))
    }

    async fn list_for_client(
        &self,
        client_id: &str,
        exclude_cancelled: bool,
        page: Page,
    ) -> OrderResult<Paged<OrderSnapshot>> {
        let page = page.limited_to(self.max_page_size);
        let summary = self.client(client_id).await?.summary();
        let repo = self.db.orders();

        let orders = repo
            .list_for_client(client_id, exclude_cancelled, page.size(), page.offset())
            .await?;
        let total = repo.count_for_client(client_id, exclude_cancelled).await?;

        let mut snapshots = Vec::with_capacity(orders.len());
        for order in orders {
            let items = repo.get_items(&order.id).await?;
            snapshots.push(OrderSnapshot::assemble(order, summary.clone(), items));
        }

        Ok(Paged::new(snapshots, page, total))
    }

    async fn client(&self, client_id: &str) -> OrderResult<Client> {
        self.db
            .clients()
            .get_by_id(client_id)
            .await?
            .ok_or_else(|| OrderError::not_found("Client", client_id))
    }
}

/// Reads an order, its client and its lines on one connection.
async fn load_snapshot(conn: &mut SqliteConnection, order_id: &str) -> OrderResult<OrderSnapshot> {
    let order = OrderRepository::fetch(&mut *conn, order_id)
        .await?
        .ok_or_else(|| OrderError::not_found("Order", order_id))?;
    let client = ClientRepository::fetch(&mut *conn, &order.client_id)
        .await?
        .ok_or_else(|| OrderError::not_found("Client", &order.client_id))?;
    let items = OrderRepository::fetch_items(&mut *conn, order_id).await?;

    Ok(OrderSnapshot::assemble(order, client.summary(), items))
}
