//! Shared fixtures for the order service integration tests.

#![allow(dead_code)]

use chrono::Utc;
use std::sync::Arc;
use tempfile::TempDir;

use atelier_core::{Client, LoyaltyDiscount, Product, StaffMember, StaffRole};
use atelier_db::repository::client::generate_client_id;
use atelier_db::repository::product::generate_product_id;
use atelier_db::repository::staff::generate_staff_id;
use atelier_db::{Database, DbConfig};
use atelier_orders::OrderService;

pub struct Shop {
    pub db: Database,
    pub service: OrderService,
    _dir: Option<TempDir>,
}

impl Shop {
    /// Single-connection in-memory shop.
    pub async fn open() -> Self {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        Self::with_db(db, None)
    }

    /// Shop on a WAL database file with a multi-connection pool, so
    /// concurrent calls really run side by side.
    pub async fn open_file() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = DbConfig::new(dir.path().join("atelier.db")).max_connections(5);
        let db = Database::new(config).await.unwrap();
        Self::with_db(db, Some(dir))
    }

    fn with_db(db: Database, dir: Option<TempDir>) -> Self {
        let service = OrderService::new(db.clone(), Arc::new(LoyaltyDiscount::default()));
        Shop {
            db,
            service,
            _dir: dir,
        }
    }

    pub async fn product(&self, sku: &str, price_cents: i64, in_stock: i64) -> Product {
        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            sku: sku.to_string(),
            name: format!("Piece {sku}"),
            description: None,
            price_cents,
            in_stock,
            created_at: now,
            updated_at: now,
        };
        self.db.products().insert(&product).await.unwrap()
    }

    pub async fn client(&self, last_name: &str, is_permanent: bool) -> Client {
        let client = Client {
            id: generate_client_id(),
            first_name: "Test".to_string(),
            last_name: last_name.to_string(),
            patronymic: None,
            phone: None,
            is_permanent,
            created_at: Utc::now(),
        };
        self.db.clients().insert(&client).await.unwrap()
    }

    pub async fn staff(&self, role: StaffRole) -> StaffMember {
        let member = StaffMember {
            id: generate_staff_id(),
            display_name: format!("{role:?} account"),
            role,
            created_at: Utc::now(),
        };
        self.db.staff().insert(&member).await.unwrap()
    }

    pub async fn stock(&self, product_id: &str) -> i64 {
        self.db
            .products()
            .get_by_id(product_id)
            .await
            .unwrap()
            .unwrap()
            .in_stock
    }

    pub async fn order_count(&self) -> i64 {
        self.db.orders().count_all().await.unwrap()
    }
}
