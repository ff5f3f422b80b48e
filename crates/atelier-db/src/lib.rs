//! # atelier-db: Database Layer for Atelier
//!
//! SQLite storage for the jewelry order engine, using sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Atelier Data Flow                                │
//! │                                                                         │
//! │  OrderService (atelier-orders)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    atelier-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ product/order │    │  (embedded)  │  │   │
//! │  │   │               │    │ client/staff  │    │              │  │   │
//! │  │   │ SqlitePool    │    ├───────────────┤    │ 001_init.sql │  │   │
//! │  │   │ begin()       │◄───│ Stock Ledger  │    │              │  │   │
//! │  │   │               │    │ (ledger.rs)   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (WAL)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//! - [`ledger`] - Atomic stock reserve / restock
//!
//! ## Usage
//!
//! ```rust,ignore
//! use atelier_db::{ledger, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./atelier.db")).await?;
//!
//! let mut tx = db.begin().await?;
//! if !ledger::reserve(&mut *tx, &product_id, 2).await? {
//!     // not enough stock
//! }
//! tx.commit().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::client::ClientRepository;
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
pub use repository::staff::StaffRepository;
