//! # atelier-orders: Order Service for Atelier
//!
//! Turns "this client wants these pieces" into a committed order with stock
//! reserved, and keeps stock consistent as the order moves through its
//! lifecycle.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Caller (HTTP handler, CLI, job)  ── acting client / staff id ──┐      │
//! │                                                                  ▼      │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 atelier-orders (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │  OrderService ── create / cancel / change_status / queries     │   │
//! │  │       │                                                         │   │
//! │  │       ├── ReservationJournal (compensation)                     │   │
//! │  │       └── Arc<dyn DiscountPolicy>                               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │          │                                   │                          │
//! │          ▼                                   ▼                          │
//! │  atelier-core                         atelier-db                        │
//! │  (totals, status rules,               (repositories, Stock Ledger,      │
//! │   validation)                          transactions)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use atelier_orders::{OrderConfig, OrderService, Page};
//!
//! let config = OrderConfig::load()?;
//! let service = OrderService::connect(&config).await?;
//!
//! let active = service.list_active_orders(&client_id, Page::default()).await?;
//! ```

pub mod config;
pub mod error;
mod journal;
pub mod page;
pub mod service;
pub mod snapshot;

pub use config::{ConfigError, OrderConfig};
pub use error::{OrderError, OrderResult};
pub use page::{Page, Paged};
pub use service::OrderService;
pub use snapshot::{LineSnapshot, OrderSnapshot};
