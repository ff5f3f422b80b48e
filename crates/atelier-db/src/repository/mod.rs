//! # Repository Module
//!
//! Database repository implementations for the order engine.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Two Ways In                                          │
//! │                                                                         │
//! │  Pooled (standalone reads and inserts)                                 │
//! │       db.orders().list_for_client(id, true, 20, 0)                     │
//! │                                                                         │
//! │  Transactional (associated functions, caller's connection)             │
//! │       ProductRepository::fetch(&mut *tx, id)                           │
//! │       OrderRepository::insert(&mut *tx, &order, &items)                │
//! │       OrderRepository::update_status(&mut *tx, ...)                    │
//! │                                                                         │
//! │  Anything that must commit or roll back together with a stock change   │
//! │  goes through the second form.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog reads and inserts
//! - [`client::ClientRepository`] - Client lookups
//! - [`staff::StaffRepository`] - Staff accounts and roles
//! - [`order::OrderRepository`] - Order headers, line items, status writes

pub mod client;
pub mod order;
pub mod product;
pub mod staff;
