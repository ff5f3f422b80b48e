//! # Order Service Errors
//!
//! What callers of [`crate::OrderService`] see.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ValidationError ──► CoreError ──┐                                     │
//! │                                  ├──► OrderError                       │
//! │  sqlx::Error ──────► DbError ────┘                                     │
//! │                                                                         │
//! │  Expected outcomes                 Fatal                               │
//! │  ─────────────────                 ─────                               │
//! │  Validation, NotFound,             Storage (timeouts, connectivity,    │
//! │  InsufficientStock,                constraint surprises)               │
//! │  InvalidTransition, Unauthorized                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error leaves stock exactly as it was before the call.

use thiserror::Error;

use atelier_core::{CoreError, OrderStatus, ValidationError};
use atelier_db::DbError;

#[derive(Debug, Error)]
pub enum OrderError {
    /// Malformed request: empty item list, bad quantity, unknown status name.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A referenced product, client, order or staff member does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: i64,
        available: i64,
    },

    #[error("Cannot change order status from '{current}' to '{requested}'")]
    InvalidTransition {
        current: OrderStatus,
        requested: OrderStatus,
    },

    /// Wrong owner or insufficient role.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Storage error: {0}")]
    Storage(#[source] DbError),
}

impl OrderError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        OrderError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Whether the same call may succeed if repeated unchanged.
    ///
    /// Only transient storage trouble qualifies. A shortfall of stock is not
    /// retryable in this sense: the caller has to change the request or wait
    /// for a restock.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OrderError::Storage(e) if e.is_transient())
    }
}

impl From<DbError> for OrderError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => OrderError::NotFound { entity, id },
            DbError::Validation(e) => OrderError::Validation(e),
            other => OrderError::Storage(other),
        }
    }
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::from(DbError::from(err))
    }
}

impl From<CoreError> for OrderError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidTransition { current, requested } => {
                OrderError::InvalidTransition { current, requested }
            }
            CoreError::Validation(e) => OrderError::Validation(e),
        }
    }
}

/// Result type for order service operations.
pub type OrderResult<T> = Result<T, OrderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_keep_their_meaning() {
        let err: OrderError = OrderStatus::Cancelled
            .transition(OrderStatus::Pending)
            .unwrap_err()
            .into();
        assert!(matches!(
            err,
            OrderError::InvalidTransition {
                current: OrderStatus::Cancelled,
                requested: OrderStatus::Pending
            }
        ));
    }

    #[test]
    fn test_db_not_found_is_not_storage() {
        let err: OrderError = DbError::not_found("Product", "p-9").into();
        assert!(matches!(err, OrderError::NotFound { ref entity, .. } if entity == "Product"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_retryable_only_for_transient_storage() {
        assert!(OrderError::from(DbError::PoolExhausted).is_retryable());
        assert!(OrderError::from(DbError::Busy("database is locked".into())).is_retryable());
        assert!(!OrderError::from(DbError::QueryFailed("syntax".into())).is_retryable());
        assert!(!OrderError::Unauthorized("not yours".into()).is_retryable());
        assert!(!OrderError::InsufficientStock {
            product_id: "p".into(),
            requested: 3,
            available: 2
        }
        .is_retryable());
    }

    #[test]
    fn test_messages_carry_context() {
        let err = OrderError::InsufficientStock {
            product_id: "p-1".into(),
            requested: 3,
            available: 2,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product p-1: requested 3, available 2"
        );
    }
}
