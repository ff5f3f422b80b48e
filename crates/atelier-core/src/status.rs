//! # Order Status State Machine
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Order Lifecycle                                 │
//! │                                                                         │
//! │              ┌────────────┐                                             │
//! │   create ──► │  PENDING   │───────────────┐                             │
//! │              └─────┬──────┘               │                             │
//! │                    │                      ▼                             │
//! │                    ▼               ┌────────────┐                       │
//! │              ┌────────────┐        │ COMPLETED  │──┐                    │
//! │              │ PROCESSING │──────► └────────────┘  │                    │
//! │              └─────┬──────┘                        │                    │
//! │                    │               ┌────────────┐  │                    │
//! │                    │               │ DELIVERED  │──┤                    │
//! │                    │               └────────────┘  │                    │
//! │                    ▼                               ▼                    │
//! │              ┌──────────────────────────────────────────┐               │
//! │              │      CANCELLED (terminal, restocks)      │◄── PENDING    │
//! │              └──────────────────────────────────────────┘               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The rules here are pure. Applying a [`Transition`] (writing the status,
//! restocking lines) is the service layer's job.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};

/// The status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Created, stock reserved, not yet picked up by staff.
    Pending,
    /// Being manufactured or packed.
    Processing,
    /// Finished and handed over.
    Completed,
    /// Cancelled; stock has been returned. Terminal.
    Cancelled,
    /// Shipped to the client.
    Delivered,
}

impl OrderStatus {
    /// Every status, in declaration order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
        OrderStatus::Delivered,
    ];

    /// Canonical upper-case name, as stored and as shown to callers.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Delivered => "DELIVERED",
        }
    }

    /// Statuses reachable from `self` in one step.
    pub const fn allowed_targets(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[
                OrderStatus::Processing,
                OrderStatus::Completed,
                OrderStatus::Cancelled,
            ],
            OrderStatus::Processing => &[OrderStatus::Completed, OrderStatus::Cancelled],
            OrderStatus::Completed | OrderStatus::Delivered => &[OrderStatus::Cancelled],
            OrderStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.allowed_targets().contains(&next)
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Cancelled)
    }

    /// Entering this status stamps the completion time.
    pub const fn marks_completion(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Delivered)
    }

    /// Whether the owning client may cancel from this status.
    ///
    /// Narrower than the staff rule: once an order is completed or delivered,
    /// only staff can cancel it (refunds).
    pub const fn is_client_cancellable(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Processing)
    }

    /// Validates a move to `next` and describes its side effects.
    ///
    /// ## Example
    /// ```rust
    /// use atelier_core::status::OrderStatus;
    ///
    /// let t = OrderStatus::Processing.transition(OrderStatus::Cancelled).unwrap();
    /// assert!(t.restocks);
    ///
    /// assert!(OrderStatus::Cancelled.transition(OrderStatus::Pending).is_err());
    /// ```
    pub fn transition(self, next: OrderStatus) -> CoreResult<Transition> {
        if !self.can_transition_to(next) {
            return Err(CoreError::InvalidTransition {
                current: self,
                requested: next,
            });
        }

        Ok(Transition {
            from: self,
            to: next,
            restocks: next == OrderStatus::Cancelled,
            completes: next.marks_completion(),
        })
    }

    /// Client-initiated cancellation, restricted to PENDING and PROCESSING.
    pub fn client_cancel(self) -> CoreResult<Transition> {
        if !self.is_client_cancellable() {
            return Err(CoreError::InvalidTransition {
                current: self,
                requested: OrderStatus::Cancelled,
            });
        }
        self.transition(OrderStatus::Cancelled)
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a status name as supplied by a caller. Case-insensitive and
/// whitespace-tolerant; anything else is a validation error.
impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.is_empty() {
            return Err(ValidationError::Required {
                field: "status".to_string(),
            });
        }

        OrderStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: OrderStatus::ALL.iter().map(|s| s.as_str().to_string()).collect(),
            })
    }
}

/// A validated status change and the effects the caller must apply with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: OrderStatus,
    pub to: OrderStatus,
    /// Every line's quantity goes back to stock.
    pub restocks: bool,
    /// `completed_at` is set to now.
    pub completes: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================
