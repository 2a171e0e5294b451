//! Order aggregate and its mutable status reference data.
//!
//! An order's status is a foreign key into the `order_statuses` reference
//! table rather than a closed enum: any status row may follow any other, and
//! the rows themselves are editable (name, colour, ordering rank, flags).
//! Transition side effects are keyed by flags on the destination row.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::status::OrderPriority;

/// A client engagement, the central unit of work.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    /// Primary identifier.
    pub id: Uuid,
    /// Human-readable document number, e.g. `ORD-2026-007`.
    pub number: String,
    /// Owning client.
    pub client_id: Uuid,
    /// Responsible manager, if assigned.
    pub manager_id: Option<Uuid>,
    /// Current status row.
    pub status_id: Uuid,
    /// Advisory priority.
    pub priority: OrderPriority,
    /// Agreed delivery deadline.
    pub deadline: Option<NaiveDate>,
    /// When work actually started.
    pub actual_start_date: Option<DateTime<Utc>>,
    /// When work actually ended.
    pub actual_end_date: Option<DateTime<Utc>>,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input for creating an order.
///
/// The number and the initial status are assigned by the workflow, never
/// by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    /// Owning client.
    pub client_id: Uuid,
    /// Responsible manager, if already assigned.
    pub manager_id: Option<Uuid>,
    /// Advisory priority.
    pub priority: OrderPriority,
    /// Agreed delivery deadline.
    pub deadline: Option<NaiveDate>,
}

/// Mutable status reference data assignable to orders.
///
/// Exactly one active row should carry `is_initial`; marking a row initial
/// clears the flag on all others in the same store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderStatus {
    /// Primary identifier.
    pub id: Uuid,
    /// Unique slug, stable across renames.
    pub code: String,
    /// Display name used in notification text.
    pub name: String,
    /// Display colour (hex string).
    pub color: String,
    /// Ordering rank for UI sorting, advisory only.
    pub position: i32,
    /// Whether new orders start in this status.
    pub is_initial: bool,
    /// Whether this status ends the order lifecycle.
    pub is_final: bool,
    /// Whether entering this status emails the order's client.
    pub notify_client: bool,
    /// Whether the status is currently assignable.
    pub is_active: bool,
}

/// Append-only record of one order status transition.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderStatusChange {
    /// Order the transition belongs to.
    pub order_id: Uuid,
    /// Destination status row.
    pub to_status_id: Uuid,
    /// Staff member who made the change, when known.
    pub changed_by: Option<Uuid>,
}
