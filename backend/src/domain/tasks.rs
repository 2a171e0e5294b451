//! Task aggregate: actionable work items within an order.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::status::TaskStatus;

/// A unit of work assigned to a staff member.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Primary identifier.
    pub id: Uuid,
    /// Owning order.
    pub order_id: Uuid,
    /// Display title used in notification text.
    pub title: String,
    /// Current lifecycle state.
    pub status: TaskStatus,
    /// Assigned staff member, notified by the deadline sweep.
    pub assignee_id: Option<Uuid>,
    /// Due date used by the deadline sweep.
    pub due_date: Option<DateTime<Utc>>,
}
