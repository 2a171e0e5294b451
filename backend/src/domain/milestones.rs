//! Milestone aggregate: deliverable checkpoints within an order.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::status::MilestoneStatus;

/// A deliverable checkpoint, optionally requiring explicit client approval.
///
/// ## Invariants
/// - `completed_at` is set iff `status == Completed`.
/// - `client_approved_at` is set iff `status == Approved`.
///
/// Both are maintained by
/// [`crate::domain::milestone_workflow::MilestoneWorkflowService`]; the
/// struct itself does not enforce them because rows loaded from the store
/// are taken as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Milestone {
    /// Primary identifier.
    pub id: Uuid,
    /// Owning order.
    pub order_id: Uuid,
    /// Display title used in notification text.
    pub title: String,
    /// Current lifecycle state.
    pub status: MilestoneStatus,
    /// Whether completion requires explicit client approval.
    pub requires_approval: bool,
    /// Due date used by the deadline sweep.
    pub due_date: Option<DateTime<Utc>>,
    /// Stamped when the milestone enters `Completed`.
    pub completed_at: Option<DateTime<Utc>>,
    /// Stamped when the client approves the completed milestone.
    pub client_approved_at: Option<DateTime<Utc>>,
}

/// Timestamp assignment accompanying a milestone status transition.
///
/// Computed by the workflow service per the transition table; `None` clears
/// the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MilestoneStamps {
    /// New value for `completed_at`.
    pub completed_at: Option<DateTime<Utc>>,
    /// New value for `client_approved_at`.
    pub client_approved_at: Option<DateTime<Utc>>,
}
