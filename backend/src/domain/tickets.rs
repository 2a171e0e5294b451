//! Support ticket aggregate.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::status::TicketStatus;

/// A support desk ticket raised by or for a client.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    /// Primary identifier.
    pub id: Uuid,
    /// Client the ticket belongs to.
    pub client_id: Uuid,
    /// Short summary line.
    pub subject: String,
    /// Current lifecycle state.
    pub status: TicketStatus,
    /// Stamped when the ticket is resolved; cleared on reopening.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Stamped when the ticket is closed; cleared on reopening.
    pub closed_at: Option<DateTime<Utc>>,
}

/// Timestamp assignment accompanying a ticket status transition.
///
/// Computed by the workflow service; `None` clears the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketStamps {
    /// New value for `resolved_at`.
    pub resolved_at: Option<DateTime<Utc>>,
    /// New value for `closed_at`.
    pub closed_at: Option<DateTime<Utc>>,
}
