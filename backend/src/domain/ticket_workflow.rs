//! Support ticket status workflow.
//!
//! Tickets stamp `resolved_at` on `Resolved` and `closed_at` on `Closed`;
//! reopening to `Open` or `InProgress` clears both. Like proposals, ticket
//! transitions fan out no notifications.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::{ApiResult, Error};
use super::ports::TicketRepository;
use super::status::TicketStatus;
use super::tickets::{Ticket, TicketStamps};

/// Compute the timestamp columns for a transition into `status`.
#[must_use]
pub fn stamps_for_transition(
    ticket: &Ticket,
    status: TicketStatus,
    now: DateTime<Utc>,
) -> TicketStamps {
    match status {
        TicketStatus::Resolved => TicketStamps {
            resolved_at: Some(now),
            closed_at: ticket.closed_at,
        },
        TicketStatus::Closed => TicketStamps {
            resolved_at: ticket.resolved_at,
            closed_at: Some(now),
        },
        TicketStatus::Open | TicketStatus::InProgress => TicketStamps {
            resolved_at: None,
            closed_at: None,
        },
    }
}

/// Drives ticket status transitions.
#[derive(Clone)]
pub struct TicketWorkflowService {
    tickets: Arc<dyn TicketRepository>,
}

impl TicketWorkflowService {
    /// Create the service over the ticket repository.
    pub fn new(tickets: Arc<dyn TicketRepository>) -> Self {
        Self { tickets }
    }

    /// Assign a new ticket status, maintaining its timestamp columns.
    pub async fn set_status(&self, ticket_id: Uuid, status: TicketStatus) -> ApiResult<()> {
        let ticket = self
            .tickets
            .find(ticket_id)
            .await
            .map_err(|err| err.into_domain("ticket repository"))?
            .ok_or_else(|| Error::not_found(format!("ticket {ticket_id} not found")))?;

        let stamps = stamps_for_transition(&ticket, status, Utc::now());
        self.tickets
            .set_status(ticket_id, status, stamps)
            .await
            .map_err(|err| err.into_domain("ticket repository"))
    }
}
