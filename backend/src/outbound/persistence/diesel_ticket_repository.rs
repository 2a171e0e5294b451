//! PostgreSQL-backed `TicketRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{RepositoryError, TicketRepository};
use crate::domain::status::TicketStatus;
use crate::domain::tickets::{Ticket, TicketStamps};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{TicketRow, TicketStatusUpdate};
use super::pool::DbPool;
use super::schema::tickets;

/// Diesel-backed implementation of the ticket repository port.
#[derive(Clone)]
pub struct DieselTicketRepository {
    pool: DbPool,
}

impl DieselTicketRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_ticket(row: TicketRow) -> Result<Ticket, RepositoryError> {
    let TicketRow {
        id,
        client_id,
        subject,
        status,
        resolved_at,
        closed_at,
    } = row;

    let status: TicketStatus = status
        .parse()
        .map_err(|err: crate::domain::status::InvalidStatus| {
            RepositoryError::query(err.to_string())
        })?;

    Ok(Ticket {
        id,
        client_id,
        subject,
        status,
        resolved_at,
        closed_at,
    })
}

#[async_trait]
impl TicketRepository for DieselTicketRepository {
    async fn find(&self, id: Uuid) -> Result<Option<Ticket>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = tickets::table
            .filter(tickets::id.eq(id))
            .select(TicketRow::as_select())
            .first::<TicketRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_ticket).transpose()
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: TicketStatus,
        stamps: TicketStamps,
    ) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(tickets::table.filter(tickets::id.eq(id)))
            .set(&TicketStatusUpdate {
                status: status.as_str(),
                resolved_at: stamps.resolved_at,
                closed_at: stamps.closed_at,
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn row_conversion_parses_status() {
        let row = TicketRow {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            subject: "VPN unreachable".into(),
            status: "RESOLVED".into(),
            resolved_at: None,
            closed_at: None,
        };

        let ticket = row_to_ticket(row).expect("valid row converts");
        assert_eq!(ticket.status, TicketStatus::Resolved);
    }

    #[rstest]
    fn row_conversion_rejects_unknown_status() {
        let row = TicketRow {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            subject: "t".into(),
            status: "ESCALATED".into(),
            resolved_at: None,
            closed_at: None,
        };

        let error = row_to_ticket(row).expect_err("unknown status rejected");
        assert!(matches!(error, RepositoryError::Query { .. }));
    }
}
