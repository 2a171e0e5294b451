//! PostgreSQL-backed `ProposalRepository` implementation using Diesel ORM.
//!
//! Proposal stamps are set-only: absent stamps are skipped by the
//! changeset rather than written as NULL, so earlier stamps survive later
//! transitions.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ProposalRepository, RepositoryError};
use crate::domain::proposals::{Proposal, ProposalStamps};
use crate::domain::status::ProposalStatus;

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewProposalRow, ProposalRow, ProposalStatusUpdate};
use super::pool::DbPool;
use super::schema::proposals;

/// Diesel-backed implementation of the proposal repository port.
#[derive(Clone)]
pub struct DieselProposalRepository {
    pool: DbPool,
}

impl DieselProposalRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_proposal(row: ProposalRow) -> Result<Proposal, RepositoryError> {
    let ProposalRow {
        id,
        number,
        client_id,
        status,
        sent_at,
        viewed_at,
        responded_at,
    } = row;

    let status: ProposalStatus = status
        .parse()
        .map_err(|err: crate::domain::status::InvalidStatus| {
            RepositoryError::query(err.to_string())
        })?;

    Ok(Proposal {
        id,
        number,
        client_id,
        status,
        sent_at,
        viewed_at,
        responded_at,
    })
}

#[async_trait]
impl ProposalRepository for DieselProposalRepository {
    async fn find(&self, id: Uuid) -> Result<Option<Proposal>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = proposals::table
            .filter(proposals::id.eq(id))
            .select(ProposalRow::as_select())
            .first::<ProposalRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_proposal).transpose()
    }

    async fn insert(&self, proposal: &Proposal) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(proposals::table)
            .values(&NewProposalRow {
                id: proposal.id,
                number: &proposal.number,
                client_id: proposal.client_id,
                status: proposal.status.as_str(),
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ProposalStatus,
        stamps: ProposalStamps,
    ) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(proposals::table.filter(proposals::id.eq(id)))
            .set(&ProposalStatusUpdate {
                status: status.as_str(),
                sent_at: stamps.sent_at,
                viewed_at: stamps.viewed_at,
                responded_at: stamps.responded_at,
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
