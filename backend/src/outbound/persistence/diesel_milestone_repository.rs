//! PostgreSQL-backed `MilestoneRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::milestones::{Milestone, MilestoneStamps};
use crate::domain::ports::{MilestoneRepository, RepositoryError};
use crate::domain::status::MilestoneStatus;

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{MilestoneRow, MilestoneStatusUpdate};
use super::pool::DbPool;
use super::schema::milestones;

/// Diesel-backed implementation of the milestone repository port.
#[derive(Clone)]
pub struct DieselMilestoneRepository {
    pool: DbPool,
}

impl DieselMilestoneRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Convert a database row into a domain milestone.
fn row_to_milestone(row: MilestoneRow) -> Result<Milestone, RepositoryError> {
    let MilestoneRow {
        id,
        order_id,
        title,
        status,
        requires_approval,
        due_date,
        completed_at,
        client_approved_at,
    } = row;

    let status: MilestoneStatus = status
        .parse()
        .map_err(|err: crate::domain::status::InvalidStatus| {
            RepositoryError::query(err.to_string())
        })?;

    Ok(Milestone {
        id,
        order_id,
        title,
        status,
        requires_approval,
        due_date,
        completed_at,
        client_approved_at,
    })
}

#[async_trait]
impl MilestoneRepository for DieselMilestoneRepository {
    async fn find(&self, id: Uuid) -> Result<Option<Milestone>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = milestones::table
            .filter(milestones::id.eq(id))
            .select(MilestoneRow::as_select())
            .first::<MilestoneRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_milestone).transpose()
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: MilestoneStatus,
        stamps: MilestoneStamps,
    ) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(milestones::table.filter(milestones::id.eq(id)))
            .set(&MilestoneStatusUpdate {
                status: status.as_str(),
                completed_at: stamps.completed_at,
                client_approved_at: stamps.client_approved_at,
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_due_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Milestone>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let open = [
            MilestoneStatus::Pending.as_str(),
            MilestoneStatus::InProgress.as_str(),
        ];
        let rows: Vec<MilestoneRow> = milestones::table
            .filter(milestones::status.eq_any(open))
            .filter(milestones::due_date.between(from, until))
            .order(milestones::due_date.asc())
            .select(MilestoneRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_milestone).collect()
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn valid_row() -> MilestoneRow {
        MilestoneRow {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            title: "Design handoff".into(),
            status: "IN_PROGRESS".into(),
            requires_approval: true,
            due_date: None,
            completed_at: None,
            client_approved_at: None,
        }
    }

    #[rstest]
    fn row_conversion_parses_status(valid_row: MilestoneRow) {
        let milestone = row_to_milestone(valid_row).expect("valid row converts");
        assert_eq!(milestone.status, MilestoneStatus::InProgress);
        assert!(milestone.requires_approval);
    }

    #[rstest]
    fn row_conversion_rejects_unknown_status(mut valid_row: MilestoneRow) {
        valid_row.status = "BLOCKED".into();

        let error = row_to_milestone(valid_row).expect_err("unknown status rejected");
        assert!(matches!(error, RepositoryError::Query { .. }));
    }
}
