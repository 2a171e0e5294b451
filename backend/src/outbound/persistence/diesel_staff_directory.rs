//! PostgreSQL-backed `StaffDirectory` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::directory::StaffMember;
use crate::domain::ports::{RepositoryError, StaffDirectory};
use crate::domain::status::StaffRole;

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::StaffRow;
use super::pool::DbPool;
use super::schema::staff;

/// Diesel-backed implementation of the staff directory port.
#[derive(Clone)]
pub struct DieselStaffDirectory {
    pool: DbPool,
}

impl DieselStaffDirectory {
    /// Create a new directory with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn row_to_staff_member(row: StaffRow) -> Result<StaffMember, RepositoryError> {
    let StaffRow {
        id,
        email,
        display_name,
        role,
        password_hash: _,
        is_active,
        ..
    } = row;

    let role: StaffRole = role
        .parse()
        .map_err(|err: crate::domain::status::InvalidStatus| {
            RepositoryError::query(err.to_string())
        })?;

    Ok(StaffMember {
        id,
        email,
        display_name,
        role,
        is_active,
    })
}

#[async_trait]
impl StaffDirectory for DieselStaffDirectory {
    async fn find(&self, id: Uuid) -> Result<Option<StaffMember>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = staff::table
            .filter(staff::id.eq(id))
            .select(StaffRow::as_select())
            .first::<StaffRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_staff_member).transpose()
    }

    async fn list_active_in_roles(
        &self,
        roles: &[StaffRole],
    ) -> Result<Vec<StaffMember>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let role_strings: Vec<&str> = roles.iter().map(|role| role.as_str()).collect();
        let rows: Vec<StaffRow> = staff::table
            .filter(staff::is_active.eq(true))
            .filter(staff::role.eq_any(role_strings))
            .order(staff::id.asc())
            .select(StaffRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_staff_member).collect()
    }
}
