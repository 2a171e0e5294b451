//! Diesel-backed `LoginService` verifying staff credentials with Argon2.

use argon2::password_hash::PasswordHash;
use argon2::{Argon2, PasswordVerifier};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::directory::{LoginCredentials, StaffMember};
use crate::domain::ports::LoginService;
use crate::domain::{ApiResult, Error};

use super::diesel_staff_directory::row_to_staff_member;
use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::StaffRow;
use super::pool::DbPool;
use super::schema::staff;

/// Diesel-backed implementation of the login port.
#[derive(Clone)]
pub struct DieselLoginService {
    pool: DbPool,
}

impl DieselLoginService {
    /// Create a new service with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn verify_password(password: &str, stored_hash: &str) -> ApiResult<()> {
    let parsed = PasswordHash::new(stored_hash).map_err(|error| {
        warn!(%error, "stored password hash is malformed");
        Error::internal("stored credentials are unreadable")
    })?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| Error::unauthorized("invalid credentials"))
}

#[async_trait]
impl LoginService for DieselLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> ApiResult<StaffMember> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err).into_domain("staff directory"))?;

        let row = staff::table
            .filter(staff::email.eq(&credentials.email))
            .filter(staff::is_active.eq(true))
            .select(StaffRow::as_select())
            .first::<StaffRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err).into_domain("staff directory"))?
            .ok_or_else(|| Error::unauthorized("invalid credentials"))?;

        verify_password(&credentials.password, &row.password_hash)?;

        row_to_staff_member(row).map_err(|err| err.into_domain("staff directory"))
    }
}
