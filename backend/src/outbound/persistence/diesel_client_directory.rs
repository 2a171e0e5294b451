//! PostgreSQL-backed `ClientDirectory` implementation using Diesel ORM.
//!
//! Portal tokens are never stored; only their SHA-256 digests touch the
//! clients table.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::directory::Client;
use crate::domain::ports::{ClientDirectory, RepositoryError};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::ClientRow;
use super::pool::DbPool;
use super::schema::clients;

/// Diesel-backed implementation of the client directory port.
#[derive(Clone)]
pub struct DieselClientDirectory {
    pool: DbPool,
}

impl DieselClientDirectory {
    /// Create a new directory with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_client(row: ClientRow) -> Client {
    let ClientRow {
        id,
        name,
        email,
        portal_token_digest,
        ..
    } = row;
    Client {
        id,
        name,
        email,
        portal_token_digest,
    }
}

#[async_trait]
impl ClientDirectory for DieselClientDirectory {
    async fn find(&self, id: Uuid) -> Result<Option<Client>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = clients::table
            .filter(clients::id.eq(id))
            .select(ClientRow::as_select())
            .first::<ClientRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_client))
    }

    async fn find_by_token_digest(
        &self,
        digest: &str,
    ) -> Result<Option<Client>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = clients::table
            .filter(clients::portal_token_digest.eq(digest))
            .select(ClientRow::as_select())
            .first::<ClientRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_client))
    }

    async fn store_token_digest(
        &self,
        client_id: Uuid,
        digest: &str,
    ) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(clients::table.filter(clients::id.eq(client_id)))
            .set(clients::portal_token_digest.eq(digest))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if updated == 0 {
            return Err(RepositoryError::query("client not found"));
        }
        Ok(())
    }
}
