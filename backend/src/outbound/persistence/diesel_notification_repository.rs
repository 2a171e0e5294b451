//! PostgreSQL-backed `NotificationRepository` implementation using Diesel
//! ORM.
//!
//! Notification rows are insert-only from the workflow's perspective;
//! marking them read happens elsewhere.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::notifications::NotificationDraft;
use crate::domain::ports::{NotificationRepository, RepositoryError};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::NewNotificationRow;
use super::pool::DbPool;
use super::schema::notifications;

/// Diesel-backed implementation of the notification repository port.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn create_many(&self, drafts: &[NotificationDraft]) -> Result<usize, RepositoryError> {
        if drafts.is_empty() {
            return Ok(0);
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<NewNotificationRow<'_>> = drafts
            .iter()
            .map(|draft| NewNotificationRow {
                id: Uuid::new_v4(),
                user_id: draft.user_id,
                kind: draft.kind.as_str(),
                title: &draft.title,
                description: &draft.description,
                link_url: draft.link_url.as_deref(),
                entity_type: draft.entity_type.as_str(),
                entity_id: draft.entity_id,
            })
            .collect();

        diesel::insert_into(notifications::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
