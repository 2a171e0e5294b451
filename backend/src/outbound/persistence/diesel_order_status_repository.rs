//! PostgreSQL-backed `OrderStatusRepository` implementation using Diesel ORM.
//!
//! The `is_initial` flag is a singleton across the table: marking a row
//! initial clears the flag on every other row inside one transaction.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use uuid::Uuid;

use crate::domain::orders::OrderStatus;
use crate::domain::ports::{OrderStatusRepository, RepositoryError};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::OrderStatusRow;
use super::pool::DbPool;
use super::schema::order_statuses;

/// Diesel-backed implementation of the order status repository port.
#[derive(Clone)]
pub struct DieselOrderStatusRepository {
    pool: DbPool,
}

impl DieselOrderStatusRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_status(row: OrderStatusRow) -> OrderStatus {
    let OrderStatusRow {
        id,
        code,
        name,
        color,
        position,
        is_initial,
        is_final,
        notify_client,
        is_active,
    } = row;
    OrderStatus {
        id,
        code,
        name,
        color,
        position,
        is_initial,
        is_final,
        notify_client,
        is_active,
    }
}

#[async_trait]
impl OrderStatusRepository for DieselOrderStatusRepository {
    async fn find(&self, id: Uuid) -> Result<Option<OrderStatus>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = order_statuses::table
            .filter(order_statuses::id.eq(id))
            .select(OrderStatusRow::as_select())
            .first::<OrderStatusRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_status))
    }

    async fn find_initial(&self) -> Result<Option<OrderStatus>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = order_statuses::table
            .filter(order_statuses::is_initial.eq(true))
            .filter(order_statuses::is_active.eq(true))
            .select(OrderStatusRow::as_select())
            .first::<OrderStatusRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_status))
    }

    async fn mark_initial(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::update(order_statuses::table)
                    .set(order_statuses::is_initial.eq(false))
                    .execute(conn)
                    .await?;

                let updated = diesel::update(
                    order_statuses::table.filter(order_statuses::id.eq(id)),
                )
                .set(order_statuses::is_initial.eq(true))
                .execute(conn)
                .await?;

                if updated == 0 {
                    return Err(diesel::result::Error::NotFound);
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn row_conversion_preserves_flags() {
        let row = OrderStatusRow {
            id: Uuid::new_v4(),
            code: "in-work".into(),
            name: "In work".into(),
            color: "#2266ff".into(),
            position: 2,
            is_initial: false,
            is_final: false,
            notify_client: true,
            is_active: true,
        };

        let status = row_to_status(row.clone());
        assert_eq!(status.id, row.id);
        assert_eq!(status.code, "in-work");
        assert!(status.notify_client);
        assert!(!status.is_initial);
    }
}
