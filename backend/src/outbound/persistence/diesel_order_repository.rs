//! PostgreSQL-backed `OrderRepository` implementation using Diesel ORM.
//!
//! Status transitions update the foreign key and append one history row in
//! a single transaction; the history table is append-only.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use uuid::Uuid;

use crate::domain::orders::{Order, OrderStatusChange};
use crate::domain::ports::{OrderRepository, RepositoryError};
use crate::domain::status::OrderPriority;

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewOrderRow, NewOrderStatusHistoryRow, OrderRow};
use super::pool::DbPool;
use super::schema::{order_status_history, orders};

/// Diesel-backed implementation of the order repository port.
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Convert a database row into a domain order.
fn row_to_order(row: OrderRow) -> Result<Order, RepositoryError> {
    let OrderRow {
        id,
        number,
        client_id,
        manager_id,
        status_id,
        priority,
        deadline,
        actual_start_date,
        actual_end_date,
        created_at,
    } = row;

    let priority: OrderPriority = priority
        .parse()
        .map_err(|err: crate::domain::status::InvalidStatus| {
            RepositoryError::query(err.to_string())
        })?;

    Ok(Order {
        id,
        number,
        client_id,
        manager_id,
        status_id,
        priority,
        deadline,
        actual_start_date,
        actual_end_date,
        created_at,
    })
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn find(&self, id: Uuid) -> Result<Option<Order>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .first::<OrderRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_order).transpose()
    }

    async fn insert(&self, order: &Order) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(orders::table)
            .values(&NewOrderRow {
                id: order.id,
                number: &order.number,
                client_id: order.client_id,
                manager_id: order.manager_id,
                status_id: order.status_id,
                priority: order.priority.as_str(),
                deadline: order.deadline,
                created_at: order.created_at,
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn set_status(&self, change: &OrderStatusChange) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let history_row = NewOrderStatusHistoryRow {
            id: Uuid::new_v4(),
            order_id: change.order_id,
            to_status_id: change.to_status_id,
            changed_by: change.changed_by,
        };
        let order_id = change.order_id;
        let to_status_id = change.to_status_id;

        conn.transaction(|conn| {
            async move {
                diesel::update(orders::table.filter(orders::id.eq(order_id)))
                    .set(orders::status_id.eq(to_status_id))
                    .execute(conn)
                    .await?;

                diesel::insert_into(order_status_history::table)
                    .values(&history_row)
                    .execute(conn)
                    .await?;

                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
