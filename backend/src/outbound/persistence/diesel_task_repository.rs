//! PostgreSQL-backed `TaskRepository` implementation using Diesel ORM.
//!
//! The deadline sweep is the only workflow consumer; it needs open tasks
//! with an imminent due date.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RepositoryError, TaskRepository};
use crate::domain::status::TaskStatus;
use crate::domain::tasks::Task;

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::TaskRow;
use super::pool::DbPool;
use super::schema::tasks;

/// Diesel-backed implementation of the task repository port.
#[derive(Clone)]
pub struct DieselTaskRepository {
    pool: DbPool,
}

impl DieselTaskRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_task(row: TaskRow) -> Result<Task, RepositoryError> {
    let TaskRow {
        id,
        order_id,
        title,
        status,
        assignee_id,
        due_date,
    } = row;

    let status: TaskStatus = status
        .parse()
        .map_err(|err: crate::domain::status::InvalidStatus| {
            RepositoryError::query(err.to_string())
        })?;

    Ok(Task {
        id,
        order_id,
        title,
        status,
        assignee_id,
        due_date,
    })
}

#[async_trait]
impl TaskRepository for DieselTaskRepository {
    async fn list_due_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Task>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let open = [TaskStatus::Todo.as_str(), TaskStatus::InProgress.as_str()];
        let rows: Vec<TaskRow> = tasks::table
            .filter(tasks::status.eq_any(open))
            .filter(tasks::due_date.between(from, until))
            .order(tasks::due_date.asc())
            .select(TaskRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_task).collect()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    #[rstest]
    fn row_conversion_parses_status() {
        let row = TaskRow {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            title: "Rack the server".into(),
            status: "TODO".into(),
            assignee_id: None,
            due_date: None,
        };

        let task = row_to_task(row).expect("valid row converts");
        assert_eq!(task.status, TaskStatus::Todo);
    }

    #[rstest]
    fn row_conversion_rejects_unknown_status() {
        let row = TaskRow {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            title: "t".into(),
            status: "WAITING".into(),
            assignee_id: None,
            due_date: None,
        };

        let error = row_to_task(row).expect_err("unknown status rejected");
        assert!(matches!(error, RepositoryError::Query { .. }));
    }
}
