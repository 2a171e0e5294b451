//! Deadline sweep: notify recipients about work due within 24 hours.
//!
//! Invoked by an externally scheduled cron trigger. Open milestones and
//! tasks whose due date falls inside the next 24 hours produce one
//! `DEADLINE` notification per recipient. There is no idempotency guard:
//! invoking the sweep twice inside one window re-notifies, which is
//! acceptable under the documented once-daily trigger.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;
use uuid::Uuid;

use super::error::ApiResult;
use super::notifications::NotificationMessage;
use super::ports::{MilestoneRepository, OrderRepository, TaskRepository};
use super::recipients::NotificationFanOut;
use super::status::{EntityKind, NotificationKind};

/// Horizon the sweep looks ahead over.
const SWEEP_HORIZON_HOURS: i64 = 24;

/// Counts reported back to the cron trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineSweepReport {
    /// Milestones found due within the horizon.
    pub milestones: usize,
    /// Tasks found due within the horizon.
    pub tasks: usize,
    /// Notification rows persisted.
    pub notifications_created: usize,
}

/// Scans for imminent due dates and fans out `DEADLINE` notifications.
#[derive(Clone)]
pub struct DeadlineSweepService {
    milestones: Arc<dyn MilestoneRepository>,
    tasks: Arc<dyn TaskRepository>,
    orders: Arc<dyn OrderRepository>,
    fan_out: NotificationFanOut,
}

impl DeadlineSweepService {
    /// Create the service over its driven ports.
    pub fn new(
        milestones: Arc<dyn MilestoneRepository>,
        tasks: Arc<dyn TaskRepository>,
        orders: Arc<dyn OrderRepository>,
        fan_out: NotificationFanOut,
    ) -> Self {
        Self {
            milestones,
            tasks,
            orders,
            fan_out,
        }
    }

    /// Run one sweep over milestones and tasks.
    pub async fn run(&self) -> ApiResult<DeadlineSweepReport> {
        let from = Utc::now();
        let until = from + Duration::hours(SWEEP_HORIZON_HOURS);
        let mut notifications_created = 0;

        let milestones = self
            .milestones
            .list_due_between(from, until)
            .await
            .map_err(|err| err.into_domain("milestone repository"))?;
        for milestone in &milestones {
            let Some(order) = self.find_order(milestone.order_id).await? else {
                warn!(milestone = %milestone.id, "owning order missing, skipping deadline notice");
                continue;
            };
            let recipients = self.fan_out.order_recipients(&order).await?;
            let message = NotificationMessage {
                kind: NotificationKind::Deadline,
                title: "Milestone due soon".to_owned(),
                description: format!(
                    "{}: milestone \"{}\" is due within 24 hours",
                    order.number, milestone.title
                ),
                link_url: Some(format!("/orders/{}", order.id)),
                entity_type: EntityKind::Milestone,
                entity_id: milestone.id,
            };
            notifications_created += self.fan_out.notify(&recipients, &message).await?;
        }

        let tasks = self
            .tasks
            .list_due_between(from, until)
            .await
            .map_err(|err| err.into_domain("task repository"))?;
        for task in &tasks {
            let Some(order) = self.find_order(task.order_id).await? else {
                warn!(task = %task.id, "owning order missing, skipping deadline notice");
                continue;
            };
            let mut recipients = self.fan_out.order_recipients(&order).await?;
            if let Some(assignee) = task.assignee_id {
                if !recipients.contains(&assignee) {
                    recipients.push(assignee);
                }
            }
            let message = NotificationMessage {
                kind: NotificationKind::Deadline,
                title: "Task due soon".to_owned(),
                description: format!(
                    "{}: task \"{}\" is due within 24 hours",
                    order.number, task.title
                ),
                link_url: Some(format!("/orders/{}", order.id)),
                entity_type: EntityKind::Task,
                entity_id: task.id,
            };
            notifications_created += self.fan_out.notify(&recipients, &message).await?;
        }

        Ok(DeadlineSweepReport {
            milestones: milestones.len(),
            tasks: tasks.len(),
            notifications_created,
        })
    }

    async fn find_order(
        &self,
        order_id: Uuid,
    ) -> ApiResult<Option<super::orders::Order>> {
        self.orders
            .find(order_id)
            .await
            .map_err(|err| err.into_domain("order repository"))
    }
}
