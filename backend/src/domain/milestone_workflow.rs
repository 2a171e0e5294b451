//! Milestone status workflow.
//!
//! The state assignment itself is unconditional; callers may set any value.
//! Side effects are keyed by the destination state:
//!
//! | to-state    | `completed_at` | `client_approved_at` |
//! |-------------|----------------|----------------------|
//! | Completed   | set to now     | unchanged            |
//! | InProgress  | cleared        | cleared              |
//! | Approved    | unchanged      | set to now           |
//! | Cancelled   | cleared        | cleared              |
//! | Pending     | cleared        | cleared              |
//!
//! After persisting, staff recipients of the owning order are notified; a
//! completed milestone that requires approval additionally emails the
//! order's client (best-effort).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use super::error::{ApiResult, Error};
use super::messages;
use super::milestones::{Milestone, MilestoneStamps};
use super::notifications::NotificationMessage;
use super::ports::{ClientDirectory, Mailer, MilestoneRepository, OrderRepository};
use super::recipients::NotificationFanOut;
use super::status::{EntityKind, MilestoneStatus, NotificationKind};

/// Compute the timestamp columns for a transition into `status`.
#[must_use]
pub fn stamps_for_transition(
    milestone: &Milestone,
    status: MilestoneStatus,
    now: DateTime<Utc>,
) -> MilestoneStamps {
    match status {
        MilestoneStatus::Completed => MilestoneStamps {
            completed_at: Some(now),
            client_approved_at: milestone.client_approved_at,
        },
        MilestoneStatus::Approved => MilestoneStamps {
            completed_at: milestone.completed_at,
            client_approved_at: Some(now),
        },
        MilestoneStatus::InProgress | MilestoneStatus::Cancelled | MilestoneStatus::Pending => {
            MilestoneStamps {
                completed_at: None,
                client_approved_at: None,
            }
        }
    }
}

/// Drives milestone status transitions and their side effects.
#[derive(Clone)]
pub struct MilestoneWorkflowService {
    milestones: Arc<dyn MilestoneRepository>,
    orders: Arc<dyn OrderRepository>,
    clients: Arc<dyn ClientDirectory>,
    fan_out: NotificationFanOut,
    mailer: Arc<dyn Mailer>,
}

impl MilestoneWorkflowService {
    /// Create the service over its driven ports.
    pub fn new(
        milestones: Arc<dyn MilestoneRepository>,
        orders: Arc<dyn OrderRepository>,
        clients: Arc<dyn ClientDirectory>,
        fan_out: NotificationFanOut,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            milestones,
            orders,
            clients,
            fan_out,
            mailer,
        }
    }

    /// Move a milestone to a new state, maintaining its timestamp
    /// invariants and fanning out staff notifications.
    pub async fn set_status(&self, milestone_id: Uuid, status: MilestoneStatus) -> ApiResult<()> {
        let milestone = self
            .milestones
            .find(milestone_id)
            .await
            .map_err(|err| err.into_domain("milestone repository"))?
            .ok_or_else(|| Error::not_found(format!("milestone {milestone_id} not found")))?;

        let stamps = stamps_for_transition(&milestone, status, Utc::now());
        self.milestones
            .set_status(milestone_id, status, stamps)
            .await
            .map_err(|err| err.into_domain("milestone repository"))?;

        let order = self
            .orders
            .find(milestone.order_id)
            .await
            .map_err(|err| err.into_domain("order repository"))?
            .ok_or_else(|| {
                Error::internal(format!(
                    "milestone {milestone_id} references missing order {}",
                    milestone.order_id
                ))
            })?;

        let recipients = self.fan_out.order_recipients(&order).await?;
        let message = NotificationMessage {
            kind: NotificationKind::Status,
            title: "Milestone status updated".to_owned(),
            description: format!(
                "{}: milestone \"{}\" is now {}",
                order.number,
                milestone.title,
                status.label()
            ),
            link_url: Some(format!("/orders/{}", order.id)),
            entity_type: EntityKind::Milestone,
            entity_id: milestone.id,
        };
        self.fan_out.notify(&recipients, &message).await?;

        if status == MilestoneStatus::Completed && milestone.requires_approval {
            self.email_review_request(&order, &milestone).await;
        }

        Ok(())
    }

    /// Best-effort review-request email; failures are logged and swallowed.
    async fn email_review_request(&self, order: &super::orders::Order, milestone: &Milestone) {
        let client = match self.clients.find(order.client_id).await {
            Ok(Some(client)) => client,
            Ok(None) => {
                warn!(order = %order.number, "client missing, skipping review email");
                return;
            }
            Err(error) => {
                warn!(order = %order.number, %error, "client lookup failed, skipping review email");
                return;
            }
        };

        let Some(address) = client.email.as_deref() else {
            return;
        };

        let email = messages::milestone_ready_for_review(
            address,
            &client.name,
            &order.number,
            &milestone.title,
        );
        if let Err(error) = self.mailer.send(email).await {
            warn!(order = %order.number, %error, "milestone review email failed");
        }
    }
}
