//! Notification recipient resolution and fan-out.
//!
//! "Who should hear about order X" is the order's manager (if set) plus all
//! active admins and managers, deduplicated. Fan-out persists one
//! notification row per recipient; it never sends email itself.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use super::error::ApiResult;
use super::notifications::NotificationMessage;
use super::orders::Order;
use super::ports::{NotificationRepository, StaffDirectory};
use super::status::StaffRole;

/// Resolves recipient sets and persists per-recipient notification rows.
#[derive(Clone)]
pub struct NotificationFanOut {
    staff: Arc<dyn StaffDirectory>,
    notifications: Arc<dyn NotificationRepository>,
}

impl NotificationFanOut {
    /// Create a fan-out over the staff directory and notification store.
    pub fn new(
        staff: Arc<dyn StaffDirectory>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            staff,
            notifications,
        }
    }

    /// Recipients for events on an order: manager ∪ active admins/managers.
    ///
    /// Deduplicated; a manager who also holds an admin role appears once.
    pub async fn order_recipients(&self, order: &Order) -> ApiResult<Vec<Uuid>> {
        let staff = self
            .staff
            .list_active_in_roles(&[StaffRole::Admin, StaffRole::Manager])
            .await
            .map_err(|err| err.into_domain("staff directory"))?;

        let mut seen = HashSet::new();
        let mut recipients = Vec::new();
        if let Some(manager_id) = order.manager_id {
            if seen.insert(manager_id) {
                recipients.push(manager_id);
            }
        }
        for member in staff {
            if seen.insert(member.id) {
                recipients.push(member.id);
            }
        }
        Ok(recipients)
    }

    /// Recipients for staff-wide events with no owning order (payments,
    /// invoice status changes): all active admins and managers.
    pub async fn staff_recipients(&self) -> ApiResult<Vec<Uuid>> {
        let staff = self
            .staff
            .list_active_in_roles(&[StaffRole::Admin, StaffRole::Manager])
            .await
            .map_err(|err| err.into_domain("staff directory"))?;
        Ok(staff.into_iter().map(|member| member.id).collect())
    }

    /// Persist one notification row per recipient; returns rows created.
    pub async fn notify(
        &self,
        recipients: &[Uuid],
        message: &NotificationMessage,
    ) -> ApiResult<usize> {
        if recipients.is_empty() {
            return Ok(0);
        }
        let drafts: Vec<_> = recipients
            .iter()
            .map(|id| message.for_recipient(*id))
            .collect();
        self.notifications
            .create_many(&drafts)
            .await
            .map_err(|err| err.into_domain("notification repository"))
    }
}
