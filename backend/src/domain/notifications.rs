//! In-app notifications: one row per (event, recipient) pair.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::status::{EntityKind, NotificationKind};

/// A persisted notification addressed to one staff member.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// Primary identifier.
    pub id: Uuid,
    /// Recipient staff member.
    pub user_id: Uuid,
    /// Notification category.
    pub kind: NotificationKind,
    /// Short headline.
    pub title: String,
    /// Longer description, including status labels.
    pub description: String,
    /// Relative link into the UI, e.g. `/orders/{id}`.
    pub link_url: Option<String>,
    /// Entity the notification refers to.
    pub entity_type: EntityKind,
    /// Identifier of the referenced entity.
    pub entity_id: Uuid,
    /// When the recipient read it; rows are otherwise never updated.
    pub read_at: Option<DateTime<Utc>>,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// One event's payload, fanned out to a recipient set by
/// [`crate::domain::recipients::NotificationFanOut`].
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationMessage {
    /// Notification category.
    pub kind: NotificationKind,
    /// Short headline.
    pub title: String,
    /// Longer description, including status labels.
    pub description: String,
    /// Relative link into the UI.
    pub link_url: Option<String>,
    /// Entity the notification refers to.
    pub entity_type: EntityKind,
    /// Identifier of the referenced entity.
    pub entity_id: Uuid,
}

/// Insert payload: one notification row for one recipient.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDraft {
    /// Recipient staff member.
    pub user_id: Uuid,
    /// Notification category.
    pub kind: NotificationKind,
    /// Short headline.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Relative link into the UI.
    pub link_url: Option<String>,
    /// Entity the notification refers to.
    pub entity_type: EntityKind,
    /// Identifier of the referenced entity.
    pub entity_id: Uuid,
}

impl NotificationMessage {
    /// Address this message to a single recipient.
    #[must_use]
    pub fn for_recipient(&self, user_id: Uuid) -> NotificationDraft {
        NotificationDraft {
            user_id,
            kind: self.kind,
            title: self.title.clone(),
            description: self.description.clone(),
            link_url: self.link_url.clone(),
            entity_type: self.entity_type,
            entity_id: self.entity_id,
        }
    }
}
