//! Closed status vocabularies for workflow entities.
//!
//! Milestones, invoices, proposals, tickets, and tasks carry closed status
//! enums with explicit side-effect rules in their workflow services. Orders
//! are different: their status is a foreign key into mutable reference data
//! (see [`crate::domain::orders::OrderStatus`]), not an enum.
//!
//! Each enum maps to a stable SCREAMING_SNAKE_CASE wire string (stored in
//! the database and accepted over the API) and a human label used in
//! notification text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Error returned when a wire string does not name a known enum value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} value: {value}")]
pub struct InvalidStatus {
    kind: &'static str,
    value: String,
}

impl InvalidStatus {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $wire:literal, $label:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
        )]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $(
                #[doc = $label]
                $variant,
            )+
        }

        impl $name {
            /// Stable wire string stored in the database.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            /// Human label used in notification and email text.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = InvalidStatus;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(InvalidStatus::new($kind, value)),
                }
            }
        }
    };
}

wire_enum! {
    /// Milestone lifecycle states.
    MilestoneStatus, "milestone status" {
        Pending => "PENDING", "Pending";
        InProgress => "IN_PROGRESS", "In progress";
        Completed => "COMPLETED", "Completed";
        Approved => "APPROVED", "Approved";
        Cancelled => "CANCELLED", "Cancelled";
    }
}

impl MilestoneStatus {
    /// Whether the milestone still participates in deadline sweeps.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }
}

wire_enum! {
    /// Invoice lifecycle states.
    InvoiceStatus, "invoice status" {
        Draft => "DRAFT", "Draft";
        Sent => "SENT", "Sent";
        Viewed => "VIEWED", "Viewed";
        Paid => "PAID", "Paid";
        PartiallyPaid => "PARTIALLY_PAID", "Partially paid";
        Overdue => "OVERDUE", "Overdue";
        Cancelled => "CANCELLED", "Cancelled";
    }
}

wire_enum! {
    /// Proposal lifecycle states.
    ProposalStatus, "proposal status" {
        Draft => "DRAFT", "Draft";
        Sent => "SENT", "Sent";
        Viewed => "VIEWED", "Viewed";
        Accepted => "ACCEPTED", "Accepted";
        Rejected => "REJECTED", "Rejected";
        Expired => "EXPIRED", "Expired";
    }
}

wire_enum! {
    /// Support ticket lifecycle states.
    TicketStatus, "ticket status" {
        Open => "OPEN", "Open";
        InProgress => "IN_PROGRESS", "In progress";
        Resolved => "RESOLVED", "Resolved";
        Closed => "CLOSED", "Closed";
    }
}

wire_enum! {
    /// Task lifecycle states.
    TaskStatus, "task status" {
        Todo => "TODO", "To do";
        InProgress => "IN_PROGRESS", "In progress";
        Done => "DONE", "Done";
        Cancelled => "CANCELLED", "Cancelled";
    }
}

impl TaskStatus {
    /// Whether the task still participates in deadline sweeps.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Todo | Self::InProgress)
    }
}

wire_enum! {
    /// Staff roles controlling notification fan-out and permissions.
    StaffRole, "staff role" {
        Admin => "ADMIN", "Administrator";
        Manager => "MANAGER", "Manager";
        Staff => "STAFF", "Staff";
    }
}

wire_enum! {
    /// Order priority, advisory only.
    OrderPriority, "order priority" {
        Low => "LOW", "Low";
        Medium => "MEDIUM", "Medium";
        High => "HIGH", "High";
        Urgent => "URGENT", "Urgent";
    }
}

wire_enum! {
    /// Notification categories.
    NotificationKind, "notification kind" {
        Status => "STATUS", "Status change";
        Deadline => "DEADLINE", "Deadline approaching";
        Payment => "PAYMENT", "Payment received";
    }
}

wire_enum! {
    /// Entity discriminator attached to notifications.
    EntityKind, "entity kind" {
        Order => "ORDER", "Order";
        Milestone => "MILESTONE", "Milestone";
        Task => "TASK", "Task";
        Invoice => "INVOICE", "Invoice";
        Proposal => "PROPOSAL", "Proposal";
        Ticket => "TICKET", "Ticket";
    }
}
