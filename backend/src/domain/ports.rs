//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (the relational store and the outbound mailer). Each trait exposes
//! strongly typed errors so adapters map their failures into predictable
//! variants instead of returning `anyhow::Result`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error as ThisError;
use uuid::Uuid;

use super::billing::{Invoice, InvoicePaymentUpdate, PaymentDraft};
use super::directory::{Client, LoginCredentials, StaffMember};
use super::error::Error;
use super::milestones::{Milestone, MilestoneStamps};
use super::notifications::NotificationDraft;
use super::numbering::DocumentKind;
use super::orders::{Order, OrderStatus, OrderStatusChange};
use super::proposals::{Proposal, ProposalStamps};
use super::status::{InvoiceStatus, MilestoneStatus, ProposalStatus, StaffRole, TicketStatus};
use super::tasks::Task;
use super::tickets::{Ticket, TicketStamps};

/// Errors surfaced by store adapters.
///
/// All repository ports share this error shape: adapters fold their
/// backend-specific failures into a connectivity or a query variant, and
/// services map those onto `service_unavailable`/`internal` domain errors.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum RepositoryError {
    /// Store connectivity or checkout failures.
    #[error("store connection failed: {message}")]
    Connection {
        /// Adapter-provided failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("store query failed: {message}")]
    Query {
        /// Adapter-provided failure description.
        message: String,
    },
}

impl RepositoryError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Fold into a transport-agnostic domain error, naming the collaborator.
    #[must_use]
    pub fn into_domain(self, context: &str) -> Error {
        match self {
            Self::Connection { message } => {
                Error::service_unavailable(format!("{context} unavailable: {message}"))
            }
            Self::Query { message } => Error::internal(format!("{context} error: {message}")),
        }
    }
}

/// Errors surfaced by the mailer adapter.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum MailerError {
    /// The SMTP transport failed before the message was accepted.
    #[error("mail transport failed: {message}")]
    Transport {
        /// Adapter-provided failure description.
        message: String,
    },
    /// The upstream relay rejected the message.
    #[error("mail rejected: {message}")]
    Rejected {
        /// Adapter-provided failure description.
        message: String,
    },
}

impl MailerError {
    /// Helper for transport-level failures.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Helper for relay rejections.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

/// A rendered email ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Pre-rendered HTML body.
    pub html: String,
}

/// Persistence port for orders and their status history.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Fetch an order by identifier.
    async fn find(&self, id: Uuid) -> Result<Option<Order>, RepositoryError>;

    /// Persist a newly created order.
    async fn insert(&self, order: &Order) -> Result<(), RepositoryError>;

    /// Point the order at a new status row and append one history record.
    ///
    /// The history log is append-only; rows are never updated or deleted.
    async fn set_status(&self, change: &OrderStatusChange) -> Result<(), RepositoryError>;
}

/// Persistence port for order status reference data.
#[async_trait]
pub trait OrderStatusRepository: Send + Sync {
    /// Fetch a status row by identifier.
    async fn find(&self, id: Uuid) -> Result<Option<OrderStatus>, RepositoryError>;

    /// Fetch the active row flagged as the initial status, if any.
    async fn find_initial(&self) -> Result<Option<OrderStatus>, RepositoryError>;

    /// Mark a row as the initial status, clearing the flag on all other
    /// rows in the same store operation.
    async fn mark_initial(&self, id: Uuid) -> Result<(), RepositoryError>;
}

/// Persistence port for milestones.
#[async_trait]
pub trait MilestoneRepository: Send + Sync {
    /// Fetch a milestone by identifier.
    async fn find(&self, id: Uuid) -> Result<Option<Milestone>, RepositoryError>;

    /// Assign a new status together with its timestamp columns.
    async fn set_status(
        &self,
        id: Uuid,
        status: MilestoneStatus,
        stamps: MilestoneStamps,
    ) -> Result<(), RepositoryError>;

    /// Open milestones whose due date falls inside `[from, until]`.
    async fn list_due_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Milestone>, RepositoryError>;
}

/// Persistence port for tasks.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Open tasks whose due date falls inside `[from, until]`.
    async fn list_due_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Task>, RepositoryError>;
}

/// Persistence port for invoices and payments.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Fetch an invoice by identifier.
    async fn find(&self, id: Uuid) -> Result<Option<Invoice>, RepositoryError>;

    /// Persist a newly created invoice.
    async fn insert(&self, invoice: &Invoice) -> Result<(), RepositoryError>;

    /// Insert a payment row and apply the recomputed invoice fields.
    ///
    /// Both writes commit together or not at all.
    async fn record_payment(
        &self,
        invoice_id: Uuid,
        draft: &PaymentDraft,
        update: InvoicePaymentUpdate,
    ) -> Result<(), RepositoryError>;

    /// Assign a new invoice status.
    async fn set_status(&self, id: Uuid, status: InvoiceStatus) -> Result<(), RepositoryError>;
}

/// Persistence port for proposals.
#[async_trait]
pub trait ProposalRepository: Send + Sync {
    /// Fetch a proposal by identifier.
    async fn find(&self, id: Uuid) -> Result<Option<Proposal>, RepositoryError>;

    /// Persist a newly created proposal.
    async fn insert(&self, proposal: &Proposal) -> Result<(), RepositoryError>;

    /// Assign a new status, stamping only the timestamps carried in
    /// `stamps` (set-only; columns are never cleared).
    async fn set_status(
        &self,
        id: Uuid,
        status: ProposalStatus,
        stamps: ProposalStamps,
    ) -> Result<(), RepositoryError>;
}

/// Persistence port for support tickets.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Fetch a ticket by identifier.
    async fn find(&self, id: Uuid) -> Result<Option<Ticket>, RepositoryError>;

    /// Assign a new status together with its timestamp columns.
    async fn set_status(
        &self,
        id: Uuid,
        status: TicketStatus,
        stamps: TicketStamps,
    ) -> Result<(), RepositoryError>;
}

/// Persistence port for notification rows.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persist one row per draft; returns the number inserted.
    async fn create_many(&self, drafts: &[NotificationDraft]) -> Result<usize, RepositoryError>;
}

/// Read port for the staff directory.
#[async_trait]
pub trait StaffDirectory: Send + Sync {
    /// Fetch a staff member by identifier.
    async fn find(&self, id: Uuid) -> Result<Option<StaffMember>, RepositoryError>;

    /// Active staff members holding any of the given roles.
    async fn list_active_in_roles(
        &self,
        roles: &[StaffRole],
    ) -> Result<Vec<StaffMember>, RepositoryError>;
}

/// Persistence port for clients and their portal token digests.
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// Fetch a client by identifier.
    async fn find(&self, id: Uuid) -> Result<Option<Client>, RepositoryError>;

    /// Resolve a portal token digest to its client.
    async fn find_by_token_digest(&self, digest: &str)
    -> Result<Option<Client>, RepositoryError>;

    /// Replace the client's portal token digest.
    async fn store_token_digest(
        &self,
        client_id: Uuid,
        digest: &str,
    ) -> Result<(), RepositoryError>;
}

/// A counter allocation: the pre-increment value and the document prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocatedNumber {
    /// The counter value reserved for the caller.
    pub value: i32,
    /// Configured document prefix, e.g. `ORD`.
    pub prefix: String,
}

/// Port for the persisted document counters.
///
/// `allocate` must be atomic under concurrent callers: two simultaneous
/// calls never observe the same value, and the stored counter always ends
/// one past the last value handed out.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Increment the counter for `kind` and return the pre-increment value.
    async fn allocate(&self, kind: DocumentKind) -> Result<AllocatedNumber, RepositoryError>;
}

/// Outbound mail port.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Hand a rendered message to the transactional email provider.
    async fn send(&self, email: OutboundEmail) -> Result<(), MailerError>;
}

/// Staff credential verification port.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify credentials and return the authenticated staff member.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<StaffMember, Error>;
}
