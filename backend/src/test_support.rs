//! In-memory port adapters for tests.
//!
//! These fakes back the workflow services in unit and integration tests so
//! behaviour can be asserted without a database or SMTP relay. They are
//! deliberately simple: mutex-guarded maps with the same observable
//! semantics the Diesel adapters provide, including atomic counter
//! allocation and the order-status initial-flag swap.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::billing::{Invoice, InvoicePaymentUpdate, Payment, PaymentDraft};
use crate::domain::directory::{Client, StaffMember};
use crate::domain::milestones::{Milestone, MilestoneStamps};
use crate::domain::notifications::NotificationDraft;
use crate::domain::numbering::DocumentKind;
use crate::domain::orders::{Order, OrderStatus, OrderStatusChange};
use crate::domain::ports::{
    AllocatedNumber, ClientDirectory, CounterStore, InvoiceRepository, Mailer, MailerError,
    MilestoneRepository, NotificationRepository, OrderRepository, OrderStatusRepository,
    OutboundEmail, ProposalRepository, RepositoryError, StaffDirectory, TaskRepository,
    TicketRepository,
};
use crate::domain::proposals::{Proposal, ProposalStamps};
use crate::domain::status::{InvoiceStatus, MilestoneStatus, ProposalStatus, StaffRole, TicketStatus};
use crate::domain::tasks::Task;
use crate::domain::tickets::{Ticket, TicketStamps};

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().expect("test store poisoned")
}

/// Persisted counter state mirroring the settings singleton row.
#[derive(Debug, Clone)]
pub struct CounterState {
    /// Next order number to hand out.
    pub next_order_number: i32,
    /// Next invoice number to hand out.
    pub next_invoice_number: i32,
    /// Next proposal number to hand out.
    pub next_proposal_number: i32,
    /// Order number prefix.
    pub order_prefix: String,
    /// Invoice number prefix.
    pub invoice_prefix: String,
    /// Proposal number prefix.
    pub proposal_prefix: String,
}

impl Default for CounterState {
    fn default() -> Self {
        Self {
            next_order_number: 1,
            next_invoice_number: 1,
            next_proposal_number: 1,
            order_prefix: "ORD".into(),
            invoice_prefix: "INV".into(),
            proposal_prefix: "KP".into(),
        }
    }
}

/// In-memory store implementing every repository port.
#[derive(Default)]
pub struct InMemoryStore {
    orders: Mutex<HashMap<Uuid, Order>>,
    order_statuses: Mutex<HashMap<Uuid, OrderStatus>>,
    history: Mutex<Vec<OrderStatusChange>>,
    milestones: Mutex<HashMap<Uuid, Milestone>>,
    tasks: Mutex<HashMap<Uuid, Task>>,
    invoices: Mutex<HashMap<Uuid, Invoice>>,
    payments: Mutex<Vec<Payment>>,
    proposals: Mutex<HashMap<Uuid, Proposal>>,
    tickets: Mutex<HashMap<Uuid, Ticket>>,
    notifications: Mutex<Vec<NotificationDraft>>,
    staff: Mutex<HashMap<Uuid, StaffMember>>,
    clients: Mutex<HashMap<Uuid, Client>>,
    counters: Mutex<CounterState>,
    fail_counters: AtomicBool,
}

impl InMemoryStore {
    /// Create an empty store with default counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an order.
    pub fn insert_order(&self, order: Order) {
        lock(&self.orders).insert(order.id, order);
    }

    /// Seed an order status row.
    pub fn insert_order_status(&self, status: OrderStatus) {
        lock(&self.order_statuses).insert(status.id, status);
    }

    /// Seed a milestone.
    pub fn insert_milestone(&self, milestone: Milestone) {
        lock(&self.milestones).insert(milestone.id, milestone);
    }

    /// Seed a task.
    pub fn insert_task(&self, task: Task) {
        lock(&self.tasks).insert(task.id, task);
    }

    /// Seed an invoice.
    pub fn insert_invoice(&self, invoice: Invoice) {
        lock(&self.invoices).insert(invoice.id, invoice);
    }

    /// Seed a proposal.
    pub fn insert_proposal(&self, proposal: Proposal) {
        lock(&self.proposals).insert(proposal.id, proposal);
    }

    /// Seed a ticket.
    pub fn insert_ticket(&self, ticket: Ticket) {
        lock(&self.tickets).insert(ticket.id, ticket);
    }

    /// Seed a staff member.
    pub fn insert_staff(&self, member: StaffMember) {
        lock(&self.staff).insert(member.id, member);
    }

    /// Seed a client.
    pub fn insert_client(&self, client: Client) {
        lock(&self.clients).insert(client.id, client);
    }

    /// Replace the counter state.
    pub fn set_counters(&self, counters: CounterState) {
        *lock(&self.counters) = counters;
    }

    /// Make counter allocation fail, simulating an unavailable store.
    pub fn fail_counters(&self) {
        self.fail_counters.store(true, Ordering::SeqCst);
    }

    /// Current counter state.
    #[must_use]
    pub fn counters(&self) -> CounterState {
        lock(&self.counters).clone()
    }

    /// Snapshot of an order.
    #[must_use]
    pub fn order(&self, id: Uuid) -> Option<Order> {
        lock(&self.orders).get(&id).cloned()
    }

    /// Snapshot of an order status row.
    #[must_use]
    pub fn order_status(&self, id: Uuid) -> Option<OrderStatus> {
        lock(&self.order_statuses).get(&id).cloned()
    }

    /// Snapshot of the status history log.
    #[must_use]
    pub fn history(&self) -> Vec<OrderStatusChange> {
        lock(&self.history).clone()
    }

    /// Snapshot of a milestone.
    #[must_use]
    pub fn milestone(&self, id: Uuid) -> Option<Milestone> {
        lock(&self.milestones).get(&id).cloned()
    }

    /// Snapshot of an invoice.
    #[must_use]
    pub fn invoice(&self, id: Uuid) -> Option<Invoice> {
        lock(&self.invoices).get(&id).cloned()
    }

    /// Snapshot of all recorded payments.
    #[must_use]
    pub fn payments(&self) -> Vec<Payment> {
        lock(&self.payments).clone()
    }

    /// Snapshot of a proposal.
    #[must_use]
    pub fn proposal(&self, id: Uuid) -> Option<Proposal> {
        lock(&self.proposals).get(&id).cloned()
    }

    /// Snapshot of a ticket.
    #[must_use]
    pub fn ticket(&self, id: Uuid) -> Option<Ticket> {
        lock(&self.tickets).get(&id).cloned()
    }

    /// Snapshot of a client.
    #[must_use]
    pub fn client(&self, id: Uuid) -> Option<Client> {
        lock(&self.clients).get(&id).cloned()
    }

    /// Snapshot of all persisted notifications.
    #[must_use]
    pub fn notifications(&self) -> Vec<NotificationDraft> {
        lock(&self.notifications).clone()
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn find(&self, id: Uuid) -> Result<Option<Order>, RepositoryError> {
        Ok(lock(&self.orders).get(&id).cloned())
    }

    async fn insert(&self, order: &Order) -> Result<(), RepositoryError> {
        lock(&self.orders).insert(order.id, order.clone());
        Ok(())
    }

    async fn set_status(&self, change: &OrderStatusChange) -> Result<(), RepositoryError> {
        let mut orders = lock(&self.orders);
        let order = orders
            .get_mut(&change.order_id)
            .ok_or_else(|| RepositoryError::query("order vanished mid-update"))?;
        order.status_id = change.to_status_id;
        drop(orders);
        lock(&self.history).push(change.clone());
        Ok(())
    }
}

#[async_trait]
impl OrderStatusRepository for InMemoryStore {
    async fn find(&self, id: Uuid) -> Result<Option<OrderStatus>, RepositoryError> {
        Ok(lock(&self.order_statuses).get(&id).cloned())
    }

    async fn find_initial(&self) -> Result<Option<OrderStatus>, RepositoryError> {
        Ok(lock(&self.order_statuses)
            .values()
            .find(|status| status.is_initial && status.is_active)
            .cloned())
    }

    async fn mark_initial(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut statuses = lock(&self.order_statuses);
        if !statuses.contains_key(&id) {
            return Err(RepositoryError::query("order status not found"));
        }
        for status in statuses.values_mut() {
            status.is_initial = status.id == id;
        }
        Ok(())
    }
}

#[async_trait]
impl MilestoneRepository for InMemoryStore {
    async fn find(&self, id: Uuid) -> Result<Option<Milestone>, RepositoryError> {
        Ok(lock(&self.milestones).get(&id).cloned())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: MilestoneStatus,
        stamps: MilestoneStamps,
    ) -> Result<(), RepositoryError> {
        let mut milestones = lock(&self.milestones);
        let milestone = milestones
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::query("milestone vanished mid-update"))?;
        milestone.status = status;
        milestone.completed_at = stamps.completed_at;
        milestone.client_approved_at = stamps.client_approved_at;
        Ok(())
    }

    async fn list_due_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Milestone>, RepositoryError> {
        Ok(lock(&self.milestones)
            .values()
            .filter(|m| m.status.is_open())
            .filter(|m| m.due_date.is_some_and(|due| due >= from && due <= until))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn list_due_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Task>, RepositoryError> {
        Ok(lock(&self.tasks)
            .values()
            .filter(|t| t.status.is_open())
            .filter(|t| t.due_date.is_some_and(|due| due >= from && due <= until))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryStore {
    async fn find(&self, id: Uuid) -> Result<Option<Invoice>, RepositoryError> {
        Ok(lock(&self.invoices).get(&id).cloned())
    }

    async fn insert(&self, invoice: &Invoice) -> Result<(), RepositoryError> {
        lock(&self.invoices).insert(invoice.id, invoice.clone());
        Ok(())
    }

    async fn record_payment(
        &self,
        invoice_id: Uuid,
        draft: &PaymentDraft,
        update: InvoicePaymentUpdate,
    ) -> Result<(), RepositoryError> {
        let mut invoices = lock(&self.invoices);
        let invoice = invoices
            .get_mut(&invoice_id)
            .ok_or_else(|| RepositoryError::query("invoice vanished mid-update"))?;
        invoice.paid_amount = update.paid_amount;
        invoice.status = update.status;
        invoice.paid_at = update.paid_at;
        drop(invoices);
        lock(&self.payments).push(Payment {
            id: Uuid::new_v4(),
            invoice_id,
            amount: draft.amount,
            payment_method: draft.payment_method.clone(),
            reference: draft.reference.clone(),
            payment_date: draft.payment_date,
        });
        Ok(())
    }

    async fn set_status(&self, id: Uuid, status: InvoiceStatus) -> Result<(), RepositoryError> {
        let mut invoices = lock(&self.invoices);
        let invoice = invoices
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::query("invoice vanished mid-update"))?;
        invoice.status = status;
        Ok(())
    }
}

#[async_trait]
impl ProposalRepository for InMemoryStore {
    async fn find(&self, id: Uuid) -> Result<Option<Proposal>, RepositoryError> {
        Ok(lock(&self.proposals).get(&id).cloned())
    }

    async fn insert(&self, proposal: &Proposal) -> Result<(), RepositoryError> {
        lock(&self.proposals).insert(proposal.id, proposal.clone());
        Ok(())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ProposalStatus,
        stamps: ProposalStamps,
    ) -> Result<(), RepositoryError> {
        let mut proposals = lock(&self.proposals);
        let proposal = proposals
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::query("proposal vanished mid-update"))?;
        proposal.status = status;
        if let Some(sent_at) = stamps.sent_at {
            proposal.sent_at = Some(sent_at);
        }
        if let Some(viewed_at) = stamps.viewed_at {
            proposal.viewed_at = Some(viewed_at);
        }
        if let Some(responded_at) = stamps.responded_at {
            proposal.responded_at = Some(responded_at);
        }
        Ok(())
    }
}

#[async_trait]
impl TicketRepository for InMemoryStore {
    async fn find(&self, id: Uuid) -> Result<Option<Ticket>, RepositoryError> {
        Ok(lock(&self.tickets).get(&id).cloned())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: TicketStatus,
        stamps: TicketStamps,
    ) -> Result<(), RepositoryError> {
        let mut tickets = lock(&self.tickets);
        let ticket = tickets
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::query("ticket vanished mid-update"))?;
        ticket.status = status;
        ticket.resolved_at = stamps.resolved_at;
        ticket.closed_at = stamps.closed_at;
        Ok(())
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn create_many(&self, drafts: &[NotificationDraft]) -> Result<usize, RepositoryError> {
        lock(&self.notifications).extend(drafts.iter().cloned());
        Ok(drafts.len())
    }
}

#[async_trait]
impl StaffDirectory for InMemoryStore {
    async fn find(&self, id: Uuid) -> Result<Option<StaffMember>, RepositoryError> {
        Ok(lock(&self.staff).get(&id).cloned())
    }

    async fn list_active_in_roles(
        &self,
        roles: &[StaffRole],
    ) -> Result<Vec<StaffMember>, RepositoryError> {
        let mut members: Vec<StaffMember> = lock(&self.staff)
            .values()
            .filter(|m| m.is_active && roles.contains(&m.role))
            .cloned()
            .collect();
        members.sort_by_key(|m| m.id);
        Ok(members)
    }
}

#[async_trait]
impl ClientDirectory for InMemoryStore {
    async fn find(&self, id: Uuid) -> Result<Option<Client>, RepositoryError> {
        Ok(lock(&self.clients).get(&id).cloned())
    }

    async fn find_by_token_digest(
        &self,
        digest: &str,
    ) -> Result<Option<Client>, RepositoryError> {
        Ok(lock(&self.clients)
            .values()
            .find(|c| c.portal_token_digest.as_deref() == Some(digest))
            .cloned())
    }

    async fn store_token_digest(
        &self,
        client_id: Uuid,
        digest: &str,
    ) -> Result<(), RepositoryError> {
        let mut clients = lock(&self.clients);
        let client = clients
            .get_mut(&client_id)
            .ok_or_else(|| RepositoryError::query("client vanished mid-update"))?;
        client.portal_token_digest = Some(digest.to_owned());
        Ok(())
    }
}

#[async_trait]
impl CounterStore for InMemoryStore {
    async fn allocate(&self, kind: DocumentKind) -> Result<AllocatedNumber, RepositoryError> {
        if self.fail_counters.load(Ordering::SeqCst) {
            return Err(RepositoryError::connection("counter store offline"));
        }
        let mut counters = lock(&self.counters);
        let (value, prefix) = match kind {
            DocumentKind::Order => {
                let value = counters.next_order_number;
                counters.next_order_number += 1;
                (value, counters.order_prefix.clone())
            }
            DocumentKind::Invoice => {
                let value = counters.next_invoice_number;
                counters.next_invoice_number += 1;
                (value, counters.invoice_prefix.clone())
            }
            DocumentKind::Proposal => {
                let value = counters.next_proposal_number;
                counters.next_proposal_number += 1;
                (value, counters.proposal_prefix.clone())
            }
        };
        Ok(AllocatedNumber { value, prefix })
    }
}

/// Mailer fake recording every send, with optional failure injection.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutboundEmail>>,
    fail: AtomicBool,
}

impl RecordingMailer {
    /// Create a mailer that accepts every message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail.
    pub fn fail_sends(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Snapshot of messages handed to the mailer.
    #[must_use]
    pub fn sent(&self) -> Vec<OutboundEmail> {
        lock(&self.sent).clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailerError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MailerError::transport("smtp relay unreachable"));
        }
        lock(&self.sent).push(email);
        Ok(())
    }
}
