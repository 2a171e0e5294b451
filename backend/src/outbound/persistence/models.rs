//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations; repositories convert them
//! into validated domain values.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    clients, invoices, milestones, notifications, order_status_history, order_statuses, orders,
    payments, proposals, staff, tasks, tickets,
};

/// Row struct for reading from the clients table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = clients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ClientRow {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub portal_token_digest: Option<String>,
    #[expect(dead_code, reason = "schema field read for completeness; audit only")]
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the staff table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = staff)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StaffRow {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub password_hash: String,
    pub is_active: bool,
    #[expect(dead_code, reason = "schema field read for completeness; audit only")]
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the order status reference table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = order_statuses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderStatusRow {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub color: String,
    pub position: i32,
    pub is_initial: bool,
    pub is_final: bool,
    pub notify_client: bool,
    pub is_active: bool,
}

/// Row struct for reading from the orders table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub id: Uuid,
    pub number: String,
    pub client_id: Uuid,
    pub manager_id: Option<Uuid>,
    pub status_id: Uuid,
    pub priority: String,
    pub deadline: Option<NaiveDate>,
    pub actual_start_date: Option<DateTime<Utc>>,
    pub actual_end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating order records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub(crate) struct NewOrderRow<'a> {
    pub id: Uuid,
    pub number: &'a str,
    pub client_id: Uuid,
    pub manager_id: Option<Uuid>,
    pub status_id: Uuid,
    pub priority: &'a str,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for appending to the status history log.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = order_status_history)]
pub(crate) struct NewOrderStatusHistoryRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub to_status_id: Uuid,
    pub changed_by: Option<Uuid>,
}

/// Row struct for reading from the milestones table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = milestones)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MilestoneRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub title: String,
    pub status: String,
    pub requires_approval: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub client_approved_at: Option<DateTime<Utc>>,
}

/// Changeset applying a milestone transition; `None` clears the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = milestones)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct MilestoneStatusUpdate<'a> {
    pub status: &'a str,
    pub completed_at: Option<DateTime<Utc>>,
    pub client_approved_at: Option<DateTime<Utc>>,
}

/// Row struct for reading from the tasks table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TaskRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub title: String,
    pub status: String,
    pub assignee_id: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Row struct for reading from the invoices table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = invoices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct InvoiceRow {
    pub id: Uuid,
    pub number: String,
    pub client_id: Uuid,
    pub order_id: Option<Uuid>,
    pub status: String,
    pub total: i64,
    pub paid_amount: i64,
    pub due_date: Option<NaiveDate>,
    pub paid_at: Option<DateTime<Utc>>,
}

/// Insertable struct for creating invoice records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = invoices)]
pub(crate) struct NewInvoiceRow<'a> {
    pub id: Uuid,
    pub number: &'a str,
    pub client_id: Uuid,
    pub order_id: Option<Uuid>,
    pub status: &'a str,
    pub total: i64,
    pub paid_amount: i64,
    pub due_date: Option<NaiveDate>,
}

/// Changeset applying a payment's recomputed invoice fields.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = invoices)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct InvoicePaymentChangeset<'a> {
    pub status: &'a str,
    pub paid_amount: i64,
    pub paid_at: Option<DateTime<Utc>>,
}

/// Insertable struct for appending to the payments log.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub(crate) struct NewPaymentRow<'a> {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub amount: i64,
    pub payment_method: &'a str,
    pub reference: Option<&'a str>,
    pub payment_date: NaiveDate,
}

/// Row struct for reading from the proposals table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = proposals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProposalRow {
    pub id: Uuid,
    pub number: String,
    pub client_id: Uuid,
    pub status: String,
    pub sent_at: Option<DateTime<Utc>>,
    pub viewed_at: Option<DateTime<Utc>>,
    pub responded_at: Option<DateTime<Utc>>,
}

/// Insertable struct for creating proposal records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = proposals)]
pub(crate) struct NewProposalRow<'a> {
    pub id: Uuid,
    pub number: &'a str,
    pub client_id: Uuid,
    pub status: &'a str,
}

/// Changeset applying a proposal transition; stamps are set-only, so
/// `None` fields are skipped rather than written as NULL.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = proposals)]
pub(crate) struct ProposalStatusUpdate<'a> {
    pub status: &'a str,
    pub sent_at: Option<DateTime<Utc>>,
    pub viewed_at: Option<DateTime<Utc>>,
    pub responded_at: Option<DateTime<Utc>>,
}

/// Row struct for reading from the tickets table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tickets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TicketRow {
    pub id: Uuid,
    pub client_id: Uuid,
    pub subject: String,
    pub status: String,
    pub resolved_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

/// Changeset applying a ticket transition; `None` clears the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tickets)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct TicketStatusUpdate<'a> {
    pub status: &'a str,
    pub resolved_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

/// Insertable struct for creating notification rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub link_url: Option<&'a str>,
    pub entity_type: &'a str,
    pub entity_id: Uuid,
}
