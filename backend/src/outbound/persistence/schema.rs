//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation; `diesel print-schema` can regenerate them from a live
//! database.
//!
//! Status columns are `VARCHAR` wire strings (see
//! [`crate::domain::status`]); monetary columns are `INT8` minor units.

diesel::table! {
    /// Client organisations.
    clients (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name.
        name -> Varchar,
        /// Contact address for workflow emails.
        email -> Nullable<Varchar>,
        /// SHA-256 digest of the active portal token.
        portal_token_digest -> Nullable<Varchar>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Internal staff accounts.
    staff (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login address.
        email -> Varchar,
        /// Name shown in the UI.
        display_name -> Varchar,
        /// Role wire string (`ADMIN`, `MANAGER`, `STAFF`).
        role -> Varchar,
        /// Argon2 password hash.
        password_hash -> Varchar,
        /// Inactive staff neither log in nor receive notifications.
        is_active -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Mutable order status reference data.
    order_statuses (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique slug, stable across renames.
        code -> Varchar,
        /// Display name.
        name -> Varchar,
        /// Display colour (hex string).
        color -> Varchar,
        /// UI ordering rank, advisory only.
        position -> Int4,
        /// Whether new orders start here; a singleton flag.
        is_initial -> Bool,
        /// Whether this status ends the order lifecycle.
        is_final -> Bool,
        /// Whether entering this status emails the order's client.
        notify_client -> Bool,
        /// Whether the status is currently assignable.
        is_active -> Bool,
    }
}

diesel::table! {
    /// Client engagements.
    orders (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique human-readable number, e.g. `ORD-2026-007`.
        number -> Varchar,
        /// Owning client.
        client_id -> Uuid,
        /// Responsible manager.
        manager_id -> Nullable<Uuid>,
        /// Current status row.
        status_id -> Uuid,
        /// Priority wire string.
        priority -> Varchar,
        /// Agreed delivery deadline.
        deadline -> Nullable<Date>,
        /// When work actually started.
        actual_start_date -> Nullable<Timestamptz>,
        /// When work actually ended.
        actual_end_date -> Nullable<Timestamptz>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only order status transition log.
    order_status_history (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Order the transition belongs to.
        order_id -> Uuid,
        /// Destination status row.
        to_status_id -> Uuid,
        /// Staff member who made the change.
        changed_by -> Nullable<Uuid>,
        /// Transition timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Deliverable checkpoints within orders.
    milestones (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning order.
        order_id -> Uuid,
        /// Display title.
        title -> Varchar,
        /// Status wire string.
        status -> Varchar,
        /// Whether completion requires client approval.
        requires_approval -> Bool,
        /// Due date used by the deadline sweep.
        due_date -> Nullable<Timestamptz>,
        /// Set iff the milestone is `COMPLETED`.
        completed_at -> Nullable<Timestamptz>,
        /// Set iff the milestone is `APPROVED`.
        client_approved_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Work items within orders.
    tasks (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning order.
        order_id -> Uuid,
        /// Display title.
        title -> Varchar,
        /// Status wire string.
        status -> Varchar,
        /// Assigned staff member.
        assignee_id -> Nullable<Uuid>,
        /// Due date used by the deadline sweep.
        due_date -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Invoices issued to clients.
    invoices (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique human-readable number, e.g. `INV-2026-012`.
        number -> Varchar,
        /// Billed client.
        client_id -> Uuid,
        /// Order the invoice bills.
        order_id -> Nullable<Uuid>,
        /// Status wire string.
        status -> Varchar,
        /// Total due, in minor units.
        total -> Int8,
        /// Sum of recorded payments, in minor units.
        paid_amount -> Int8,
        /// Payment due date.
        due_date -> Nullable<Date>,
        /// Set when the invoice becomes fully paid.
        paid_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Append-only payment records.
    payments (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Invoice the payment settles.
        invoice_id -> Uuid,
        /// Amount received, in minor units.
        amount -> Int8,
        /// Payment channel.
        payment_method -> Varchar,
        /// External reference.
        reference -> Nullable<Varchar>,
        /// Value date of the payment.
        payment_date -> Date,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Commercial quotes.
    proposals (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique human-readable number, e.g. `KP-2026-003`.
        number -> Varchar,
        /// Addressed client.
        client_id -> Uuid,
        /// Status wire string.
        status -> Varchar,
        /// Set when the proposal is first sent.
        sent_at -> Nullable<Timestamptz>,
        /// Set when the client first views it.
        viewed_at -> Nullable<Timestamptz>,
        /// Set when the client accepts or rejects it.
        responded_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Support desk tickets.
    tickets (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Client the ticket belongs to.
        client_id -> Uuid,
        /// Short summary line.
        subject -> Varchar,
        /// Status wire string.
        status -> Varchar,
        /// Set when the ticket is resolved.
        resolved_at -> Nullable<Timestamptz>,
        /// Set when the ticket is closed.
        closed_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Per-recipient notification rows.
    notifications (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Recipient staff member.
        user_id -> Uuid,
        /// Notification kind wire string.
        kind -> Varchar,
        /// Short headline.
        title -> Varchar,
        /// Longer description.
        description -> Text,
        /// Relative link into the UI.
        link_url -> Nullable<Varchar>,
        /// Referenced entity kind wire string.
        entity_type -> Varchar,
        /// Referenced entity identifier.
        entity_id -> Uuid,
        /// When the recipient read the notification.
        read_at -> Nullable<Timestamptz>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Singleton settings row holding the document counters.
    settings (id) {
        /// Fixed identifier, always `default`.
        id -> Varchar,
        /// Next order number to hand out.
        next_order_number -> Int4,
        /// Next invoice number to hand out.
        next_invoice_number -> Int4,
        /// Next proposal number to hand out.
        next_proposal_number -> Int4,
        /// Order number prefix.
        order_prefix -> Varchar,
        /// Invoice number prefix.
        invoice_prefix -> Varchar,
        /// Proposal number prefix.
        proposal_prefix -> Varchar,
    }
}
