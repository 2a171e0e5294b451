//! Client-facing email rendering.
//!
//! The workflow engine hands the mailer port pre-rendered HTML for four
//! message kinds: order-status-changed, milestone-ready-for-approval,
//! invoice-sent, and portal-access-token. Rendering is plain string
//! assembly; layout and branding stay out of the core.

use chrono::NaiveDate;

use super::ports::OutboundEmail;

/// Format minor units as a decimal amount, e.g. `1500` → `15.00`.
#[must_use]
pub fn format_amount(minor_units: i64) -> String {
    let sign = if minor_units < 0 { "-" } else { "" };
    let absolute = minor_units.unsigned_abs();
    format!("{sign}{}.{:02}", absolute / 100, absolute % 100)
}

fn wrap(title: &str, body: &str) -> String {
    format!(
        "<html><body><h2>{title}</h2>{body}\
         <p>— ITL OrderFlow</p></body></html>"
    )
}

/// Order status changed, sent when the destination status notifies clients.
#[must_use]
pub fn order_status_changed(
    to: &str,
    client_name: &str,
    order_number: &str,
    status_name: &str,
) -> OutboundEmail {
    OutboundEmail {
        to: to.to_owned(),
        subject: format!("Order {order_number}: status update"),
        html: wrap(
            "Order status update",
            &format!(
                "<p>Hello {client_name},</p>\
                 <p>Your order <strong>{order_number}</strong> has moved to \
                 <strong>{status_name}</strong>.</p>"
            ),
        ),
    }
}

/// Milestone completed and awaiting the client's review.
#[must_use]
pub fn milestone_ready_for_review(
    to: &str,
    client_name: &str,
    order_number: &str,
    milestone_title: &str,
) -> OutboundEmail {
    OutboundEmail {
        to: to.to_owned(),
        subject: format!("Order {order_number}: milestone ready for your review"),
        html: wrap(
            "Milestone ready for review",
            &format!(
                "<p>Hello {client_name},</p>\
                 <p>The milestone <strong>{milestone_title}</strong> on order \
                 <strong>{order_number}</strong> is complete and awaiting your \
                 approval.</p>"
            ),
        ),
    }
}

/// Invoice dispatched to the client.
#[must_use]
pub fn invoice_sent(
    to: &str,
    client_name: &str,
    invoice_number: &str,
    total: i64,
    due_date: Option<NaiveDate>,
) -> OutboundEmail {
    let due_line = due_date.map_or(String::new(), |due| {
        format!("<p>Payment is due by <strong>{due}</strong>.</p>")
    });
    OutboundEmail {
        to: to.to_owned(),
        subject: format!("Invoice {invoice_number}"),
        html: wrap(
            "New invoice",
            &format!(
                "<p>Hello {client_name},</p>\
                 <p>Invoice <strong>{invoice_number}</strong> for \
                 <strong>{}</strong> has been issued.</p>{due_line}",
                format_amount(total)
            ),
        ),
    }
}

/// Portal access token delivery; the token exists only in this message.
#[must_use]
pub fn portal_access_token(to: &str, client_name: &str, token: &str) -> OutboundEmail {
    OutboundEmail {
        to: to.to_owned(),
        subject: "Your client portal access".to_owned(),
        html: wrap(
            "Client portal access",
            &format!(
                "<p>Hello {client_name},</p>\
                 <p>Use this access token to sign in to your portal:</p>\
                 <p><code>{token}</code></p>\
                 <p>Keep it private; anyone holding the token can view your \
                 orders and invoices.</p>"
            ),
        ),
    }
}
