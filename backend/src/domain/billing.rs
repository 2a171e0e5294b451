//! Invoice and payment aggregates.
//!
//! Monetary amounts are integer minor units (cents); billing arithmetic
//! never touches floating point.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::status::InvoiceStatus;

/// An invoice issued to a client.
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    /// Primary identifier.
    pub id: Uuid,
    /// Human-readable document number, e.g. `INV-2026-012`.
    pub number: String,
    /// Billed client.
    pub client_id: Uuid,
    /// Order the invoice bills, when tied to one.
    pub order_id: Option<Uuid>,
    /// Current lifecycle state.
    pub status: InvoiceStatus,
    /// Total due, in minor units.
    pub total: i64,
    /// Sum of recorded payments, in minor units. Not capped at `total`:
    /// overpayment leaves the invoice `Paid` with `paid_amount > total`.
    pub paid_amount: i64,
    /// Payment due date.
    pub due_date: Option<NaiveDate>,
    /// Stamped when the invoice becomes fully paid.
    pub paid_at: Option<DateTime<Utc>>,
}

impl Invoice {
    /// Status resulting from a cumulative paid amount.
    #[must_use]
    pub const fn status_for_paid_amount(&self, paid_amount: i64) -> InvoiceStatus {
        if paid_amount >= self.total {
            InvoiceStatus::Paid
        } else {
            InvoiceStatus::PartiallyPaid
        }
    }
}

/// An immutable record of one received payment.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    /// Primary identifier.
    pub id: Uuid,
    /// Invoice the payment settles.
    pub invoice_id: Uuid,
    /// Amount received, in minor units.
    pub amount: i64,
    /// Payment channel, free-form (e.g. `bank_transfer`).
    pub payment_method: String,
    /// External reference, e.g. a bank statement line.
    pub reference: Option<String>,
    /// Value date of the payment.
    pub payment_date: NaiveDate,
}

/// Input for creating an invoice.
///
/// The number is assigned by the workflow; new invoices start as `Draft`
/// with nothing paid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDraft {
    /// Billed client.
    pub client_id: Uuid,
    /// Order the invoice bills, when tied to one.
    pub order_id: Option<Uuid>,
    /// Total due, in minor units. Must be positive.
    pub total: i64,
    /// Payment due date.
    pub due_date: Option<NaiveDate>,
}

/// Recomputed invoice fields applied atomically with a payment insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoicePaymentUpdate {
    /// New cumulative paid amount, in minor units.
    pub paid_amount: i64,
    /// Resulting lifecycle state.
    pub status: InvoiceStatus,
    /// Stamp applied when the invoice becomes fully paid.
    pub paid_at: Option<DateTime<Utc>>,
}

/// Input for recording a payment against an invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentDraft {
    /// Amount received, in minor units. Must be positive.
    pub amount: i64,
    /// Payment channel, free-form.
    pub payment_method: String,
    /// External reference.
    pub reference: Option<String>,
    /// Value date of the payment.
    pub payment_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    fn invoice(total: i64, paid_amount: i64) -> Invoice {
        Invoice {
            id: Uuid::new_v4(),
            number: "INV-2026-001".into(),
            client_id: Uuid::new_v4(),
            order_id: None,
            status: InvoiceStatus::Sent,
            total,
            paid_amount,
            due_date: None,
            paid_at: None,
        }
    }

    #[rstest]
    #[case(1000, 400, InvoiceStatus::PartiallyPaid)]
    #[case(1000, 1000, InvoiceStatus::Paid)]
    #[case(1000, 1300, InvoiceStatus::Paid)]
    fn status_follows_paid_amount(
        #[case] total: i64,
        #[case] paid: i64,
        #[case] expected: InvoiceStatus,
    ) {
        assert_eq!(invoice(total, 0).status_for_paid_amount(paid), expected);
    }
}
