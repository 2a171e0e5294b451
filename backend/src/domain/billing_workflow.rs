//! Invoice payment recording and status workflow.
//!
//! Recording a payment inserts the payment row and recomputes the parent
//! invoice's `paid_amount`, `status`, and `paid_at` as one store
//! transaction: both writes commit or neither does. The staff notification
//! afterwards is best-effort. `paid_amount` is deliberately not capped at
//! `total`; overpayment leaves the invoice `Paid` with the excess visible.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use super::billing::{Invoice, InvoiceDraft, InvoicePaymentUpdate, PaymentDraft};
use super::error::{ApiResult, Error};
use super::messages::{self, format_amount};
use super::notifications::NotificationMessage;
use super::numbering::{DocumentKind, DocumentNumberService};
use super::ports::{ClientDirectory, InvoiceRepository, Mailer};
use super::recipients::NotificationFanOut;
use super::status::{EntityKind, InvoiceStatus, NotificationKind};

/// Drives invoice creation, payment recording, and status transitions.
#[derive(Clone)]
pub struct BillingWorkflowService {
    invoices: Arc<dyn InvoiceRepository>,
    clients: Arc<dyn ClientDirectory>,
    fan_out: NotificationFanOut,
    mailer: Arc<dyn Mailer>,
    numbering: DocumentNumberService,
}

impl BillingWorkflowService {
    /// Create the service over its driven ports.
    pub fn new(
        invoices: Arc<dyn InvoiceRepository>,
        clients: Arc<dyn ClientDirectory>,
        fan_out: NotificationFanOut,
        mailer: Arc<dyn Mailer>,
        numbering: DocumentNumberService,
    ) -> Self {
        Self {
            invoices,
            clients,
            fan_out,
            mailer,
            numbering,
        }
    }

    /// Create a draft invoice with a freshly allocated number.
    ///
    /// A counter failure aborts the whole operation before anything is
    /// persisted.
    pub async fn create_invoice(&self, draft: InvoiceDraft) -> ApiResult<Invoice> {
        if draft.total <= 0 {
            return Err(Error::invalid_request(
                "invoice total must be a positive number of minor units",
            ));
        }

        let client_exists = self
            .clients
            .find(draft.client_id)
            .await
            .map_err(|err| err.into_domain("client directory"))?
            .is_some();
        if !client_exists {
            return Err(Error::not_found(format!(
                "client {} not found",
                draft.client_id
            )));
        }

        let number = self.numbering.next_number(DocumentKind::Invoice).await?;
        let invoice = Invoice {
            id: Uuid::new_v4(),
            number,
            client_id: draft.client_id,
            order_id: draft.order_id,
            status: InvoiceStatus::Draft,
            total: draft.total,
            paid_amount: 0,
            due_date: draft.due_date,
            paid_at: None,
        };

        self.invoices
            .insert(&invoice)
            .await
            .map_err(|err| err.into_domain("invoice repository"))?;

        Ok(invoice)
    }

    /// Record a received payment against an invoice.
    ///
    /// The payment insert and the invoice recompute are one atomic unit;
    /// the staff notification afterwards is best-effort and never fails
    /// the recording.
    pub async fn record_payment(&self, invoice_id: Uuid, draft: PaymentDraft) -> ApiResult<()> {
        if draft.amount <= 0 {
            return Err(Error::invalid_request(
                "payment amount must be a positive number of minor units",
            ));
        }

        let invoice = self.find_invoice(invoice_id).await?;
        let paid_amount = invoice.paid_amount + draft.amount;
        let status = invoice.status_for_paid_amount(paid_amount);
        let update = InvoicePaymentUpdate {
            paid_amount,
            status,
            paid_at: if status == InvoiceStatus::Paid {
                Some(Utc::now())
            } else {
                invoice.paid_at
            },
        };

        self.invoices
            .record_payment(invoice_id, &draft, update)
            .await
            .map_err(|err| err.into_domain("invoice repository"))?;

        let message = NotificationMessage {
            kind: NotificationKind::Payment,
            title: "Payment received".to_owned(),
            description: format!(
                "{}: {} received, invoice is now {}",
                invoice.number,
                format_amount(draft.amount),
                status.label()
            ),
            link_url: Some(format!("/invoices/{}", invoice.id)),
            entity_type: EntityKind::Invoice,
            entity_id: invoice.id,
        };
        if let Err(error) = self.notify_staff(&message).await {
            warn!(invoice = %invoice.number, %error, "payment notification failed");
        }

        Ok(())
    }

    /// Assign a new invoice status.
    ///
    /// Staff are notified of the change; moving to `Sent` additionally
    /// triggers the invoice email flow, which re-writes `Sent`; the
    /// idempotent double-write is tolerated.
    pub async fn set_status(&self, invoice_id: Uuid, status: InvoiceStatus) -> ApiResult<()> {
        let invoice = self.find_invoice(invoice_id).await?;

        self.invoices
            .set_status(invoice_id, status)
            .await
            .map_err(|err| err.into_domain("invoice repository"))?;

        let message = NotificationMessage {
            kind: NotificationKind::Status,
            title: "Invoice status updated".to_owned(),
            description: format!(
                "{}: {} → {}",
                invoice.number,
                invoice.status.label(),
                status.label()
            ),
            link_url: Some(format!("/invoices/{}", invoice.id)),
            entity_type: EntityKind::Invoice,
            entity_id: invoice.id,
        };
        self.notify_staff(&message).await?;

        if status == InvoiceStatus::Sent {
            self.dispatch_invoice(&invoice).await?;
        }

        Ok(())
    }

    async fn find_invoice(&self, invoice_id: Uuid) -> ApiResult<Invoice> {
        self.invoices
            .find(invoice_id)
            .await
            .map_err(|err| err.into_domain("invoice repository"))?
            .ok_or_else(|| Error::not_found(format!("invoice {invoice_id} not found")))
    }

    async fn notify_staff(&self, message: &NotificationMessage) -> ApiResult<usize> {
        let recipients = self.fan_out.staff_recipients().await?;
        self.fan_out.notify(&recipients, message).await
    }

    /// Email the invoice to its client (best-effort) and re-write `Sent`.
    async fn dispatch_invoice(&self, invoice: &Invoice) -> ApiResult<()> {
        let client = self
            .clients
            .find(invoice.client_id)
            .await
            .map_err(|err| err.into_domain("client directory"))?;

        let target = client.and_then(|c| {
            let address = c.email.clone()?;
            Some((c, address))
        });
        match target {
            Some((client, address)) => {
                let email = messages::invoice_sent(
                    &address,
                    &client.name,
                    &invoice.number,
                    invoice.total,
                    invoice.due_date,
                );
                if let Err(error) = self.mailer.send(email).await {
                    warn!(invoice = %invoice.number, %error, "invoice email failed");
                }
            }
            None => {
                warn!(invoice = %invoice.number, "client has no email, invoice not sent");
            }
        }

        // The send flow stamps the status again; a second identical write.
        self.invoices
            .set_status(invoice.id, InvoiceStatus::Sent)
            .await
            .map_err(|err| err.into_domain("invoice repository"))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::directory::{Client, StaffMember};
    use crate::domain::status::StaffRole;
    use crate::test_support::{InMemoryStore, RecordingMailer};

    struct Fixture {
        store: Arc<InMemoryStore>,
        mailer: Arc<RecordingMailer>,
        service: BillingWorkflowService,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let mailer = Arc::new(RecordingMailer::new());
        let fan_out = NotificationFanOut::new(Arc::clone(&store) as _, Arc::clone(&store) as _);
        let numbering = DocumentNumberService::new(Arc::clone(&store) as _);
        let service = BillingWorkflowService::new(
            Arc::clone(&store) as _,
            Arc::clone(&store) as _,
            fan_out,
            Arc::clone(&mailer) as _,
            numbering,
        );
        Fixture {
            store,
            mailer,
            service,
        }
    }

    fn seed_invoice(fixture: &Fixture, total: i64, paid_amount: i64) -> Invoice {
        let invoice = Invoice {
            id: Uuid::new_v4(),
            number: "INV-2026-009".into(),
            client_id: Uuid::new_v4(),
            order_id: None,
            status: if paid_amount > 0 {
                InvoiceStatus::PartiallyPaid
            } else {
                InvoiceStatus::Sent
            },
            total,
            paid_amount,
            due_date: NaiveDate::from_ymd_opt(2026, 9, 1),
            paid_at: None,
        };
        fixture.store.insert_invoice(invoice.clone());
        invoice
    }

    fn draft(amount: i64) -> PaymentDraft {
        PaymentDraft {
            amount,
            payment_method: "bank_transfer".into(),
            reference: Some("stmt-42".into()),
            payment_date: NaiveDate::from_ymd_opt(2026, 8, 6).expect("valid date"),
        }
    }

    #[tokio::test]
    async fn created_invoices_number_sequentially_and_start_as_draft() {
        let fixture = fixture();
        let client_id = Uuid::new_v4();
        fixture.store.insert_client(Client {
            id: client_id,
            name: "Acme".into(),
            email: None,
            portal_token_digest: None,
        });

        let draft = InvoiceDraft {
            client_id,
            order_id: None,
            total: 150_000,
            due_date: None,
        };
        let first = fixture
            .service
            .create_invoice(draft.clone())
            .await
            .expect("first invoice");
        let second = fixture
            .service
            .create_invoice(draft)
            .await
            .expect("second invoice");

        assert!(first.number.ends_with("-001"), "got {}", first.number);
        assert!(second.number.ends_with("-002"), "got {}", second.number);
        assert_eq!(first.status, InvoiceStatus::Draft);
        assert_eq!(first.paid_amount, 0);
        assert_eq!(fixture.store.counters().next_invoice_number, 3);
    }

    #[tokio::test]
    async fn counter_outage_aborts_invoice_creation() {
        let fixture = fixture();
        let client_id = Uuid::new_v4();
        fixture.store.insert_client(Client {
            id: client_id,
            name: "Acme".into(),
            email: None,
            portal_token_digest: None,
        });
        fixture.store.fail_counters();

        let error = fixture
            .service
            .create_invoice(InvoiceDraft {
                client_id,
                order_id: None,
                total: 1000,
                due_date: None,
            })
            .await
            .expect_err("counter outage aborts creation");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }

    #[tokio::test]
    async fn partial_payment_accumulates_without_stamping_paid_at() {
        let fixture = fixture();
        let invoice = seed_invoice(&fixture, 1000, 400);

        fixture
            .service
            .record_payment(invoice.id, draft(100))
            .await
            .expect("payment recorded");

        let stored = fixture.store.invoice(invoice.id).expect("invoice");
        assert_eq!(stored.paid_amount, 500);
        assert_eq!(stored.status, InvoiceStatus::PartiallyPaid);
        assert_eq!(stored.paid_at, None);
        assert_eq!(fixture.store.payments().len(), 1);
    }

    #[tokio::test]
    async fn payment_reaching_total_marks_paid_and_stamps() {
        let fixture = fixture();
        let invoice = seed_invoice(&fixture, 1000, 400);

        fixture
            .service
            .record_payment(invoice.id, draft(600))
            .await
            .expect("payment recorded");

        let stored = fixture.store.invoice(invoice.id).expect("invoice");
        assert_eq!(stored.paid_amount, 1000);
        assert_eq!(stored.status, InvoiceStatus::Paid);
        assert!(stored.paid_at.is_some());
    }

    #[tokio::test]
    async fn overpayment_is_not_capped() {
        let fixture = fixture();
        let invoice = seed_invoice(&fixture, 1000, 900);

        fixture
            .service
            .record_payment(invoice.id, draft(300))
            .await
            .expect("payment recorded");

        let stored = fixture.store.invoice(invoice.id).expect("invoice");
        assert_eq!(stored.paid_amount, 1200);
        assert_eq!(stored.status, InvoiceStatus::Paid);
    }

    #[tokio::test]
    async fn two_payments_settle_the_invoice() {
        let fixture = fixture();
        let invoice = seed_invoice(&fixture, 1500, 0);

        fixture
            .service
            .record_payment(invoice.id, draft(600))
            .await
            .expect("first payment");
        let after_first = fixture.store.invoice(invoice.id).expect("invoice");
        assert_eq!(after_first.status, InvoiceStatus::PartiallyPaid);
        assert_eq!(after_first.paid_amount, 600);

        fixture
            .service
            .record_payment(invoice.id, draft(900))
            .await
            .expect("second payment");
        let after_second = fixture.store.invoice(invoice.id).expect("invoice");
        assert_eq!(after_second.status, InvoiceStatus::Paid);
        assert_eq!(after_second.paid_amount, 1500);
        assert!(after_second.paid_at.is_some());
        assert_eq!(fixture.store.payments().len(), 2);
    }

    #[rstest]
    #[case(0)]
    #[case(-500)]
    #[tokio::test]
    async fn non_positive_amounts_are_rejected_before_any_write(#[case] amount: i64) {
        let fixture = fixture();
        let invoice = seed_invoice(&fixture, 1000, 0);

        let error = fixture
            .service
            .record_payment(invoice.id, draft(amount))
            .await
            .expect_err("invalid amount rejected");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert!(fixture.store.payments().is_empty());
        assert_eq!(
            fixture.store.invoice(invoice.id).expect("invoice").paid_amount,
            0
        );
    }

    #[tokio::test]
    async fn payment_notifies_staff_with_amount_and_status() {
        let fixture = fixture();
        fixture.store.insert_staff(StaffMember {
            id: Uuid::new_v4(),
            email: "ops@example.com".into(),
            display_name: "Ops".into(),
            role: StaffRole::Manager,
            is_active: true,
        });
        let invoice = seed_invoice(&fixture, 1000, 0);

        fixture
            .service
            .record_payment(invoice.id, draft(250))
            .await
            .expect("payment recorded");

        let notifications = fixture.store.notifications();
        assert_eq!(notifications.len(), 1);
        assert!(notifications[0].description.contains("2.50"));
        assert!(notifications[0].description.contains("Partially paid"));
    }

    #[tokio::test]
    async fn sending_an_invoice_emails_the_client() {
        let fixture = fixture();
        let invoice = seed_invoice(&fixture, 150_000, 0);
        fixture.store.insert_client(Client {
            id: invoice.client_id,
            name: "Acme".into(),
            email: Some("billing@acme.example".into()),
            portal_token_digest: None,
        });

        fixture
            .service
            .set_status(invoice.id, InvoiceStatus::Sent)
            .await
            .expect("status set");

        let sent = fixture.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].subject.contains("INV-2026-009"));
        assert!(sent[0].html.contains("1500.00"));
        assert_eq!(
            fixture.store.invoice(invoice.id).expect("invoice").status,
            InvoiceStatus::Sent
        );
    }

    #[tokio::test]
    async fn mailer_outage_does_not_fail_the_send_flow() {
        let fixture = fixture();
        let invoice = seed_invoice(&fixture, 1000, 0);
        fixture.store.insert_client(Client {
            id: invoice.client_id,
            name: "Acme".into(),
            email: Some("billing@acme.example".into()),
            portal_token_digest: None,
        });
        fixture.mailer.fail_sends();

        fixture
            .service
            .set_status(invoice.id, InvoiceStatus::Sent)
            .await
            .expect("status set despite mailer outage");

        assert_eq!(
            fixture.store.invoice(invoice.id).expect("invoice").status,
            InvoiceStatus::Sent
        );
    }

    #[tokio::test]
    async fn non_sent_statuses_do_not_email() {
        let fixture = fixture();
        let invoice = seed_invoice(&fixture, 1000, 0);
        fixture.store.insert_client(Client {
            id: invoice.client_id,
            name: "Acme".into(),
            email: Some("billing@acme.example".into()),
            portal_token_digest: None,
        });

        fixture
            .service
            .set_status(invoice.id, InvoiceStatus::Cancelled)
            .await
            .expect("status set");

        assert!(fixture.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn unknown_invoice_fails_not_found() {
        let fixture = fixture();
        let error = fixture
            .service
            .record_payment(Uuid::new_v4(), draft(100))
            .await
            .expect_err("missing invoice rejected");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
