//! End-to-end workflow scenarios over the in-memory adapters.
//!
//! These tests drive the workflow services exactly as the HTTP layer does,
//! asserting the cross-entity effects: counter allocation, history
//! appends, notification fan-out, and billing arithmetic.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use orderflow::domain::billing::{InvoiceDraft, PaymentDraft};
use orderflow::domain::billing_workflow::BillingWorkflowService;
use orderflow::domain::directory::{Client, StaffMember};
use orderflow::domain::milestone_workflow::MilestoneWorkflowService;
use orderflow::domain::numbering::{DocumentKind, DocumentNumberService};
use orderflow::domain::order_workflow::OrderWorkflowService;
use orderflow::domain::orders::{OrderDraft, OrderStatus};
use orderflow::domain::recipients::NotificationFanOut;
use orderflow::domain::status::{
    InvoiceStatus, MilestoneStatus, NotificationKind, OrderPriority, StaffRole,
};
use orderflow::test_support::{InMemoryStore, RecordingMailer};

struct World {
    store: Arc<InMemoryStore>,
    mailer: Arc<RecordingMailer>,
    orders: OrderWorkflowService,
    milestones: MilestoneWorkflowService,
    billing: BillingWorkflowService,
    numbering: DocumentNumberService,
}

fn world() -> World {
    let store = Arc::new(InMemoryStore::new());
    let mailer = Arc::new(RecordingMailer::new());
    let fan_out = NotificationFanOut::new(Arc::clone(&store) as _, Arc::clone(&store) as _);
    let numbering = DocumentNumberService::new(Arc::clone(&store) as _);

    let orders = OrderWorkflowService::new(
        Arc::clone(&store) as _,
        Arc::clone(&store) as _,
        Arc::clone(&store) as _,
        fan_out.clone(),
        Arc::clone(&mailer) as _,
        numbering.clone(),
    );
    let milestones = MilestoneWorkflowService::new(
        Arc::clone(&store) as _,
        Arc::clone(&store) as _,
        Arc::clone(&store) as _,
        fan_out.clone(),
        Arc::clone(&mailer) as _,
    );
    let billing = BillingWorkflowService::new(
        Arc::clone(&store) as _,
        Arc::clone(&store) as _,
        fan_out,
        Arc::clone(&mailer) as _,
        numbering.clone(),
    );

    World {
        store,
        mailer,
        orders,
        milestones,
        billing,
        numbering,
    }
}

fn seed_client(world: &World, email: Option<&str>) -> Uuid {
    let id = Uuid::new_v4();
    world.store.insert_client(Client {
        id,
        name: "Acme Networks".into(),
        email: email.map(str::to_owned),
        portal_token_digest: None,
    });
    id
}

fn seed_admin(world: &World) -> Uuid {
    let id = Uuid::new_v4();
    world.store.insert_staff(StaffMember {
        id,
        email: format!("{id}@example.com"),
        display_name: "Admin".into(),
        role: StaffRole::Admin,
        is_active: true,
    });
    id
}

fn seed_status(world: &World, name: &str, initial: bool, notify_client: bool) -> OrderStatus {
    let status = OrderStatus {
        id: Uuid::new_v4(),
        code: name.to_lowercase().replace(' ', "-"),
        name: name.to_owned(),
        color: "#444444".into(),
        position: 0,
        is_initial: initial,
        is_final: false,
        notify_client,
        is_active: true,
    };
    world.store.insert_order_status(status.clone());
    status
}

#[tokio::test]
async fn invoice_is_settled_by_two_payments() {
    let world = world();
    let client_id = seed_client(&world, None);

    let invoice = world
        .billing
        .create_invoice(InvoiceDraft {
            client_id,
            order_id: None,
            total: 1500,
            due_date: None,
        })
        .await
        .expect("invoice created");

    let date = NaiveDate::from_ymd_opt(2026, 8, 6).expect("valid date");
    world
        .billing
        .record_payment(
            invoice.id,
            PaymentDraft {
                amount: 600,
                payment_method: "bank_transfer".into(),
                reference: None,
                payment_date: date,
            },
        )
        .await
        .expect("first payment");

    let mid = world.store.invoice(invoice.id).expect("invoice");
    assert_eq!(mid.status, InvoiceStatus::PartiallyPaid);
    assert_eq!(mid.paid_amount, 600);
    assert_eq!(mid.paid_at, None);

    world
        .billing
        .record_payment(
            invoice.id,
            PaymentDraft {
                amount: 900,
                payment_method: "bank_transfer".into(),
                reference: None,
                payment_date: date,
            },
        )
        .await
        .expect("second payment");

    let settled = world.store.invoice(invoice.id).expect("invoice");
    assert_eq!(settled.status, InvoiceStatus::Paid);
    assert_eq!(settled.paid_amount, 1500);
    assert!(settled.paid_at.is_some());
    assert_eq!(world.store.payments().len(), 2);
}

#[tokio::test]
async fn sequential_numbers_are_gapless_and_the_counter_advances() {
    let world = world();

    let first = world
        .numbering
        .next_number(DocumentKind::Order)
        .await
        .expect("first number");
    let second = world
        .numbering
        .next_number(DocumentKind::Order)
        .await
        .expect("second number");

    assert!(first.ends_with("-001"), "got {first}");
    assert!(second.ends_with("-002"), "got {second}");
    assert_eq!(world.store.counters().next_order_number, 3);
}

#[tokio::test]
async fn concurrent_allocations_yield_distinct_numbers() {
    let world = world();

    let mut handles = Vec::new();
    for _ in 0..20 {
        let numbering = world.numbering.clone();
        handles.push(tokio::spawn(async move {
            numbering.next_number(DocumentKind::Invoice).await
        }));
    }

    let mut numbers = Vec::new();
    for handle in handles {
        numbers.push(
            handle
                .await
                .expect("task joins")
                .expect("allocation succeeds"),
        );
    }

    let distinct: std::collections::HashSet<_> = numbers.iter().cloned().collect();
    assert_eq!(distinct.len(), 20);
    assert_eq!(world.store.counters().next_invoice_number, 21);
}

#[tokio::test]
async fn order_lifecycle_notifies_staff_and_client() {
    let world = world();
    let client_id = seed_client(&world, Some("it@acme.example"));
    seed_admin(&world);
    seed_admin(&world);
    seed_status(&world, "New", true, false);
    let done = seed_status(&world, "Done", false, true);

    let order = world
        .orders
        .create(OrderDraft {
            client_id,
            manager_id: None,
            priority: OrderPriority::High,
            deadline: None,
        })
        .await
        .expect("order created");

    world
        .orders
        .set_status(order.id, done.id, None)
        .await
        .expect("status changed");

    // One STATUS notification per admin, plus the client email for the
    // notify_client destination status.
    let notifications = world.store.notifications();
    assert_eq!(notifications.len(), 2);
    assert!(
        notifications
            .iter()
            .all(|n| n.kind == NotificationKind::Status)
    );
    assert_eq!(world.store.history().len(), 1);
    let sent = world.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "it@acme.example");
}

#[tokio::test]
async fn milestone_approval_round_trip() {
    let world = world();
    let client_id = seed_client(&world, Some("pm@acme.example"));
    seed_status(&world, "New", true, false);
    let order = world
        .orders
        .create(OrderDraft {
            client_id,
            manager_id: None,
            priority: OrderPriority::Medium,
            deadline: None,
        })
        .await
        .expect("order created");

    let milestone = orderflow::domain::milestones::Milestone {
        id: Uuid::new_v4(),
        order_id: order.id,
        title: "Network audit".into(),
        status: MilestoneStatus::InProgress,
        requires_approval: true,
        due_date: None,
        completed_at: None,
        client_approved_at: None,
    };
    world.store.insert_milestone(milestone.clone());

    world
        .milestones
        .set_status(milestone.id, MilestoneStatus::Completed)
        .await
        .expect("completed");
    let completed = world.store.milestone(milestone.id).expect("milestone");
    assert!(completed.completed_at.is_some());
    assert_eq!(world.mailer.sent().len(), 1, "review email dispatched");

    world
        .milestones
        .set_status(milestone.id, MilestoneStatus::Approved)
        .await
        .expect("approved");
    let approved = world.store.milestone(milestone.id).expect("milestone");
    assert!(approved.completed_at.is_some());
    assert!(approved.client_approved_at.is_some());

    // "Request changes" reopens and clears both stamps.
    world
        .milestones
        .set_status(milestone.id, MilestoneStatus::InProgress)
        .await
        .expect("reopened");
    let reopened = world.store.milestone(milestone.id).expect("milestone");
    assert_eq!(reopened.completed_at, None);
    assert_eq!(reopened.client_approved_at, None);
}
