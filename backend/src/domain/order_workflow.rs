//! Order status workflow.
//!
//! Order statuses form a free graph: any status row may follow any other,
//! and the `position` rank is advisory UI ordering only. A transition
//! updates the order, appends one history record, fans out staff
//! notifications, and emails the client when the destination row says so.
//! The email is best-effort: its failure never rolls back or fails the
//! transition.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use chrono::Utc;

use super::error::{ApiResult, Error};
use super::messages;
use super::notifications::NotificationMessage;
use super::numbering::{DocumentKind, DocumentNumberService};
use super::orders::{Order, OrderDraft, OrderStatusChange};
use super::ports::{ClientDirectory, Mailer, OrderRepository, OrderStatusRepository};
use super::recipients::NotificationFanOut;
use super::status::{EntityKind, NotificationKind};

/// Drives order creation, status transitions, and their side effects.
#[derive(Clone)]
pub struct OrderWorkflowService {
    orders: Arc<dyn OrderRepository>,
    statuses: Arc<dyn OrderStatusRepository>,
    clients: Arc<dyn ClientDirectory>,
    fan_out: NotificationFanOut,
    mailer: Arc<dyn Mailer>,
    numbering: DocumentNumberService,
}

impl OrderWorkflowService {
    /// Create the service over its driven ports.
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        statuses: Arc<dyn OrderStatusRepository>,
        clients: Arc<dyn ClientDirectory>,
        fan_out: NotificationFanOut,
        mailer: Arc<dyn Mailer>,
        numbering: DocumentNumberService,
    ) -> Self {
        Self {
            orders,
            statuses,
            clients,
            fan_out,
            mailer,
            numbering,
        }
    }

    /// Create an order with a freshly allocated number and the configured
    /// initial status.
    ///
    /// A counter failure aborts the whole operation before anything is
    /// persisted, so no number is ever burned on an order that does not
    /// exist.
    pub async fn create(&self, draft: OrderDraft) -> ApiResult<Order> {
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

        let initial = self
            .statuses
            .find_initial()
            .await
            .map_err(|err| err.into_domain("order status repository"))?
            .ok_or_else(|| Error::internal("no initial order status is configured"))?;

        let number = self.numbering.next_number(DocumentKind::Order).await?;
        let order = Order {
            id: Uuid::new_v4(),
            number,
            client_id: draft.client_id,
            manager_id: draft.manager_id,
            status_id: initial.id,
            priority: draft.priority,
            deadline: draft.deadline,
            actual_start_date: None,
            actual_end_date: None,
            created_at: Utc::now(),
        };

        self.orders
            .insert(&order)
            .await
            .map_err(|err| err.into_domain("order repository"))?;

        Ok(order)
    }

    /// Flag a status row as the one new orders start in.
    ///
    /// The flag is a singleton: the store clears it on every other row in
    /// the same operation.
    pub async fn mark_status_initial(&self, status_id: Uuid) -> ApiResult<()> {
        let exists = self
            .statuses
            .find(status_id)
            .await
            .map_err(|err| err.into_domain("order status repository"))?
            .is_some();
        if !exists {
            return Err(Error::not_found(format!(
                "order status {status_id} not found"
            )));
        }

        self.statuses
            .mark_initial(status_id)
            .await
            .map_err(|err| err.into_domain("order status repository"))
    }

    /// Move an order to a new status row.
    ///
    /// Effects, in order: update the status foreign key, append one
    /// history record, create one `STATUS` notification per recipient,
    /// and email the client when the destination row carries
    /// `notify_client`. Fails `not_found` when the order or the
    /// destination status does not resolve.
    pub async fn set_status(
        &self,
        order_id: Uuid,
        new_status_id: Uuid,
        actor: Option<Uuid>,
    ) -> ApiResult<()> {
        let order = self
            .orders
            .find(order_id)
            .await
            .map_err(|err| err.into_domain("order repository"))?
            .ok_or_else(|| Error::not_found(format!("order {order_id} not found")))?;

        let new_status = self
            .statuses
            .find(new_status_id)
            .await
            .map_err(|err| err.into_domain("order status repository"))?
            .ok_or_else(|| Error::not_found(format!("order status {new_status_id} not found")))?;

        // The previous status row may have been deleted from the reference
        // data; the transition still proceeds with a placeholder label.
        let old_label = self
            .statuses
            .find(order.status_id)
            .await
            .map_err(|err| err.into_domain("order status repository"))?
            .map_or_else(|| "unknown".to_owned(), |status| status.name);

        self.orders
            .set_status(&OrderStatusChange {
                order_id,
                to_status_id: new_status_id,
                changed_by: actor,
            })
            .await
            .map_err(|err| err.into_domain("order repository"))?;

        let recipients = self.fan_out.order_recipients(&order).await?;
        let message = NotificationMessage {
            kind: NotificationKind::Status,
            title: "Order status updated".to_owned(),
            description: format!("{}: {} → {}", order.number, old_label, new_status.name),
            link_url: Some(format!("/orders/{}", order.id)),
            entity_type: EntityKind::Order,
            entity_id: order.id,
        };
        self.fan_out.notify(&recipients, &message).await?;

        if new_status.notify_client {
            self.email_client(&order, &new_status.name).await;
        }

        Ok(())
    }

    /// Best-effort client email; failures are logged and swallowed.
    async fn email_client(&self, order: &super::orders::Order, status_name: &str) {
        let client = match self.clients.find(order.client_id).await {
            Ok(Some(client)) => client,
            Ok(None) => {
                warn!(order = %order.number, "client missing, skipping status email");
                return;
            }
            Err(error) => {
                warn!(order = %order.number, %error, "client lookup failed, skipping status email");
                return;
            }
        };

        let Some(address) = client.email.as_deref() else {
            return;
        };

        let email = messages::order_status_changed(address, &client.name, &order.number, status_name);
        if let Err(error) = self.mailer.send(email).await {
            warn!(order = %order.number, %error, "order status email failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::directory::{Client, StaffMember};
    use crate::domain::orders::{Order, OrderStatus};
    use crate::domain::status::{OrderPriority, StaffRole};
    use crate::test_support::{InMemoryStore, RecordingMailer};

    struct Fixture {
        store: Arc<InMemoryStore>,
        mailer: Arc<RecordingMailer>,
        service: OrderWorkflowService,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let mailer = Arc::new(RecordingMailer::new());
        let fan_out = NotificationFanOut::new(Arc::clone(&store) as _, Arc::clone(&store) as _);
        let numbering = DocumentNumberService::new(Arc::clone(&store) as _);
        let service = OrderWorkflowService::new(
            Arc::clone(&store) as _,
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

    fn status(name: &str, notify_client: bool) -> OrderStatus {
        OrderStatus {
            id: Uuid::new_v4(),
            code: name.to_lowercase().replace(' ', "-"),
            name: name.to_owned(),
            color: "#888888".into(),
            position: 0,
            is_initial: false,
            is_final: false,
            notify_client,
            is_active: true,
        }
    }

    fn admin() -> StaffMember {
        let id = Uuid::new_v4();
        StaffMember {
            id,
            email: format!("{id}@example.com"),
            display_name: "Admin".into(),
            role: StaffRole::Admin,
            is_active: true,
        }
    }

    fn seed_order(fixture: &Fixture, manager_id: Option<Uuid>, status_id: Uuid) -> Order {
        let order = Order {
            id: Uuid::new_v4(),
            number: "ORD-2026-001".into(),
            client_id: Uuid::new_v4(),
            manager_id,
            status_id,
            priority: OrderPriority::High,
            deadline: None,
            actual_start_date: None,
            actual_end_date: None,
            created_at: Utc::now(),
        };
        fixture.store.insert_order(order.clone());
        order
    }

    #[tokio::test]
    async fn create_allocates_number_and_initial_status() {
        let fixture = fixture();
        let mut initial = status("New", false);
        initial.is_initial = true;
        fixture.store.insert_order_status(initial.clone());
        let client_id = Uuid::new_v4();
        fixture.store.insert_client(Client {
            id: client_id,
            name: "Acme".into(),
            email: None,
            portal_token_digest: None,
        });

        let first = fixture
            .service
            .create(OrderDraft {
                client_id,
                manager_id: None,
                priority: OrderPriority::Medium,
                deadline: None,
            })
            .await
            .expect("first order created");
        let second = fixture
            .service
            .create(OrderDraft {
                client_id,
                manager_id: None,
                priority: OrderPriority::Medium,
                deadline: None,
            })
            .await
            .expect("second order created");

        assert!(first.number.ends_with("-001"), "got {}", first.number);
        assert!(second.number.ends_with("-002"), "got {}", second.number);
        assert_eq!(first.status_id, initial.id);
        assert_eq!(fixture.store.counters().next_order_number, 3);
        assert!(fixture.store.order(first.id).is_some());
    }

    #[tokio::test]
    async fn create_without_initial_status_fails_before_allocating() {
        let fixture = fixture();
        let client_id = Uuid::new_v4();
        fixture.store.insert_client(Client {
            id: client_id,
            name: "Acme".into(),
            email: None,
            portal_token_digest: None,
        });

        let error = fixture
            .service
            .create(OrderDraft {
                client_id,
                manager_id: None,
                priority: OrderPriority::Low,
                deadline: None,
            })
            .await
            .expect_err("no initial status configured");

        assert_eq!(error.code(), ErrorCode::InternalError);
        assert_eq!(fixture.store.counters().next_order_number, 1);
    }

    #[tokio::test]
    async fn create_aborts_when_the_counter_store_fails() {
        let fixture = fixture();
        let mut initial = status("New", false);
        initial.is_initial = true;
        fixture.store.insert_order_status(initial);
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
            .create(OrderDraft {
                client_id,
                manager_id: None,
                priority: OrderPriority::Low,
                deadline: None,
            })
            .await
            .expect_err("counter outage aborts creation");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }

    #[tokio::test]
    async fn marking_initial_clears_the_flag_elsewhere() {
        let fixture = fixture();
        let mut old_initial = status("New", false);
        old_initial.is_initial = true;
        let next_initial = status("Intake", false);
        fixture.store.insert_order_status(old_initial.clone());
        fixture.store.insert_order_status(next_initial.clone());

        fixture
            .service
            .mark_status_initial(next_initial.id)
            .await
            .expect("flag moves");

        assert!(
            fixture
                .store
                .order_status(next_initial.id)
                .expect("status")
                .is_initial
        );
        assert!(
            !fixture
                .store
                .order_status(old_initial.id)
                .expect("status")
                .is_initial
        );
    }

    #[tokio::test]
    async fn marking_initial_rejects_unknown_rows() {
        let fixture = fixture();
        let error = fixture
            .service
            .mark_status_initial(Uuid::new_v4())
            .await
            .expect_err("missing status rejected");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn transition_updates_order_and_appends_history() {
        let fixture = fixture();
        let from = status("New", false);
        let to = status("In work", false);
        fixture.store.insert_order_status(from.clone());
        fixture.store.insert_order_status(to.clone());
        let order = seed_order(&fixture, None, from.id);
        let actor = Uuid::new_v4();

        fixture
            .service
            .set_status(order.id, to.id, Some(actor))
            .await
            .expect("transition succeeds");

        let stored = fixture.store.order(order.id).expect("order exists");
        assert_eq!(stored.status_id, to.id);
        let history = fixture.store.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].order_id, order.id);
        assert_eq!(history[0].to_status_id, to.id);
        assert_eq!(history[0].changed_by, Some(actor));
    }

    #[tokio::test]
    async fn two_admins_receive_one_notification_each() {
        let fixture = fixture();
        let from = status("New", false);
        let to = status("In work", false);
        fixture.store.insert_order_status(from.clone());
        fixture.store.insert_order_status(to.clone());
        fixture.store.insert_staff(admin());
        fixture.store.insert_staff(admin());
        let order = seed_order(&fixture, None, from.id);

        fixture
            .service
            .set_status(order.id, to.id, None)
            .await
            .expect("transition succeeds");

        let notifications = fixture.store.notifications();
        assert_eq!(notifications.len(), 2);
        assert!(
            notifications
                .iter()
                .all(|n| n.description.contains("New") && n.description.contains("In work"))
        );
    }

    #[tokio::test]
    async fn manager_and_admin_are_deduplicated() {
        let fixture = fixture();
        let from = status("New", false);
        let to = status("In work", false);
        fixture.store.insert_order_status(from.clone());
        fixture.store.insert_order_status(to.clone());
        let manager = admin();
        fixture.store.insert_staff(manager.clone());
        fixture.store.insert_staff(admin());
        let order = seed_order(&fixture, Some(manager.id), from.id);

        fixture
            .service
            .set_status(order.id, to.id, None)
            .await
            .expect("transition succeeds");

        assert_eq!(fixture.store.notifications().len(), 2);
    }

    #[tokio::test]
    async fn notify_client_status_emails_the_client() {
        let fixture = fixture();
        let from = status("New", false);
        let to = status("Done", true);
        fixture.store.insert_order_status(from.clone());
        fixture.store.insert_order_status(to.clone());
        let order = seed_order(&fixture, None, from.id);
        fixture.store.insert_client(Client {
            id: order.client_id,
            name: "Acme".into(),
            email: Some("billing@acme.example".into()),
            portal_token_digest: None,
        });

        fixture
            .service
            .set_status(order.id, to.id, None)
            .await
            .expect("transition succeeds");

        let sent = fixture.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "billing@acme.example");
        assert!(sent[0].html.contains("Done"));
    }

    #[tokio::test]
    async fn client_without_email_is_skipped_silently() {
        let fixture = fixture();
        let from = status("New", false);
        let to = status("Done", true);
        fixture.store.insert_order_status(from.clone());
        fixture.store.insert_order_status(to.clone());
        let order = seed_order(&fixture, None, from.id);
        fixture.store.insert_client(Client {
            id: order.client_id,
            name: "Acme".into(),
            email: None,
            portal_token_digest: None,
        });

        fixture
            .service
            .set_status(order.id, to.id, None)
            .await
            .expect("transition succeeds");

        assert!(fixture.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn mailer_failure_does_not_fail_the_transition() {
        let fixture = fixture();
        let from = status("New", false);
        let to = status("Done", true);
        fixture.store.insert_order_status(from.clone());
        fixture.store.insert_order_status(to.clone());
        let order = seed_order(&fixture, None, from.id);
        fixture.store.insert_client(Client {
            id: order.client_id,
            name: "Acme".into(),
            email: Some("billing@acme.example".into()),
            portal_token_digest: None,
        });
        fixture.mailer.fail_sends();

        fixture
            .service
            .set_status(order.id, to.id, None)
            .await
            .expect("transition succeeds despite mailer outage");

        // Steps 1-4 all persisted.
        assert_eq!(fixture.store.order(order.id).expect("order").status_id, to.id);
        assert_eq!(fixture.store.history().len(), 1);
    }

    #[tokio::test]
    async fn unknown_order_fails_not_found() {
        let fixture = fixture();
        let to = status("In work", false);
        fixture.store.insert_order_status(to.clone());

        let error = fixture
            .service
            .set_status(Uuid::new_v4(), to.id, None)
            .await
            .expect_err("missing order rejected");

        assert_eq!(error.code(), ErrorCode::NotFound);
        assert!(fixture.store.history().is_empty());
    }

    #[tokio::test]
    async fn unknown_status_fails_not_found_without_mutation() {
        let fixture = fixture();
        let from = status("New", false);
        fixture.store.insert_order_status(from.clone());
        let order = seed_order(&fixture, None, from.id);

        let error = fixture
            .service
            .set_status(order.id, Uuid::new_v4(), None)
            .await
            .expect_err("missing status rejected");

        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(
            fixture.store.order(order.id).expect("order").status_id,
            from.id
        );
        assert!(fixture.store.history().is_empty());
    }

    #[tokio::test]
    async fn deleted_previous_status_falls_back_to_placeholder_label() {
        let fixture = fixture();
        let to = status("In work", false);
        fixture.store.insert_order_status(to.clone());
        fixture.store.insert_staff(admin());
        // The order points at a status row that no longer exists.
        let order = seed_order(&fixture, None, Uuid::new_v4());

        fixture
            .service
            .set_status(order.id, to.id, None)
            .await
            .expect("transition succeeds");

        let notifications = fixture.store.notifications();
        assert_eq!(notifications.len(), 1);
        assert!(notifications[0].description.contains("unknown"));
    }
}
