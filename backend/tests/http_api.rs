//! Handler-level coverage for the HTTP surface over in-memory adapters.

use std::sync::Arc;
use std::time::Duration;

use actix_web::cookie::Key;
use actix_web::{App, test, web};
use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use orderflow::Trace;
use orderflow::domain::billing_workflow::BillingWorkflowService;
use orderflow::domain::deadline_sweep::DeadlineSweepService;
use orderflow::domain::directory::{Client, LoginCredentials, StaffMember};
use orderflow::domain::milestone_workflow::MilestoneWorkflowService;
use orderflow::domain::numbering::DocumentNumberService;
use orderflow::domain::order_workflow::OrderWorkflowService;
use orderflow::domain::orders::OrderStatus;
use orderflow::domain::portal::PortalAccessService;
use orderflow::domain::ports::LoginService;
use orderflow::domain::proposal_workflow::ProposalWorkflowService;
use orderflow::domain::rate_limit::FixedWindowLimiter;
use orderflow::domain::recipients::NotificationFanOut;
use orderflow::domain::status::{OrderPriority, StaffRole};
use orderflow::domain::ticket_workflow::TicketWorkflowService;
use orderflow::domain::{ApiResult, Error};
use orderflow::inbound::http::health::HealthState;
use orderflow::inbound::http::state::{CronConfig, HttpState, LoginThrottle};
use orderflow::server::{configure_app, session_middleware};
use orderflow::test_support::{InMemoryStore, RecordingMailer};

const STAFF_EMAIL: &str = "ada@example.com";
const STAFF_PASSWORD: &str = "password";
const CRON_SECRET: &str = "sweep-secret";

/// Fixed-credential login stub; the Argon2 adapter has its own coverage.
struct StubLoginService {
    member: StaffMember,
}

#[async_trait]
impl LoginService for StubLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> ApiResult<StaffMember> {
        if credentials.email == self.member.email && credentials.password == STAFF_PASSWORD {
            Ok(self.member.clone())
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}

struct World {
    store: Arc<InMemoryStore>,
    state: HttpState,
    cron: CronConfig,
}

fn world_with_cron(secret: Option<&str>) -> World {
    let store = Arc::new(InMemoryStore::new());
    let mailer = Arc::new(RecordingMailer::new());
    let fan_out = NotificationFanOut::new(Arc::clone(&store) as _, Arc::clone(&store) as _);
    let numbering = DocumentNumberService::new(Arc::clone(&store) as _);
    let limiter = Arc::new(FixedWindowLimiter::new());

    let staff_member = StaffMember {
        id: Uuid::new_v4(),
        email: STAFF_EMAIL.into(),
        display_name: "Ada".into(),
        role: StaffRole::Admin,
        is_active: true,
    };
    store.insert_staff(staff_member.clone());

    let state = HttpState {
        orders: OrderWorkflowService::new(
            Arc::clone(&store) as _,
            Arc::clone(&store) as _,
            Arc::clone(&store) as _,
            fan_out.clone(),
            Arc::clone(&mailer) as _,
            numbering.clone(),
        ),
        milestones: MilestoneWorkflowService::new(
            Arc::clone(&store) as _,
            Arc::clone(&store) as _,
            Arc::clone(&store) as _,
            fan_out.clone(),
            Arc::clone(&mailer) as _,
        ),
        billing: BillingWorkflowService::new(
            Arc::clone(&store) as _,
            Arc::clone(&store) as _,
            fan_out.clone(),
            Arc::clone(&mailer) as _,
            numbering.clone(),
        ),
        proposals: ProposalWorkflowService::new(
            Arc::clone(&store) as _,
            Arc::clone(&store) as _,
            numbering,
        ),
        tickets: TicketWorkflowService::new(Arc::clone(&store) as _),
        deadline_sweep: DeadlineSweepService::new(
            Arc::clone(&store) as _,
            Arc::clone(&store) as _,
            Arc::clone(&store) as _,
            fan_out,
        ),
        portal: PortalAccessService::new(
            Arc::clone(&store) as _,
            Arc::clone(&mailer) as _,
            Arc::clone(&limiter),
            10,
            Duration::from_secs(900),
        ),
        login: Arc::new(StubLoginService {
            member: staff_member,
        }),
        login_limiter: limiter,
        login_throttle: LoginThrottle {
            limit: 5,
            window: Duration::from_secs(900),
        },
    };

    World {
        store,
        state,
        cron: CronConfig {
            secret: secret.map(str::to_owned),
        },
    }
}

fn world() -> World {
    world_with_cron(Some(CRON_SECRET))
}

macro_rules! init_app {
    ($world:expr) => {{
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        let state = $world.state.clone();
        let cron = $world.cron.clone();
        test::init_service(App::new().wrap(Trace).configure(move |cfg| {
            configure_app(
                cfg,
                &state,
                &cron,
                &health,
                session_middleware(Key::generate(), false),
            );
        }))
        .await
    }};
}

macro_rules! login_cookie {
    ($app:expr) => {{
        let res = test::call_service(
            $app,
            test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(json!({ "email": STAFF_EMAIL, "password": STAFF_PASSWORD }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), 200, "login succeeds");
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned()
    }};
}

#[actix_web::test]
async fn cron_endpoint_refuses_without_configuration() {
    let world = world_with_cron(None);
    let app = init_app!(&world);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/internal/deadline-sweep")
            .insert_header(("Authorization", format!("Bearer {CRON_SECRET}")))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), 500);
}

#[actix_web::test]
async fn cron_endpoint_rejects_a_wrong_token() {
    let world = world();
    let app = init_app!(&world);

    let missing = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/internal/deadline-sweep")
            .to_request(),
    )
    .await;
    assert_eq!(missing.status(), 401);

    let wrong = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/internal/deadline-sweep")
            .insert_header(("Authorization", "Bearer wrong"))
            .to_request(),
    )
    .await;
    assert_eq!(wrong.status(), 401);
}

#[actix_web::test]
async fn cron_endpoint_runs_the_sweep_with_the_right_token() {
    let world = world();
    let app = init_app!(&world);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/internal/deadline-sweep")
            .insert_header(("Authorization", format!("Bearer {CRON_SECRET}")))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), 200);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["milestones"], 0);
    assert_eq!(body["tasks"], 0);
    assert_eq!(body["notificationsCreated"], 0);
}

#[actix_web::test]
async fn mutations_require_a_staff_session() {
    let world = world();
    let app = init_app!(&world);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/orders/{}/status", Uuid::new_v4()))
            .set_json(json!({ "statusId": Uuid::new_v4().to_string() }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), 401);
}

#[actix_web::test]
async fn order_status_change_round_trips_through_the_api() {
    let world = world();
    let from = OrderStatus {
        id: Uuid::new_v4(),
        code: "new".into(),
        name: "New".into(),
        color: "#888888".into(),
        position: 0,
        is_initial: true,
        is_final: false,
        notify_client: false,
        is_active: true,
    };
    let to = OrderStatus {
        id: Uuid::new_v4(),
        code: "in-work".into(),
        name: "In work".into(),
        color: "#2266ff".into(),
        position: 1,
        is_initial: false,
        is_final: false,
        notify_client: false,
        is_active: true,
    };
    world.store.insert_order_status(from.clone());
    world.store.insert_order_status(to.clone());
    let client_id = Uuid::new_v4();
    world.store.insert_client(Client {
        id: client_id,
        name: "Acme".into(),
        email: None,
        portal_token_digest: None,
    });

    let app = init_app!(&world);
    let cookie = login_cookie!(&app);

    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/orders")
            .cookie(cookie.clone())
            .set_json(json!({ "clientId": client_id.to_string(), "priority": "HIGH" }))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), 201);
    let created_body: serde_json::Value = test::read_body_json(created).await;
    let order_id = created_body["id"].as_str().expect("id in body").to_owned();
    assert!(
        created_body["number"]
            .as_str()
            .expect("number in body")
            .ends_with("-001")
    );

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/orders/{order_id}/status"))
            .cookie(cookie)
            .set_json(json!({ "statusId": to.id.to_string() }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), 204);

    let order_id: Uuid = order_id.parse().expect("uuid body");
    let stored = world.store.order(order_id).expect("order persisted");
    assert_eq!(stored.status_id, to.id);
    assert_eq!(stored.priority, OrderPriority::High);
    assert_eq!(world.store.history().len(), 1);
}

#[actix_web::test]
async fn login_is_throttled_per_email() {
    let world = world();
    let app = init_app!(&world);

    for _ in 0..5 {
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(json!({ "email": STAFF_EMAIL, "password": "wrong" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), 401);
    }

    let throttled = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": STAFF_EMAIL, "password": STAFF_PASSWORD }))
            .to_request(),
    )
    .await;
    assert_eq!(throttled.status(), 429);

    // A different email is unaffected by the exhausted window.
    let other = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": "grace@example.com", "password": "wrong" }))
            .to_request(),
    )
    .await;
    assert_eq!(other.status(), 401);
}

#[actix_web::test]
async fn malformed_ids_are_rejected_with_field_context() {
    let world = world();
    let app = init_app!(&world);
    let cookie = login_cookie!(&app);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/orders/not-a-uuid/status")
            .cookie(cookie)
            .set_json(json!({ "statusId": Uuid::new_v4().to_string() }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), 400);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "id");
}

#[actix_web::test]
async fn portal_token_issue_and_session_exchange() {
    let world = world();
    let client_id = Uuid::new_v4();
    world.store.insert_client(Client {
        id: client_id,
        name: "Acme".into(),
        email: Some("it@acme.example".into()),
        portal_token_digest: None,
    });
    let app = init_app!(&world);
    let cookie = login_cookie!(&app);

    let issued = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/portal/tokens")
            .cookie(cookie)
            .set_json(json!({ "clientId": client_id.to_string() }))
            .to_request(),
    )
    .await;
    assert_eq!(issued.status(), 204);

    let rejected = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/portal/session")
            .set_json(json!({ "token": "not-the-token" }))
            .to_request(),
    )
    .await;
    assert_eq!(rejected.status(), 401);
}
