//! Wiring of Diesel adapters into the workflow services.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::billing_workflow::BillingWorkflowService;
use crate::domain::deadline_sweep::DeadlineSweepService;
use crate::domain::milestone_workflow::MilestoneWorkflowService;
use crate::domain::numbering::DocumentNumberService;
use crate::domain::order_workflow::OrderWorkflowService;
use crate::domain::portal::PortalAccessService;
use crate::domain::ports::{ClientDirectory, Mailer, OrderRepository};
use crate::domain::proposal_workflow::ProposalWorkflowService;
use crate::domain::rate_limit::FixedWindowLimiter;
use crate::domain::recipients::NotificationFanOut;
use crate::domain::ticket_workflow::TicketWorkflowService;
use crate::inbound::http::state::{HttpState, LoginThrottle};
use crate::outbound::persistence::{
    DbPool, DieselClientDirectory, DieselCounterStore, DieselInvoiceRepository,
    DieselLoginService, DieselMilestoneRepository, DieselNotificationRepository,
    DieselOrderRepository, DieselOrderStatusRepository, DieselProposalRepository,
    DieselStaffDirectory, DieselTaskRepository, DieselTicketRepository,
};

/// Portal token attempts allowed per source address inside one window.
const PORTAL_AUTH_LIMIT: u32 = 10;
/// Portal token attempt window.
const PORTAL_AUTH_WINDOW: Duration = Duration::from_secs(900);

/// Build the HTTP state over Diesel adapters and the given mailer.
pub fn build_http_state(pool: &DbPool, mailer: Arc<dyn Mailer>) -> HttpState {
    let orders: Arc<dyn OrderRepository> = Arc::new(DieselOrderRepository::new(pool.clone()));
    let statuses = Arc::new(DieselOrderStatusRepository::new(pool.clone()));
    let milestones = Arc::new(DieselMilestoneRepository::new(pool.clone()));
    let tasks = Arc::new(DieselTaskRepository::new(pool.clone()));
    let invoices = Arc::new(DieselInvoiceRepository::new(pool.clone()));
    let proposals = Arc::new(DieselProposalRepository::new(pool.clone()));
    let tickets = Arc::new(DieselTicketRepository::new(pool.clone()));
    let staff = Arc::new(DieselStaffDirectory::new(pool.clone()));
    let clients: Arc<dyn ClientDirectory> = Arc::new(DieselClientDirectory::new(pool.clone()));
    let notifications = Arc::new(DieselNotificationRepository::new(pool.clone()));
    let counters = Arc::new(DieselCounterStore::new(pool.clone()));

    let fan_out = NotificationFanOut::new(staff, notifications);
    let numbering = DocumentNumberService::new(counters);
    let limiter = Arc::new(FixedWindowLimiter::new());

    HttpState {
        orders: OrderWorkflowService::new(
            Arc::clone(&orders),
            statuses,
            Arc::clone(&clients),
            fan_out.clone(),
            Arc::clone(&mailer),
            numbering.clone(),
        ),
        milestones: MilestoneWorkflowService::new(
            Arc::clone(&milestones) as _,
            Arc::clone(&orders),
            Arc::clone(&clients),
            fan_out.clone(),
            Arc::clone(&mailer),
        ),
        billing: BillingWorkflowService::new(
            Arc::clone(&invoices) as _,
            Arc::clone(&clients),
            fan_out.clone(),
            Arc::clone(&mailer),
            numbering.clone(),
        ),
        proposals: ProposalWorkflowService::new(
            proposals,
            Arc::clone(&clients),
            numbering,
        ),
        tickets: TicketWorkflowService::new(tickets),
        deadline_sweep: DeadlineSweepService::new(
            milestones,
            tasks,
            orders,
            fan_out,
        ),
        portal: PortalAccessService::new(
            clients,
            mailer,
            Arc::clone(&limiter),
            PORTAL_AUTH_LIMIT,
            PORTAL_AUTH_WINDOW,
        ),
        login: Arc::new(DieselLoginService::new(pool.clone())),
        login_limiter: limiter,
        login_throttle: LoginThrottle::default(),
    }
}
