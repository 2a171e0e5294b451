//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the workflow services and ports, never on concrete adapters,
//! and remain testable against the in-memory fakes.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::billing_workflow::BillingWorkflowService;
use crate::domain::deadline_sweep::DeadlineSweepService;
use crate::domain::milestone_workflow::MilestoneWorkflowService;
use crate::domain::order_workflow::OrderWorkflowService;
use crate::domain::portal::PortalAccessService;
use crate::domain::ports::LoginService;
use crate::domain::proposal_workflow::ProposalWorkflowService;
use crate::domain::rate_limit::FixedWindowLimiter;
use crate::domain::ticket_workflow::TicketWorkflowService;

/// Login throttle settings (`login:{email}` keys).
#[derive(Debug, Clone, Copy)]
pub struct LoginThrottle {
    /// Attempts allowed inside one window.
    pub limit: u32,
    /// Window length.
    pub window: Duration,
}

impl Default for LoginThrottle {
    fn default() -> Self {
        Self {
            limit: 5,
            window: Duration::from_secs(900),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Order status workflow.
    pub orders: OrderWorkflowService,
    /// Milestone status workflow.
    pub milestones: MilestoneWorkflowService,
    /// Invoice payment and status workflow.
    pub billing: BillingWorkflowService,
    /// Proposal status workflow.
    pub proposals: ProposalWorkflowService,
    /// Ticket status workflow.
    pub tickets: TicketWorkflowService,
    /// Deadline sweep, exposed to the cron trigger.
    pub deadline_sweep: DeadlineSweepService,
    /// Portal token issue and authentication.
    pub portal: PortalAccessService,
    /// Staff credential verification.
    pub login: Arc<dyn LoginService>,
    /// Shared fixed-window limiter for login throttling.
    pub login_limiter: Arc<FixedWindowLimiter>,
    /// Login throttle settings.
    pub login_throttle: LoginThrottle,
}

/// Cron trigger configuration.
///
/// The deadline sweep endpoint refuses to run at all while no shared
/// secret is configured.
#[derive(Debug, Clone, Default)]
pub struct CronConfig {
    /// Bearer secret the external scheduler must present.
    pub secret: Option<String>,
}
