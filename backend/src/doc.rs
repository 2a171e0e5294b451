//! OpenAPI document assembled from the handler annotations.

use utoipa::OpenApi;

use crate::domain::deadline_sweep::DeadlineSweepReport;
use crate::domain::{Error, ErrorCode};
use crate::inbound::http::{auth, cron, health, invoices, milestones, orders, portal, proposals, tickets};

/// Public OpenAPI surface used by Swagger UI and tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ITL OrderFlow API",
        description = "Order, milestone, invoice, proposal, and ticket workflow backend."
    ),
    paths(
        auth::login,
        orders::create_order,
        orders::set_order_status,
        orders::mark_order_status_initial,
        milestones::set_milestone_status,
        invoices::create_invoice,
        invoices::record_payment,
        invoices::set_invoice_status,
        proposals::create_proposal,
        proposals::set_proposal_status,
        tickets::set_ticket_status,
        portal::issue_portal_token,
        portal::portal_session,
        cron::deadline_sweep,
        health::live,
        health::ready,
    ),
    components(schemas(
        Error,
        ErrorCode,
        DeadlineSweepReport,
        auth::LoginRequestBody,
        auth::LoginResponseBody,
        orders::CreateOrderRequestBody,
        orders::CreatedDocumentBody,
        orders::SetOrderStatusRequestBody,
        milestones::SetMilestoneStatusRequestBody,
        invoices::CreateInvoiceRequestBody,
        invoices::RecordPaymentRequestBody,
        invoices::SetInvoiceStatusRequestBody,
        proposals::CreateProposalRequestBody,
        proposals::SetProposalStatusRequestBody,
        tickets::SetTicketStatusRequestBody,
        portal::IssuePortalTokenRequestBody,
        portal::PortalSessionRequestBody,
        portal::PortalSessionResponseBody,
    )),
    tags(
        (name = "auth", description = "Staff authentication"),
        (name = "orders", description = "Order workflow"),
        (name = "milestones", description = "Milestone workflow"),
        (name = "invoices", description = "Billing workflow"),
        (name = "proposals", description = "Proposal workflow"),
        (name = "tickets", description = "Support desk workflow"),
        (name = "portal", description = "Client portal access"),
        (name = "internal", description = "Cron-triggered maintenance"),
        (name = "health", description = "Probes"),
    )
)]
pub struct ApiDoc;
