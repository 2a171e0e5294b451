//! Server assembly: route registration and session middleware.

pub mod config;
pub mod state_builders;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Key, SameSite};
use actix_web::web;

use crate::inbound::http::state::{CronConfig, HttpState};
use crate::inbound::http::{auth, cron, health, invoices, milestones, orders, portal, proposals, tickets};

pub use config::ServerConfig;
pub use state_builders::build_http_state;

/// Build the cookie-session middleware for the API scope.
#[must_use]
pub fn session_middleware(
    key: Key,
    cookie_secure: bool,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .build()
}

/// Register shared state, the versioned API scope, and health probes.
pub fn configure_app(
    cfg: &mut web::ServiceConfig,
    state: &HttpState,
    cron_config: &CronConfig,
    health_state: &web::Data<health::HealthState>,
    session: SessionMiddleware<CookieSessionStore>,
) {
    let api = web::scope("/api/v1")
        .wrap(session)
        .service(auth::login)
        .service(orders::create_order)
        .service(orders::set_order_status)
        .service(orders::mark_order_status_initial)
        .service(milestones::set_milestone_status)
        .service(invoices::create_invoice)
        .service(invoices::record_payment)
        .service(invoices::set_invoice_status)
        .service(proposals::create_proposal)
        .service(proposals::set_proposal_status)
        .service(tickets::set_ticket_status)
        .service(portal::issue_portal_token)
        .service(portal::portal_session)
        .service(cron::deadline_sweep);

    cfg.app_data(web::Data::new(state.clone()))
        .app_data(web::Data::new(cron_config.clone()))
        .app_data(health_state.clone())
        .service(api)
        .service(health::live)
        .service(health::ready);
}
