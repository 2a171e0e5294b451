//! Health endpoints: liveness and readiness probes for orchestration.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};

/// Shared health state for readiness and liveness checks.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Create a new health state starting as not ready but live.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as ready.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Flag the service as unhealthy so liveness checks fail during
    /// shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// Return readiness state.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Return liveness state.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn probe_response(probe_ok: bool) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };

        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .finish()
    }
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/healthz/live",
    responses(
        (status = 200, description = "Process is alive"),
        (status = 503, description = "Process is shutting down")
    ),
    tags = ["health"],
    operation_id = "live"
)]
#[get("/healthz/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_alive())
}

/// Readiness probe.
#[utoipa::path(
    get,
    path = "/healthz/ready",
    responses(
        (status = 200, description = "Service accepts traffic"),
        (status = 503, description = "Service is not ready")
    ),
    tags = ["health"],
    operation_id = "ready"
)]
#[get("/healthz/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_ready())
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test};

    use super::*;

    #[actix_web::test]
    async fn ready_is_503_until_marked() {
        let state = web::Data::new(HealthState::new());
        let app = test::init_service(App::new().app_data(state.clone()).service(ready)).await;

        let before = test::call_service(
            &app,
            test::TestRequest::get().uri("/healthz/ready").to_request(),
        )
        .await;
        assert_eq!(before.status(), 503);

        state.mark_ready();
        let after = test::call_service(
            &app,
            test::TestRequest::get().uri("/healthz/ready").to_request(),
        )
        .await;
        assert_eq!(after.status(), 200);
    }

    #[actix_web::test]
    async fn live_flips_on_shutdown() {
        let state = web::Data::new(HealthState::new());
        let app = test::init_service(App::new().app_data(state.clone()).service(live)).await;

        let before = test::call_service(
            &app,
            test::TestRequest::get().uri("/healthz/live").to_request(),
        )
        .await;
        assert_eq!(before.status(), 200);

        state.mark_unhealthy();
        let after = test::call_service(
            &app,
            test::TestRequest::get().uri("/healthz/live").to_request(),
        )
        .await;
        assert_eq!(after.status(), 503);
    }
}
