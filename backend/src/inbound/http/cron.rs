//! Cron-triggered deadline sweep endpoint.
//!
//! An external scheduler invokes this endpoint with a bearer-token shared
//! secret. While no secret is configured the endpoint refuses to run at
//! all (500); a mismatched token is 401.

use actix_web::http::header;
use actix_web::{HttpRequest, post, web};
use tracing::info;

use crate::domain::Error;
use crate::domain::deadline_sweep::DeadlineSweepReport;

use super::error::ApiResult;
use super::state::{CronConfig, HttpState};

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Run one deadline sweep.
#[utoipa::path(
    post,
    path = "/api/v1/internal/deadline-sweep",
    responses(
        (status = 200, description = "Sweep completed", body = DeadlineSweepReport),
        (status = 401, description = "Bearer token mismatch"),
        (status = 500, description = "Shared secret not configured")
    ),
    tags = ["internal"],
    operation_id = "deadlineSweep"
)]
#[post("/internal/deadline-sweep")]
pub async fn deadline_sweep(
    state: web::Data<HttpState>,
    cron: web::Data<CronConfig>,
    req: HttpRequest,
) -> ApiResult<web::Json<DeadlineSweepReport>> {
    let Some(secret) = cron.secret.as_deref() else {
        return Err(Error::internal("cron shared secret is not configured"));
    };

    if bearer_token(&req) != Some(secret) {
        return Err(Error::unauthorized("invalid cron token"));
    }

    let report = state.deadline_sweep.run().await?;
    info!(
        milestones = report.milestones,
        tasks = report.tasks,
        notifications = report.notifications_created,
        "deadline sweep completed"
    );
    Ok(web::Json(report))
}
