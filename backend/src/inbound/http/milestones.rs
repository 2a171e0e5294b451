//! Milestone status HTTP handler.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::status::MilestoneStatus;

use super::error::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;
use super::validation::{FieldName, parse_status, parse_uuid};

/// Request payload for changing a milestone's status.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetMilestoneStatusRequestBody {
    /// Destination status wire string, e.g. `COMPLETED`.
    #[schema(example = "COMPLETED")]
    pub status: String,
}

/// Move a milestone to a new state.
#[utoipa::path(
    post,
    path = "/api/v1/milestones/{id}/status",
    request_body = SetMilestoneStatusRequestBody,
    params(("id" = String, Path, description = "Milestone identifier")),
    responses(
        (status = 204, description = "Status changed"),
        (status = 401, description = "Login required"),
        (status = 404, description = "Milestone not found")
    ),
    tags = ["milestones"],
    operation_id = "setMilestoneStatus"
)]
#[post("/milestones/{id}/status")]
pub async fn set_milestone_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    body: web::Json<SetMilestoneStatusRequestBody>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let milestone_id = parse_uuid(FieldName::new("id"), &path.into_inner())?;
    let status: MilestoneStatus = parse_status(FieldName::new("status"), &body.status)?;

    state.milestones.set_status(milestone_id, status).await?;

    Ok(HttpResponse::NoContent().finish())
}
