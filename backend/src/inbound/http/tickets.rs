//! Ticket status HTTP handler.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::status::TicketStatus;

use super::error::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;
use super::validation::{FieldName, parse_status, parse_uuid};

/// Request payload for changing a ticket's status.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetTicketStatusRequestBody {
    /// Destination status wire string, e.g. `RESOLVED`.
    #[schema(example = "RESOLVED")]
    pub status: String,
}

/// Move a ticket to a new state, maintaining its timestamp columns.
#[utoipa::path(
    post,
    path = "/api/v1/tickets/{id}/status",
    request_body = SetTicketStatusRequestBody,
    params(("id" = String, Path, description = "Ticket identifier")),
    responses(
        (status = 204, description = "Status changed"),
        (status = 401, description = "Login required"),
        (status = 404, description = "Ticket not found")
    ),
    tags = ["tickets"],
    operation_id = "setTicketStatus"
)]
#[post("/tickets/{id}/status")]
pub async fn set_ticket_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    body: web::Json<SetTicketStatusRequestBody>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let ticket_id = parse_uuid(FieldName::new("id"), &path.into_inner())?;
    let status: TicketStatus = parse_status(FieldName::new("status"), &body.status)?;

    state.tickets.set_status(ticket_id, status).await?;

    Ok(HttpResponse::NoContent().finish())
}
