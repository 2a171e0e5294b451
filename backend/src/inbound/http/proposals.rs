//! Proposal status HTTP handler.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::proposals::ProposalDraft;
use crate::domain::status::ProposalStatus;

use super::error::ApiResult;
use super::orders::CreatedDocumentBody;
use super::session::SessionContext;
use super::state::HttpState;
use super::validation::{FieldName, parse_status, parse_uuid};

/// Request payload for creating a proposal.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProposalRequestBody {
    /// Addressed client.
    #[schema(format = "uuid")]
    pub client_id: String,
}

/// Create a draft proposal with a generated number.
#[utoipa::path(
    post,
    path = "/api/v1/proposals",
    request_body = CreateProposalRequestBody,
    responses(
        (status = 201, description = "Proposal created", body = CreatedDocumentBody),
        (status = 401, description = "Login required"),
        (status = 404, description = "Client not found")
    ),
    tags = ["proposals"],
    operation_id = "createProposal"
)]
#[post("/proposals")]
pub async fn create_proposal(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Json<CreateProposalRequestBody>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let client_id = parse_uuid(FieldName::new("clientId"), &body.client_id)?;

    let proposal = state.proposals.create(ProposalDraft { client_id }).await?;

    Ok(HttpResponse::Created().json(CreatedDocumentBody {
        id: proposal.id.to_string(),
        number: proposal.number,
    }))
}

/// Request payload for changing a proposal's status.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetProposalStatusRequestBody {
    /// Destination status wire string, e.g. `ACCEPTED`.
    #[schema(example = "ACCEPTED")]
    pub status: String,
}

/// Move a proposal to a new state, stamping the matching timestamp.
#[utoipa::path(
    post,
    path = "/api/v1/proposals/{id}/status",
    request_body = SetProposalStatusRequestBody,
    params(("id" = String, Path, description = "Proposal identifier")),
    responses(
        (status = 204, description = "Status changed"),
        (status = 401, description = "Login required"),
        (status = 404, description = "Proposal not found")
    ),
    tags = ["proposals"],
    operation_id = "setProposalStatus"
)]
#[post("/proposals/{id}/status")]
pub async fn set_proposal_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    body: web::Json<SetProposalStatusRequestBody>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let proposal_id = parse_uuid(FieldName::new("id"), &path.into_inner())?;
    let status: ProposalStatus = parse_status(FieldName::new("status"), &body.status)?;

    state.proposals.set_status(proposal_id, status).await?;

    Ok(HttpResponse::NoContent().finish())
}
