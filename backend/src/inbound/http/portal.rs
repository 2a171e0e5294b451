//! Client portal HTTP handlers: token issuance and session exchange.

use actix_web::{HttpRequest, HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;
use super::validation::{FieldName, parse_uuid};

/// Request payload for issuing a portal token.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssuePortalTokenRequestBody {
    /// Client to grant portal access to.
    #[schema(format = "uuid")]
    pub client_id: String,
}

/// Request payload for exchanging a portal token.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortalSessionRequestBody {
    /// Token received by email.
    pub token: String,
}

/// Response payload for a successful portal sign-in.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortalSessionResponseBody {
    /// Authenticated client identifier.
    #[schema(format = "uuid")]
    pub client_id: String,
    /// Client display name.
    pub name: String,
}

/// Mint and email a fresh portal token for a client.
#[utoipa::path(
    post,
    path = "/api/v1/portal/tokens",
    request_body = IssuePortalTokenRequestBody,
    responses(
        (status = 204, description = "Token issued and emailed"),
        (status = 400, description = "Client has no email address"),
        (status = 401, description = "Login required"),
        (status = 404, description = "Client not found"),
        (status = 503, description = "Token email could not be delivered")
    ),
    tags = ["portal"],
    operation_id = "issuePortalToken"
)]
#[post("/portal/tokens")]
pub async fn issue_portal_token(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Json<IssuePortalTokenRequestBody>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let client_id = parse_uuid(FieldName::new("clientId"), &body.client_id)?;

    state.portal.issue_token(client_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Exchange a portal token for the client it belongs to.
#[utoipa::path(
    post,
    path = "/api/v1/portal/session",
    request_body = PortalSessionRequestBody,
    responses(
        (status = 200, description = "Token accepted", body = PortalSessionResponseBody),
        (status = 401, description = "Invalid token"),
        (status = 429, description = "Too many attempts from this address")
    ),
    tags = ["portal"],
    operation_id = "portalSession"
)]
#[post("/portal/session")]
pub async fn portal_session(
    state: web::Data<HttpState>,
    req: HttpRequest,
    body: web::Json<PortalSessionRequestBody>,
) -> ApiResult<HttpResponse> {
    let ip = req
        .connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_owned();

    let client = state.portal.authenticate(&body.token, &ip).await?;

    Ok(HttpResponse::Ok().json(PortalSessionResponseBody {
        client_id: client.id.to_string(),
        name: client.name,
    }))
}
