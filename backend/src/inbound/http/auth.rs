//! Staff login endpoint.
//!
//! Login attempts are throttled per email address with the fixed-window
//! limiter before credentials are checked, so the store is never queried
//! for a throttled caller.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::directory::LoginCredentials;
use crate::domain::status::StaffRole;

use super::error::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;

/// Request payload for staff login.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestBody {
    /// Staff email address.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

/// Response payload for a successful login.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponseBody {
    /// Authenticated staff identifier.
    #[schema(format = "uuid")]
    pub staff_id: String,
    /// Display name for the UI.
    pub display_name: String,
    /// Role of the authenticated staff member.
    pub role: StaffRole,
}

/// Authenticate a staff member and establish a cookie session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequestBody,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponseBody),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Too many attempts for this email")
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Json<LoginRequestBody>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let email = body.email.trim().to_lowercase();

    let decision = state.login_limiter.check(
        &format!("login:{email}"),
        state.login_throttle.limit,
        state.login_throttle.window,
    );
    if !decision.allowed {
        let retry_secs = decision
            .retry_after
            .map_or(0, |retry_after| retry_after.as_secs());
        return Err(Error::rate_limited(format!(
            "too many login attempts; retry in {retry_secs}s"
        )));
    }

    let member = state
        .login
        .authenticate(&LoginCredentials {
            email,
            password: body.password,
        })
        .await?;

    session.persist_staff(member.id)?;

    Ok(HttpResponse::Ok().json(LoginResponseBody {
        staff_id: member.id.to_string(),
        display_name: member.display_name,
        role: member.role,
    }))
}
