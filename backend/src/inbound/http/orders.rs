//! Order HTTP handlers: creation and status changes.

use actix_web::{HttpResponse, post, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::orders::OrderDraft;
use crate::domain::status::OrderPriority;

use super::error::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;
use super::validation::{FieldName, parse_status, parse_uuid};

/// Request payload for creating an order.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequestBody {
    /// Owning client.
    #[schema(format = "uuid")]
    pub client_id: String,
    /// Responsible manager, if already assigned.
    #[schema(format = "uuid")]
    pub manager_id: Option<String>,
    /// Priority wire string; defaults to `MEDIUM`.
    #[schema(example = "HIGH")]
    pub priority: Option<String>,
    /// Agreed delivery deadline.
    #[schema(value_type = Option<String>, format = "date")]
    pub deadline: Option<NaiveDate>,
}

/// Response payload for a created document.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedDocumentBody {
    /// New entity identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Allocated human-readable number.
    #[schema(example = "ORD-2026-007")]
    pub number: String,
}

/// Create an order with a generated number and the initial status.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = CreateOrderRequestBody,
    responses(
        (status = 201, description = "Order created", body = CreatedDocumentBody),
        (status = 401, description = "Login required"),
        (status = 404, description = "Client not found")
    ),
    tags = ["orders"],
    operation_id = "createOrder"
)]
#[post("/orders")]
pub async fn create_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Json<CreateOrderRequestBody>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let body = body.into_inner();
    let client_id = parse_uuid(FieldName::new("clientId"), &body.client_id)?;
    let manager_id = body
        .manager_id
        .as_deref()
        .map(|raw| parse_uuid(FieldName::new("managerId"), raw))
        .transpose()?;
    let priority = body
        .priority
        .as_deref()
        .map(|raw| parse_status::<OrderPriority>(FieldName::new("priority"), raw))
        .transpose()?
        .unwrap_or(OrderPriority::Medium);

    let order = state
        .orders
        .create(OrderDraft {
            client_id,
            manager_id,
            priority,
            deadline: body.deadline,
        })
        .await?;

    Ok(HttpResponse::Created().json(CreatedDocumentBody {
        id: order.id.to_string(),
        number: order.number,
    }))
}

/// Flag an order status row as the initial one.
///
/// Clears the flag on every other row in the same store operation, so at
/// most one row carries it.
#[utoipa::path(
    post,
    path = "/api/v1/order-statuses/{id}/initial",
    params(("id" = String, Path, description = "Order status identifier")),
    responses(
        (status = 204, description = "Flag moved"),
        (status = 401, description = "Login required"),
        (status = 404, description = "Status not found")
    ),
    tags = ["orders"],
    operation_id = "markOrderStatusInitial"
)]
#[post("/order-statuses/{id}/initial")]
pub async fn mark_order_status_initial(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let status_id = parse_uuid(FieldName::new("id"), &path.into_inner())?;

    state.orders.mark_status_initial(status_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Request payload for changing an order's status.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetOrderStatusRequestBody {
    /// Destination status row identifier.
    #[schema(format = "uuid")]
    pub status_id: String,
}

/// Move an order to a new status row.
#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/status",
    request_body = SetOrderStatusRequestBody,
    params(("id" = String, Path, description = "Order identifier")),
    responses(
        (status = 204, description = "Status changed"),
        (status = 401, description = "Login required"),
        (status = 404, description = "Order or status not found")
    ),
    tags = ["orders"],
    operation_id = "setOrderStatus"
)]
#[post("/orders/{id}/status")]
pub async fn set_order_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    body: web::Json<SetOrderStatusRequestBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_staff()?;
    let order_id = parse_uuid(FieldName::new("id"), &path.into_inner())?;
    let status_id = parse_uuid(FieldName::new("statusId"), &body.status_id)?;

    state
        .orders
        .set_status(order_id, status_id, Some(actor))
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
