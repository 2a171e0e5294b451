//! Invoice payment and status HTTP handlers.

use actix_web::{HttpResponse, post, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::billing::{InvoiceDraft, PaymentDraft};
use crate::domain::status::InvoiceStatus;

use super::error::ApiResult;
use super::orders::CreatedDocumentBody;
use super::session::SessionContext;
use super::state::HttpState;
use super::validation::{FieldName, parse_status, parse_uuid};

/// Request payload for creating an invoice.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequestBody {
    /// Billed client.
    #[schema(format = "uuid")]
    pub client_id: String,
    /// Order the invoice bills, when tied to one.
    #[schema(format = "uuid")]
    pub order_id: Option<String>,
    /// Total due, in minor units.
    #[schema(example = 150_000)]
    pub total: i64,
    /// Payment due date.
    #[schema(value_type = Option<String>, format = "date")]
    pub due_date: Option<NaiveDate>,
}

/// Create a draft invoice with a generated number.
#[utoipa::path(
    post,
    path = "/api/v1/invoices",
    request_body = CreateInvoiceRequestBody,
    responses(
        (status = 201, description = "Invoice created", body = CreatedDocumentBody),
        (status = 400, description = "Non-positive total"),
        (status = 401, description = "Login required"),
        (status = 404, description = "Client not found")
    ),
    tags = ["invoices"],
    operation_id = "createInvoice"
)]
#[post("/invoices")]
pub async fn create_invoice(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Json<CreateInvoiceRequestBody>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let body = body.into_inner();
    let client_id = parse_uuid(FieldName::new("clientId"), &body.client_id)?;
    let order_id = body
        .order_id
        .as_deref()
        .map(|raw| parse_uuid(FieldName::new("orderId"), raw))
        .transpose()?;

    let invoice = state
        .billing
        .create_invoice(InvoiceDraft {
            client_id,
            order_id,
            total: body.total,
            due_date: body.due_date,
        })
        .await?;

    Ok(HttpResponse::Created().json(CreatedDocumentBody {
        id: invoice.id.to_string(),
        number: invoice.number,
    }))
}

/// Request payload for recording a payment.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequestBody {
    /// Amount received, in minor units.
    #[schema(example = 60_000)]
    pub amount: i64,
    /// Payment channel, free-form.
    #[schema(example = "bank_transfer")]
    pub payment_method: String,
    /// External reference, e.g. a bank statement line.
    pub reference: Option<String>,
    /// Value date of the payment.
    #[schema(value_type = String, format = "date")]
    pub payment_date: NaiveDate,
}

/// Request payload for changing an invoice's status.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetInvoiceStatusRequestBody {
    /// Destination status wire string, e.g. `SENT`.
    #[schema(example = "SENT")]
    pub status: String,
}

/// Record a payment against an invoice.
#[utoipa::path(
    post,
    path = "/api/v1/invoices/{id}/payments",
    request_body = RecordPaymentRequestBody,
    params(("id" = String, Path, description = "Invoice identifier")),
    responses(
        (status = 204, description = "Payment recorded"),
        (status = 400, description = "Non-positive amount"),
        (status = 401, description = "Login required"),
        (status = 404, description = "Invoice not found")
    ),
    tags = ["invoices"],
    operation_id = "recordPayment"
)]
#[post("/invoices/{id}/payments")]
pub async fn record_payment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    body: web::Json<RecordPaymentRequestBody>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let invoice_id = parse_uuid(FieldName::new("id"), &path.into_inner())?;
    let body = body.into_inner();

    state
        .billing
        .record_payment(
            invoice_id,
            PaymentDraft {
                amount: body.amount,
                payment_method: body.payment_method,
                reference: body.reference,
                payment_date: body.payment_date,
            },
        )
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Assign a new invoice status.
#[utoipa::path(
    post,
    path = "/api/v1/invoices/{id}/status",
    request_body = SetInvoiceStatusRequestBody,
    params(("id" = String, Path, description = "Invoice identifier")),
    responses(
        (status = 204, description = "Status changed"),
        (status = 401, description = "Login required"),
        (status = 404, description = "Invoice not found")
    ),
    tags = ["invoices"],
    operation_id = "setInvoiceStatus"
)]
#[post("/invoices/{id}/status")]
pub async fn set_invoice_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    body: web::Json<SetInvoiceStatusRequestBody>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let invoice_id = parse_uuid(FieldName::new("id"), &path.into_inner())?;
    let status: InvoiceStatus = parse_status(FieldName::new("status"), &body.status)?;

    state.billing.set_status(invoice_id, status).await?;

    Ok(HttpResponse::NoContent().finish())
}
