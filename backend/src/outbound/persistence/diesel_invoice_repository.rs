//! PostgreSQL-backed `InvoiceRepository` implementation using Diesel ORM.
//!
//! Payment recording inserts the payment row and applies the recomputed
//! invoice fields in one transaction: both writes commit or neither does.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use uuid::Uuid;

use crate::domain::billing::{Invoice, InvoicePaymentUpdate, PaymentDraft};
use crate::domain::ports::{InvoiceRepository, RepositoryError};
use crate::domain::status::InvoiceStatus;

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{InvoicePaymentChangeset, InvoiceRow, NewInvoiceRow, NewPaymentRow};
use super::pool::DbPool;
use super::schema::{invoices, payments};

/// Diesel-backed implementation of the invoice repository port.
#[derive(Clone)]
pub struct DieselInvoiceRepository {
    pool: DbPool,
}

impl DieselInvoiceRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Convert a database row into a domain invoice.
fn row_to_invoice(row: InvoiceRow) -> Result<Invoice, RepositoryError> {
    let InvoiceRow {
        id,
        number,
        client_id,
        order_id,
        status,
        total,
        paid_amount,
        due_date,
        paid_at,
    } = row;

    let status: InvoiceStatus = status
        .parse()
        .map_err(|err: crate::domain::status::InvalidStatus| {
            RepositoryError::query(err.to_string())
        })?;

    Ok(Invoice {
        id,
        number,
        client_id,
        order_id,
        status,
        total,
        paid_amount,
        due_date,
        paid_at,
    })
}

#[async_trait]
impl InvoiceRepository for DieselInvoiceRepository {
    async fn find(&self, id: Uuid) -> Result<Option<Invoice>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = invoices::table
            .filter(invoices::id.eq(id))
            .select(InvoiceRow::as_select())
            .first::<InvoiceRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_invoice).transpose()
    }

    async fn insert(&self, invoice: &Invoice) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(invoices::table)
            .values(&NewInvoiceRow {
                id: invoice.id,
                number: &invoice.number,
                client_id: invoice.client_id,
                order_id: invoice.order_id,
                status: invoice.status.as_str(),
                total: invoice.total,
                paid_amount: invoice.paid_amount,
                due_date: invoice.due_date,
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn record_payment(
        &self,
        invoice_id: Uuid,
        draft: &PaymentDraft,
        update: InvoicePaymentUpdate,
    ) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let payment_row = NewPaymentRow {
            id: Uuid::new_v4(),
            invoice_id,
            amount: draft.amount,
            payment_method: &draft.payment_method,
            reference: draft.reference.as_deref(),
            payment_date: draft.payment_date,
        };
        let changeset = InvoicePaymentChangeset {
            status: update.status.as_str(),
            paid_amount: update.paid_amount,
            paid_at: update.paid_at,
        };

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(payments::table)
                    .values(&payment_row)
                    .execute(conn)
                    .await?;

                diesel::update(invoices::table.filter(invoices::id.eq(invoice_id)))
                    .set(&changeset)
                    .execute(conn)
                    .await?;

                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn set_status(&self, id: Uuid, status: InvoiceStatus) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(invoices::table.filter(invoices::id.eq(id)))
            .set(invoices::status.eq(status.as_str()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
