//! PostgreSQL-backed `CounterStore` using atomic increment-and-return.
//!
//! The counters live on the singleton settings row. One `UPDATE ...
//! RETURNING` both bumps the counter and reads the result, so concurrent
//! allocations serialise on the row lock and can never observe the same
//! value.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::numbering::DocumentKind;
use crate::domain::ports::{AllocatedNumber, CounterStore, RepositoryError};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::pool::DbPool;
use super::schema::settings;

/// Identifier of the singleton settings row.
const SETTINGS_ID: &str = "default";

/// Diesel-backed implementation of the counter store port.
#[derive(Clone)]
pub struct DieselCounterStore {
    pool: DbPool,
}

impl DieselCounterStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CounterStore for DieselCounterStore {
    async fn allocate(&self, kind: DocumentKind) -> Result<AllocatedNumber, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // RETURNING yields the post-increment value; the caller receives
        // the value reserved for it, one less.
        let (next, prefix): (i32, String) = match kind {
            DocumentKind::Order => {
                diesel::update(settings::table.filter(settings::id.eq(SETTINGS_ID)))
                    .set(settings::next_order_number.eq(settings::next_order_number + 1))
                    .returning((settings::next_order_number, settings::order_prefix))
                    .get_result(&mut conn)
                    .await
            }
            DocumentKind::Invoice => {
                diesel::update(settings::table.filter(settings::id.eq(SETTINGS_ID)))
                    .set(settings::next_invoice_number.eq(settings::next_invoice_number + 1))
                    .returning((settings::next_invoice_number, settings::invoice_prefix))
                    .get_result(&mut conn)
                    .await
            }
            DocumentKind::Proposal => {
                diesel::update(settings::table.filter(settings::id.eq(SETTINGS_ID)))
                    .set(settings::next_proposal_number.eq(settings::next_proposal_number + 1))
                    .returning((settings::next_proposal_number, settings::proposal_prefix))
                    .get_result(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;

        Ok(AllocatedNumber {
            value: next - 1,
            prefix,
        })
    }
}
