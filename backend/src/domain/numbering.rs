//! Human-readable document numbering.
//!
//! Orders, invoices, and proposals all draw from persisted per-kind
//! counters behind the [`CounterStore`] port. The store increments
//! atomically and hands back the pre-increment value, so concurrent
//! callers never mint the same number and the sequence has no gaps.

use std::sync::Arc;

use chrono::{Datelike, Utc};

use super::error::ApiResult;
use super::ports::CounterStore;

/// The document families with persisted counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Order numbers, e.g. `ORD-2026-007`.
    Order,
    /// Invoice numbers, e.g. `INV-2026-012`.
    Invoice,
    /// Proposal numbers, e.g. `KP-2026-003`.
    Proposal,
}

impl DocumentKind {
    /// Counter name used in logs and error context.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Invoice => "invoice",
            Self::Proposal => "proposal",
        }
    }
}

/// Mints formatted document numbers from the persisted counters.
#[derive(Clone)]
pub struct DocumentNumberService {
    counters: Arc<dyn CounterStore>,
}

impl DocumentNumberService {
    /// Create a new service over the counter store.
    pub fn new(counters: Arc<dyn CounterStore>) -> Self {
        Self { counters }
    }

    /// Allocate and format the next number for `kind`.
    ///
    /// A store failure aborts the caller's whole creating operation: no
    /// number is consumed and no entity may be persisted with it.
    pub async fn next_number(&self, kind: DocumentKind) -> ApiResult<String> {
        let allocated = self
            .counters
            .allocate(kind)
            .await
            .map_err(|err| err.into_domain("document counters"))?;

        Ok(format_document_number(
            &allocated.prefix,
            Utc::now().year(),
            allocated.value,
        ))
    }
}

/// Format `{prefix}-{year}-{value}` with the value zero-padded to three
/// digits; wider values print unpadded rather than truncated.
#[must_use]
pub fn format_document_number(prefix: &str, year: i32, value: i32) -> String {
    format!("{prefix}-{year}-{value:03}")
}
