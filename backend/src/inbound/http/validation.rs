//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request DTOs carry plain strings; these helpers turn them into domain
//! values, attaching the offending field and value to the error details so
//! callers see the first validation failure with context.

use std::str::FromStr;

use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::status::InvalidStatus;

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

/// Parse a UUID request field.
pub(crate) fn parse_uuid(field: FieldName, value: &str) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        Error::invalid_request(format!("{} must be a UUID", field.as_str())).with_details(json!({
            "field": field.as_str(),
            "value": value,
            "code": "invalid_uuid",
        }))
    })
}

/// Parse a closed status-enum request field.
pub(crate) fn parse_status<T>(field: FieldName, value: &str) -> Result<T, Error>
where
    T: FromStr<Err = InvalidStatus>,
{
    value.parse::<T>().map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": field.as_str(),
            "value": value,
            "code": "invalid_status",
        }))
    })
}
