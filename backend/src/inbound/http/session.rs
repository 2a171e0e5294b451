//! Session helpers keeping handlers free of framework-specific logic.
//!
//! A thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations: persisting the authenticated staff id and
//! requiring one before mutating anything.

use actix_session::Session;
use actix_session::SessionExt as _;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};
use uuid::Uuid;

use crate::domain::Error;

use super::error::ApiResult;

pub(crate) const STAFF_ID_KEY: &str = "staff_id";

/// Newtype wrapper exposing higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated staff member's id in the session cookie.
    pub fn persist_staff(&self, staff_id: Uuid) -> ApiResult<()> {
        self.0
            .insert(STAFF_ID_KEY, staff_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current staff id from the session, if present.
    pub fn staff_id(&self) -> ApiResult<Option<Uuid>> {
        let raw = self
            .0
            .get::<String>(STAFF_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match raw {
            Some(value) => match value.parse::<Uuid>() {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    tracing::warn!(%error, "invalid staff id in session cookie");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require an authenticated staff id or return `401 Unauthorized`.
    pub fn require_staff(&self) -> ApiResult<Uuid> {
        self.staff_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self::new(req.get_session())))
    }
}
