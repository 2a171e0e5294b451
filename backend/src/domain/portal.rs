//! Client portal access tokens.
//!
//! Portal access is token-based: issuing mints fresh random material,
//! stores only its SHA-256 digest on the client record, and emails the
//! token to the client. The token therefore exists solely in that email,
//! so issuance is the one email step that is NOT best-effort: a send
//! failure fails the whole operation.
//!
//! Authentication resolves a presented token back to its client via the
//! digest, throttled per source IP.

use std::sync::Arc;
use std::time::Duration;

use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::warn;
use uuid::Uuid;

use super::directory::Client;
use super::error::{ApiResult, Error};
use super::messages;
use super::ports::{ClientDirectory, Mailer};
use super::rate_limit::FixedWindowLimiter;

/// Token length in random bytes; hex-encoded to twice this many characters.
const TOKEN_BYTES: usize = 32;

/// Hex-encode the SHA-256 digest of a token.
#[must_use]
pub fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

fn mint_token() -> String {
    let mut bytes = [0_u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Issues portal tokens and authenticates portal sessions.
#[derive(Clone)]
pub struct PortalAccessService {
    clients: Arc<dyn ClientDirectory>,
    mailer: Arc<dyn Mailer>,
    limiter: Arc<FixedWindowLimiter>,
    attempt_limit: u32,
    attempt_window: Duration,
}

impl PortalAccessService {
    /// Create the service over its driven ports and throttle settings.
    pub fn new(
        clients: Arc<dyn ClientDirectory>,
        mailer: Arc<dyn Mailer>,
        limiter: Arc<FixedWindowLimiter>,
        attempt_limit: u32,
        attempt_window: Duration,
    ) -> Self {
        Self {
            clients,
            mailer,
            limiter,
            attempt_limit,
            attempt_window,
        }
    }

    /// Mint and deliver a fresh portal token for a client.
    ///
    /// Any previously issued token is invalidated by overwriting the
    /// stored digest. Fails when the client has no email or the delivery
    /// email cannot be handed off.
    pub async fn issue_token(&self, client_id: Uuid) -> ApiResult<()> {
        let client = self
            .clients
            .find(client_id)
            .await
            .map_err(|err| err.into_domain("client directory"))?
            .ok_or_else(|| Error::not_found(format!("client {client_id} not found")))?;

        let Some(address) = client.email.as_deref() else {
            return Err(Error::invalid_request(
                "client has no email address to deliver a portal token to",
            ));
        };

        let token = mint_token();
        self.clients
            .store_token_digest(client_id, &token_digest(&token))
            .await
            .map_err(|err| err.into_domain("client directory"))?;

        let email = messages::portal_access_token(address, &client.name, &token);
        self.mailer.send(email).await.map_err(|error| {
            warn!(client = %client_id, %error, "portal token email failed");
            Error::service_unavailable("portal token email could not be delivered")
        })
    }

    /// Authenticate a presented portal token, throttled per source IP.
    pub async fn authenticate(&self, token: &str, ip: &str) -> ApiResult<Client> {
        let decision = self.limiter.check(
            &format!("portal-auth:{ip}"),
            self.attempt_limit,
            self.attempt_window,
        );
        if !decision.allowed {
            let retry_secs = decision
                .retry_after
                .map_or(0, |retry_after| retry_after.as_secs());
            return Err(Error::rate_limited(format!(
                "too many portal sign-in attempts; retry in {retry_secs}s"
            )));
        }

        self.clients
            .find_by_token_digest(&token_digest(token))
            .await
            .map_err(|err| err.into_domain("client directory"))?
            .ok_or_else(|| Error::unauthorized("invalid portal token"))
    }
}
