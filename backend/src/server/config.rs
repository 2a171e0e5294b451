//! HTTP server configuration loaded from the environment.

use std::env;
use std::net::SocketAddr;

use actix_web::cookie::Key;
use tracing::warn;

use crate::outbound::email::SmtpConfig;

/// Runtime configuration for the server process.
///
/// Read once at startup:
/// - `BIND_ADDR` (default `0.0.0.0:8080`)
/// - `DATABASE_URL` (required)
/// - `SESSION_KEY_FILE` (default `/var/run/secrets/session_key`), with
///   `SESSION_ALLOW_EPHEMERAL=1` permitting a generated key outside debug
///   builds
/// - `SESSION_COOKIE_SECURE` (`0` disables, anything else enables)
/// - `CRON_SECRET` (optional; the sweep endpoint refuses to run without it)
/// - `SMTP_RELAY`/`SMTP_USERNAME`/`SMTP_PASSWORD`/`SMTP_FROM` (optional as
///   a group; missing relay disables outbound mail)
pub struct ServerConfig {
    /// Socket address the server binds to.
    pub bind_addr: SocketAddr,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Cookie-session signing key.
    pub session_key: Key,
    /// Whether session cookies require HTTPS.
    pub cookie_secure: bool,
    /// Shared secret for the cron trigger.
    pub cron_secret: Option<String>,
    /// SMTP relay settings, when outbound mail is configured.
    pub smtp: Option<SmtpConfig>,
}

impl ServerConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Fails when `DATABASE_URL` is missing, `BIND_ADDR` is malformed, or
    /// no session key can be obtained.
    pub fn from_env() -> std::io::Result<Self> {
        let bind_addr: SocketAddr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".into())
            .parse()
            .map_err(|err| std::io::Error::other(format!("invalid BIND_ADDR: {err}")))?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| std::io::Error::other("DATABASE_URL is not set"))?;

        let session_key = load_session_key()?;

        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .map(|v| v != "0")
            .unwrap_or(true);

        let cron_secret = env::var("CRON_SECRET").ok().filter(|s| !s.is_empty());
        if cron_secret.is_none() {
            warn!("CRON_SECRET is not set; the deadline sweep endpoint will refuse to run");
        }

        Ok(Self {
            bind_addr,
            database_url,
            session_key,
            cookie_secure,
            cron_secret,
            smtp: load_smtp_config(),
        })
    }
}

fn load_session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

fn load_smtp_config() -> Option<SmtpConfig> {
    let relay = env::var("SMTP_RELAY").ok().filter(|s| !s.is_empty())?;
    Some(SmtpConfig {
        relay,
        username: env::var("SMTP_USERNAME").unwrap_or_default(),
        password: env::var("SMTP_PASSWORD").unwrap_or_default(),
        from: env::var("SMTP_FROM").unwrap_or_else(|_| "OrderFlow <noreply@localhost>".into()),
    })
}
