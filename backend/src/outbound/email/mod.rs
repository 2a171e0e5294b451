//! Outbound email adapters.

pub mod lettre_mailer;

use async_trait::async_trait;

use crate::domain::ports::{Mailer, MailerError, OutboundEmail};

pub use lettre_mailer::{LettreMailer, SmtpConfig};

/// Mailer used when no SMTP relay is configured.
///
/// Every send fails with a transport error, which best-effort workflow
/// steps log and swallow; only portal token issuance surfaces it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailerError> {
        Err(MailerError::transport(format!(
            "smtp is not configured; dropping mail to {}",
            email.to
        )))
    }
}
