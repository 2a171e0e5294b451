//! SMTP-backed `Mailer` implementation using lettre.
//!
//! Hands pre-rendered HTML messages to a transactional SMTP relay over
//! STARTTLS. The workflow layer decides whether a send failure matters;
//! this adapter only reports it.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::domain::ports::{Mailer, MailerError, OutboundEmail};

/// SMTP relay settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// Relay host name, e.g. `smtp.example.com`.
    pub relay: String,
    /// Relay username.
    pub username: String,
    /// Relay password.
    pub password: String,
    /// Sender address for all workflow mail, e.g.
    /// `OrderFlow <noreply@example.com>`.
    pub from: String,
}

/// Lettre-backed implementation of the mailer port.
#[derive(Clone, Debug)]
pub struct LettreMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl LettreMailer {
    /// Build a pooled STARTTLS transport for the configured relay.
    pub fn new(config: &SmtpConfig) -> Result<Self, MailerError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.relay)
            .map_err(|err| MailerError::transport(err.to_string()))?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|err| MailerError::rejected(format!("invalid sender address: {err}")))?;

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for LettreMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailerError> {
        let to = email
            .to
            .parse::<Mailbox>()
            .map_err(|err| MailerError::rejected(format!("invalid recipient address: {err}")))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html)
            .map_err(|err| MailerError::rejected(err.to_string()))?;

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|err| MailerError::transport(err.to_string()))
    }
}
