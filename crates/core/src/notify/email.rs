//! Templated outreach email over SMTP.
//!
//! Uses the `lettre` crate's async transport. The relay connection is
//! checked (and authenticated) once before the batch; individual send
//! failures are collected without aborting the remaining recipients.

use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::template::{render, Recipient};
use crate::config::SmtpConfig;
use crate::errors::MailError;

/// Per-recipient error strings included in a [`SendSummary`].
pub const MAX_REPORTED_ERRORS: usize = 10;

/// A batch of templated messages, one per recipient.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutreachRequest {
    #[serde(default)]
    pub email_subject: String,
    #[serde(default)]
    pub email_template: String,
    #[serde(default)]
    pub recipients: Vec<Recipient>,
    #[serde(default)]
    pub repo_url: String,
}

impl OutreachRequest {
    /// Reject batches that cannot produce a message.
    pub fn validate(&self) -> Result<(), MailError> {
        if self.email_subject.trim().is_empty() || self.email_template.trim().is_empty() {
            return Err(MailError::InvalidRequest(
                "Missing email subject or template".into(),
            ));
        }
        if self.recipients.is_empty() {
            return Err(MailError::InvalidRequest("No recipients provided".into()));
        }
        Ok(())
    }
}

/// Outcome of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendSummary {
    pub sent: usize,
    pub failed: usize,
    pub total: usize,
    pub errors: Vec<String>,
}

/// Sends outreach batches through the configured relay.
pub struct EmailDispatcher {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl EmailDispatcher {
    /// Build a dispatcher from resolved SMTP settings.
    ///
    /// Fails with [`MailError::MissingSettings`] naming every absent
    /// setting.
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let missing = config.missing_settings();
        if !missing.is_empty() {
            return Err(MailError::MissingSettings(missing));
        }

        // `missing_settings` guarantees these are present.
        let server = config.server.as_deref().unwrap_or_default().trim();
        let username = config.username.clone().unwrap_or_default();
        let password = config.password.clone().unwrap_or_default();
        let sender_raw = config.sender_email.as_deref().unwrap_or_default().trim();

        let sender: Mailbox = sender_raw.parse().map_err(|e| MailError::InvalidAddress {
            address: sender_raw.to_string(),
            detail: format!("{}", e),
        })?;

        let builder = if config.use_tls() {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(server)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(server)
        }
        .map_err(|e| MailError::Connection(e.to_string()))?;

        let transport = builder
            .port(config.port())
            .credentials(Credentials::new(username, password))
            .build();

        info!(
            smtp = %server,
            port = config.port(),
            starttls = config.use_tls(),
            from = %sender,
            "email dispatcher ready"
        );
        Ok(Self { transport, sender })
    }

    /// Send one message per recipient and summarize the outcome.
    #[instrument(skip(self, request), fields(recipients = request.recipients.len()))]
    pub async fn send_all(&self, request: &OutreachRequest) -> Result<SendSummary, MailError> {
        request.validate()?;

        match self.transport.test_connection().await {
            Ok(true) => debug!("SMTP connection verified"),
            Ok(false) => {
                return Err(MailError::Connection("relay refused the connection".into()))
            }
            Err(e) => return Err(MailError::Connection(e.to_string())),
        }

        let mut summary = SendSummary {
            total: request.recipients.len(),
            ..SendSummary::default()
        };

        for recipient in &request.recipients {
            let address = recipient.email.trim();
            if address.is_empty() {
                summary.failed += 1;
                continue;
            }

            let result = match build_message(&self.sender, request, recipient, address) {
                Ok(message) => self
                    .transport
                    .send(message)
                    .await
                    .map(|_| ())
                    .map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };

            match result {
                Ok(()) => {
                    info!(to = %address, "email sent");
                    summary.sent += 1;
                }
                Err(e) => {
                    warn!(to = %address, error = %e, "failed to send email");
                    summary.failed += 1;
                    summary.errors.push(format!("{}: {}", address, e));
                }
            }
        }

        summary.errors.truncate(MAX_REPORTED_ERRORS);
        info!(
            sent = summary.sent,
            failed = summary.failed,
            total = summary.total,
            "email batch finished"
        );
        Ok(summary)
    }
}

/// Build the plain-text message for one recipient.
pub fn build_message(
    sender: &Mailbox,
    request: &OutreachRequest,
    recipient: &Recipient,
    address: &str,
) -> Result<Message, MailError> {
    let to: Mailbox = address.parse().map_err(|e| MailError::InvalidAddress {
        address: address.to_string(),
        detail: format!("{}", e),
    })?;

    let body = render(&request.email_template, recipient, address, &request.repo_url);

    Message::builder()
        .from(sender.clone())
        .to(to)
        .subject(request.email_subject.trim())
        .header(ContentType::TEXT_PLAIN)
        .body(body)
        .map_err(|e| MailError::Send(format!("failed to build email: {}", e)))
}
