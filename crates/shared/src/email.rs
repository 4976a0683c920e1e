//! Email service for relaying submissions.
//!
//! Uses `lettre` for SMTP transport. A transport is built for every send so that
//! missing credentials fail the attempt immediately instead of at startup.

use std::path::PathBuf;

use lettre::{
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Attachment, Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{AsyncSmtpTransportBuilder, authentication::Credentials},
};
use thiserror::Error;
use tracing::debug;

use crate::config::EmailConfig;

/// Submission port; the relay upgrades with STARTTLS instead of implicit TLS.
const STARTTLS_PORT: u16 = 587;

/// Whether connections to `port` negotiate TLS with STARTTLS.
const fn uses_starttls(port: u16) -> bool {
    port == STARTTLS_PORT
}

fn relay_builder(host: &str, port: u16) -> Result<AsyncSmtpTransportBuilder, EmailError> {
    let builder = if uses_starttls(port) {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::relay(host)
    };
    builder.map_err(|e| EmailError::SendError(e.to_string()))
}

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP username or password is not configured.
    #[error("Missing EMAIL_USER or EMAIL_PASS")]
    MissingCredentials,
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
    /// An attachment could not be read from disk.
    #[error("Failed to read attachment {path}: {reason}")]
    Attachment {
        /// Path of the attachment.
        path: PathBuf,
        /// Underlying I/O failure.
        reason: String,
    },
}

/// A file on disk to attach to an outgoing mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailAttachment {
    /// Location of the file content.
    pub path: PathBuf,
    /// Filename shown to the recipient.
    pub filename: String,
    /// MIME type of the content.
    pub content_type: String,
}

/// A plain-text mail with optional file attachments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
    /// Attachments, read from disk at send time.
    pub attachments: Vec<MailAttachment>,
}

impl OutgoingMail {
    /// Creates a mail without attachments.
    #[must_use]
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            attachments: Vec::new(),
        }
    }

    /// Sets the attachments.
    #[must_use]
    pub fn with_attachments(mut self, attachments: Vec<MailAttachment>) -> Self {
        self.attachments = attachments;
        self
    }
}

/// A connected-on-demand SMTP sender.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Creates an SMTP sender from the configured credentials.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError::MissingCredentials`] if either credential is empty, or
    /// an error if the username is not an address or the relay host is invalid.
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        if !config.has_credentials() {
            return Err(EmailError::MissingCredentials);
        }

        let address = config
            .username
            .parse::<Address>()
            .map_err(|e| EmailError::InvalidAddress(e.to_string()))?;
        let name = (!config.from_name.is_empty()).then(|| config.from_name.clone());

        let creds = Credentials::new(config.username.clone(), config.password.clone());

        let transport = relay_builder(&config.smtp_host, config.smtp_port)?
            .port(config.smtp_port)
            .credentials(creds)
            .timeout(Some(config.timeout()))
            .build();

        Ok(Self {
            transport,
            from: Mailbox::new(name, address),
        })
    }

    /// Sends a mail.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be built or the relay rejects it.
    pub async fn send(&self, mail: OutgoingMail) -> Result<(), EmailError> {
        debug!(to = %mail.to, subject = %mail.subject, "Sending mail");

        let message = build_message(self.from.clone(), mail).await?;
        self.transport
            .send(message)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        Ok(())
    }
}

/// Builds the lettre message, reading attachments from disk.
///
/// # Errors
///
/// Returns an error if the recipient is invalid or an attachment cannot be read.
pub async fn build_message(from: Mailbox, mail: OutgoingMail) -> Result<Message, EmailError> {
    let builder = Message::builder()
        .from(from)
        .to(mail
            .to
            .parse::<Mailbox>()
            .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?)
        .subject(mail.subject);

    if mail.attachments.is_empty() {
        return builder
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body)
            .map_err(|e| EmailError::BuildError(e.to_string()));
    }

    let mut mixed = MultiPart::mixed().singlepart(SinglePart::plain(mail.body));
    for attachment in mail.attachments {
        let content = tokio::fs::read(&attachment.path)
            .await
            .map_err(|e| EmailError::Attachment {
                path: attachment.path.clone(),
                reason: e.to_string(),
            })?;
        let content_type = ContentType::parse(&attachment.content_type)
            .map_err(|e| EmailError::BuildError(e.to_string()))?;
        mixed = mixed.singlepart(Attachment::new(attachment.filename).body(content, content_type));
    }

    builder
        .multipart(mixed)
        .map_err(|e| EmailError::BuildError(e.to_string()))
}

/// Email service holding the relay configuration.
#[derive(Debug, Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new email service.
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Creates a fresh SMTP sender.
    ///
    /// # Errors
    ///
    /// Fails immediately if credentials are missing.
    pub fn connect(&self) -> Result<SmtpMailer, EmailError> {
        SmtpMailer::new(&self.config)
    }

    /// Sends a mail through a freshly built transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot be created or the send fails.
    pub async fn send_mail(&self, mail: OutgoingMail) -> Result<(), EmailError> {
        self.connect()?.send(mail).await
    }
}

#[cfg(test)]
#[path = "email_tests.rs"]
mod tests;
