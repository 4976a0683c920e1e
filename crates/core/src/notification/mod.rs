//! Outbound mail seam.
//!
//! The relay only needs "send this mail, tell me if it failed". [`MailSender`]
//! is that capability; [`EmailService`] provides it over SMTP, building a new
//! transport for every call so misconfiguration fails each attempt fast.

use async_trait::async_trait;
use docdrop_shared::{EmailError, EmailService, OutgoingMail};

/// Capability to deliver one mail.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailSender: Send + Sync {
    /// Deliver a mail.
    async fn send(&self, mail: OutgoingMail) -> Result<(), EmailError>;
}

#[async_trait]
impl MailSender for EmailService {
    async fn send(&self, mail: OutgoingMail) -> Result<(), EmailError> {
        self.send_mail(mail).await
    }
}

#[cfg(test)]
mod tests {
    use docdrop_shared::EmailConfig;

    use super::*;

    #[tokio::test]
    async fn test_email_service_fails_without_credentials() {
        let sender: Box<dyn MailSender> = Box::new(EmailService::new(EmailConfig::default()));
        let result = sender
            .send(OutgoingMail::new("owner@example.com", "subject", "body"))
            .await;
        assert!(matches!(result, Err(EmailError::MissingCredentials)));
    }
}
