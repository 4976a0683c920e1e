//! Submission relay service.
//!
//! Validates an upload, stages its files, notifies the owner with the files
//! attached, and optionally confirms receipt to the client. Staged files are
//! removed before the call returns, whatever the outcome.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use docdrop_shared::{AppConfig, EmailError, OutgoingMail};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::compose;
use super::error::SubmissionError;
use super::policy::UploadPolicy;
use super::staging::StagingArea;
use super::types::{ClientDetails, FileItem, SubmissionReceipt, SubmissionRecord, UploadRequest};
use crate::notification::MailSender;

/// Time kept back from the request deadline for writing the response.
const RESPONSE_MARGIN: Duration = Duration::from_millis(500);

/// Relay behavior fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaySettings {
    /// Business name used in subjects and bodies.
    pub brand: String,
    /// Recipient of owner notifications.
    pub owner_email: String,
    /// Whether client receipts may be sent.
    pub send_client_receipt: bool,
    /// Upper bound on each mail send.
    pub mail_timeout: Duration,
    /// Directory for staged files.
    pub staging_dir: PathBuf,
}

impl RelaySettings {
    /// Derive settings from the application configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            brand: config.email.from_name.clone(),
            owner_email: config.email.owner_email.clone(),
            send_client_receipt: config.email.send_client_receipt,
            mail_timeout: config.email.timeout(),
            staging_dir: config.upload.staging_dir.clone(),
        }
    }
}

/// Why a mail did not go out.
enum DeliveryFailure {
    Failed(EmailError),
    TimedOut,
}

/// Service relaying uploads to the owner by email.
pub struct SubmissionService {
    policy: UploadPolicy,
    settings: RelaySettings,
    mailer: Arc<dyn MailSender>,
}

impl SubmissionService {
    /// Create a new submission service.
    #[must_use]
    pub fn new(policy: UploadPolicy, settings: RelaySettings, mailer: Arc<dyn MailSender>) -> Self {
        Self {
            policy,
            settings,
            mailer,
        }
    }

    /// Upload policy in force.
    #[must_use]
    pub const fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Handle one upload.
    ///
    /// Validation short-circuits at the first failure: file count, then per file
    /// in submission order its type, its size and the running total. Each file is
    /// staged as soon as it passes. The owner notification is the only fatal
    /// send; a failed client receipt is logged and otherwise ignored.
    ///
    /// Every send is bounded by the mail timeout and, when a `deadline` is given,
    /// by the time left before it, less a margin for the response. Staged files are
    /// removed before this returns.
    ///
    /// # Errors
    ///
    /// Returns a client error for rejected input, or an error if staging or the
    /// owner notification fails.
    pub async fn submit(
        &self,
        request: UploadRequest,
        deadline: Option<Instant>,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let UploadRequest { client, files } = request;

        if let Err(e) = self.policy.check_count(files.len()) {
            warn!(error = %e, "Upload rejected");
            return Err(e);
        }

        let mut staging = StagingArea::new(&self.settings.staging_dir);
        let result = self.relay(client, files, &mut staging, deadline).await;
        staging.clear().await;
        result
    }

    async fn relay(
        &self,
        client: ClientDetails,
        files: Vec<FileItem>,
        staging: &mut StagingArea,
        deadline: Option<Instant>,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let mut total = 0;
        for file in &files {
            total = self.policy.check_file(file, total).inspect_err(|e| {
                warn!(error = %e, filename = %file.filename, "Upload rejected");
            })?;
            staging.stage(file).await.inspect_err(|e| {
                error!(error = %e, dir = %self.settings.staging_dir.display(), "Failed to stage upload");
            })?;
        }
        drop(files);

        let record = SubmissionRecord::generate();
        let owner_mail = compose::owner_notification(
            &self.settings.brand,
            &self.settings.owner_email,
            &record,
            &client,
            staging.files(),
        );

        let budget = self.send_budget(deadline);
        match self.deliver(owner_mail, budget).await {
            Ok(()) => {}
            Err(DeliveryFailure::Failed(e)) => {
                error!(reference = %record.reference, error = %e, "Owner notification failed");
                return Err(SubmissionError::OwnerNotification(e));
            }
            Err(DeliveryFailure::TimedOut) => {
                error!(
                    reference = %record.reference,
                    timeout = ?budget,
                    "Owner notification timed out"
                );
                return Err(SubmissionError::OwnerNotificationTimeout(budget));
            }
        }

        info!(
            reference = %record.reference,
            files = staging.files().len(),
            bytes = total,
            "Submission relayed to owner"
        );

        if self.wants_receipt(&client) {
            self.send_receipt(&record, &client, deadline).await;
        }

        Ok(SubmissionReceipt {
            reference: record.reference,
            client,
            files: staging.basenames(),
        })
    }

    /// Time allowed for the next send.
    fn send_budget(&self, deadline: Option<Instant>) -> Duration {
        let Some(deadline) = deadline else {
            return self.settings.mail_timeout;
        };
        deadline
            .saturating_duration_since(Instant::now())
            .saturating_sub(RESPONSE_MARGIN)
            .min(self.settings.mail_timeout)
    }

    /// A receipt goes out only when enabled, addressed, and not declined.
    fn wants_receipt(&self, client: &ClientDetails) -> bool {
        self.settings.send_client_receipt
            && !client.client_email.is_empty()
            && client.wants_receipt
    }

    async fn send_receipt(
        &self,
        record: &SubmissionRecord,
        client: &ClientDetails,
        deadline: Option<Instant>,
    ) {
        let budget = self.send_budget(deadline);
        if budget.is_zero() {
            warn!(reference = %record.reference, "No time left for client receipt");
            return;
        }

        let mail = compose::client_receipt(&self.settings.brand, record, client);
        match self.deliver(mail, budget).await {
            Ok(()) => debug!(reference = %record.reference, "Client receipt sent"),
            Err(DeliveryFailure::Failed(e)) => {
                warn!(reference = %record.reference, error = %e, "Client receipt email error");
            }
            Err(DeliveryFailure::TimedOut) => {
                warn!(reference = %record.reference, timeout = ?budget, "Client receipt email timed out");
            }
        }
    }

    async fn deliver(&self, mail: OutgoingMail, budget: Duration) -> Result<(), DeliveryFailure> {
        match tokio::time::timeout(budget, self.mailer.send(mail)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(DeliveryFailure::Failed(e)),
            Err(_) => Err(DeliveryFailure::TimedOut),
        }
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
