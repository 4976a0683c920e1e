//! Submission error types.

use std::time::Duration;

use docdrop_shared::{AppError, EmailError};
use thiserror::Error;

/// Client-facing message when the owner notification cannot be sent.
pub const EMAIL_FAILED_MESSAGE: &str = "Email send failed. Check EMAIL_USER/PASS and size limits.";

/// Client-facing message when the owner notification does not finish in time.
pub const EMAIL_TIMEOUT_MESSAGE: &str = "Email send timed out. Please try again later.";

/// Client-facing message when uploaded files cannot be written to disk.
pub const STAGING_FAILED_MESSAGE: &str = "Could not store uploaded files.";

/// Submission errors.
///
/// Validation variants display exactly the message returned to the client.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The request carried no files.
    #[error("No files uploaded")]
    NoFiles,

    /// More files than the policy allows.
    #[error("Too many files (max {max})")]
    TooManyFiles {
        /// Submitted file count.
        count: usize,
        /// Maximum allowed count.
        max: usize,
    },

    /// Declared MIME type is not on the allow-list.
    #[error("Disallowed type: {mime_type}. Allowed: {allowed}")]
    DisallowedType {
        /// The rejected MIME type.
        mime_type: String,
        /// Human-readable allowed list.
        allowed: String,
    },

    /// A single file exceeds the per-file cap.
    #[error("{filename} too large (max {max_mb}MB per file)")]
    FileTooLarge {
        /// Submitted filename.
        filename: String,
        /// Measured size in bytes.
        size: u64,
        /// Per-file cap in MiB.
        max_mb: u64,
    },

    /// The running total exceeds the aggregate cap.
    #[error(
        "Total attachment size too large for email (limit ~{max_mb}MB). Please upload fewer/smaller files."
    )]
    TotalTooLarge {
        /// Running total in bytes at the point of failure.
        total: u64,
        /// Aggregate cap in MiB.
        max_mb: u64,
    },

    /// Writing a staged file failed.
    #[error("failed to stage upload: {0}")]
    Staging(#[from] std::io::Error),

    /// The owner notification could not be sent.
    #[error("owner notification failed: {0}")]
    OwnerNotification(#[source] EmailError),

    /// The owner notification did not complete in time.
    #[error("owner notification timed out after {0:?}")]
    OwnerNotificationTimeout(Duration),
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Staging(_) => Self::Internal(STAGING_FAILED_MESSAGE.to_string()),
            SubmissionError::OwnerNotification(_) => {
                Self::ExternalService(EMAIL_FAILED_MESSAGE.to_string())
            }
            SubmissionError::OwnerNotificationTimeout(_) => {
                Self::Timeout(EMAIL_TIMEOUT_MESSAGE.to_string())
            }
            validation => Self::Validation(validation.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(SubmissionError::NoFiles.to_string(), "No files uploaded");
        assert_eq!(
            SubmissionError::TooManyFiles { count: 11, max: 10 }.to_string(),
            "Too many files (max 10)"
        );
        assert_eq!(
            SubmissionError::DisallowedType {
                mime_type: "text/plain".into(),
                allowed: "PDF, JPG, PNG".into(),
            }
            .to_string(),
            "Disallowed type: text/plain. Allowed: PDF, JPG, PNG"
        );
        assert_eq!(
            SubmissionError::FileTooLarge {
                filename: "scan.pdf".into(),
                size: 21 * 1024 * 1024,
                max_mb: 20,
            }
            .to_string(),
            "scan.pdf too large (max 20MB per file)"
        );
        assert_eq!(
            SubmissionError::TotalTooLarge {
                total: 23 * 1024 * 1024,
                max_mb: 22,
            }
            .to_string(),
            "Total attachment size too large for email (limit ~22MB). Please upload fewer/smaller files."
        );
    }

    #[test]
    fn test_into_app_error() {
        let err: AppError = SubmissionError::NoFiles.into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.client_message(), "No files uploaded");

        let err: AppError =
            SubmissionError::OwnerNotification(EmailError::MissingCredentials).into();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.client_message(), EMAIL_FAILED_MESSAGE);

        let err: AppError =
            SubmissionError::OwnerNotificationTimeout(Duration::from_secs(60)).into();
        assert_eq!(err.status_code(), 504);
        assert_eq!(err.client_message(), EMAIL_TIMEOUT_MESSAGE);

        let err: AppError = SubmissionError::Staging(std::io::Error::other("disk full")).into();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.client_message(), STAGING_FAILED_MESSAGE);
    }
}
