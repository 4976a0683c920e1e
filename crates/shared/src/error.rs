//! Application-wide error types.

use thiserror::Error;

/// Application error types.
///
/// Every variant carries the human-readable message shown to the client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client input was rejected.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An outbound dependency (the mail relay) failed.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// An outbound dependency did not answer in time.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Timeout(_) => 504,
            Self::ExternalService(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the message intended for the client, without the category prefix.
    #[must_use]
    pub fn client_message(&self) -> &str {
        match self {
            Self::Validation(msg)
            | Self::ExternalService(msg)
            | Self::Timeout(msg)
            | Self::Internal(msg) => msg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(AppError::ExternalService(String::new()).status_code(), 500);
        assert_eq!(AppError::Timeout(String::new()).status_code(), 504);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_client_message_has_no_prefix() {
        assert_eq!(
            AppError::Validation("No files uploaded".into()).client_message(),
            "No files uploaded"
        );
        assert_eq!(
            AppError::Timeout("slow".into()).client_message(),
            "slow"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Validation("msg".into()).to_string(),
            "Validation error: msg"
        );
        assert_eq!(
            AppError::ExternalService("msg".into()).to_string(),
            "External service error: msg"
        );
        assert_eq!(AppError::Timeout("msg".into()).to_string(), "Timeout: msg");
        assert_eq!(
            AppError::Internal("msg".into()).to_string(),
            "Internal error: msg"
        );
    }
}
