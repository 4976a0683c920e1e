//! HTTP error responses.
//!
//! Every failure is rendered as `{ "ok": false, "error": "<message>" }`.

use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use docdrop_core::SubmissionError;
use docdrop_shared::AppError;
use serde_json::json;

/// Error returned by API handlers.
#[derive(Debug)]
pub enum ApiError {
    /// An application error with its own status mapping.
    App(AppError),
    /// The request body could not be read as a multipart form.
    Malformed {
        /// Status chosen by the body reader (400, or 413 past the body limit).
        status: StatusCode,
        /// Reason reported to the client.
        message: String,
    },
}

impl ApiError {
    /// HTTP status of this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::App(err) => StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Self::Malformed { status, .. } => *status,
        }
    }

    /// Message shown to the client.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::App(err) => err.client_message(),
            Self::Malformed { message, .. } => message,
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        Self::App(err.into())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::Malformed {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::Malformed {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(json!({
                "ok": false,
                "error": self.message(),
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use docdrop_shared::EmailError;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(SubmissionError::NoFiles, StatusCode::BAD_REQUEST, "No files uploaded")]
    #[case(
        SubmissionError::TooManyFiles { count: 12, max: 10 },
        StatusCode::BAD_REQUEST,
        "Too many files (max 10)"
    )]
    #[case(
        SubmissionError::OwnerNotification(EmailError::MissingCredentials),
        StatusCode::INTERNAL_SERVER_ERROR,
        "Email send failed. Check EMAIL_USER/PASS and size limits."
    )]
    #[case(
        SubmissionError::OwnerNotificationTimeout(Duration::from_secs(60)),
        StatusCode::GATEWAY_TIMEOUT,
        "Email send timed out. Please try again later."
    )]
    fn test_submission_error_mapping(
        #[case] err: SubmissionError,
        #[case] status: StatusCode,
        #[case] message: &str,
    ) {
        let err = ApiError::from(err);
        assert_eq!(err.status(), status);
        assert_eq!(err.message(), message);
    }

    #[test]
    fn test_malformed_keeps_reader_status() {
        let err = ApiError::Malformed {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "length limit exceeded".to_string(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
