//! Submission types and data structures.

use std::collections::HashMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Client-supplied form fields, trimmed and defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDetails {
    /// Client name.
    pub client_name: String,
    /// Client email, lower-cased.
    pub client_email: String,
    /// Client phone.
    pub client_phone: String,
    /// Free-form note from the client.
    #[serde(skip)]
    pub client_note: String,
    /// Requested return type.
    pub return_type: String,
    /// Number of dependents, as entered.
    pub dependents: String,
    /// Whether the client asked for a receipt.
    #[serde(skip)]
    pub wants_receipt: bool,
}

impl Default for ClientDetails {
    fn default() -> Self {
        Self {
            client_name: String::new(),
            client_email: String::new(),
            client_phone: String::new(),
            client_note: String::new(),
            return_type: String::new(),
            dependents: "0".to_string(),
            wants_receipt: true,
        }
    }
}

impl ClientDetails {
    /// Builds details from raw form fields.
    ///
    /// Missing fields take their defaults; present ones are trimmed. An empty
    /// `dependents` field counts as missing.
    #[must_use]
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let field = |name: &str| {
            fields
                .get(name)
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };

        let dependents = field("dependents");
        let wants_receipt = fields
            .get("wantsReceipt")
            .is_none_or(|value| docdrop_shared::config::is_truthy(value));

        Self {
            client_name: field("clientName"),
            client_email: field("clientEmail").to_lowercase(),
            client_phone: field("clientPhone"),
            client_note: field("clientMessage"),
            return_type: field("returnType"),
            dependents: if dependents.is_empty() {
                "0".to_string()
            } else {
                dependents
            },
            wants_receipt,
        }
    }
}

/// One uploaded file, held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileItem {
    /// Filename as submitted.
    pub filename: String,
    /// Declared MIME type.
    pub content_type: String,
    /// Raw content.
    pub content: Bytes,
}

impl FileItem {
    /// Creates a new file item.
    #[must_use]
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            content: content.into(),
        }
    }

    /// Measured size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

/// A complete upload request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadRequest {
    /// Client details.
    pub client: ClientDetails,
    /// Files in submission order.
    pub files: Vec<FileItem>,
}

/// Correlation data for one submission. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRecord {
    /// Reference token shared by both emails.
    pub reference: String,
    /// When the submission was accepted.
    pub received_at: DateTime<Utc>,
}

impl SubmissionRecord {
    /// Generates a fresh reference stamped with the current time.
    #[must_use]
    pub fn generate() -> Self {
        Self {
            reference: Uuid::new_v4().to_string(),
            received_at: Utc::now(),
        }
    }

    /// Timestamp rendered for humans, e.g. `2026-01-31 14:05:09 UTC`.
    #[must_use]
    pub fn received_label(&self) -> String {
        self.received_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }
}

/// Outcome of a relayed submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    /// Reference token.
    #[serde(rename = "ref")]
    pub reference: String,
    /// Echo of the client fields.
    #[serde(flatten)]
    pub client: ClientDetails,
    /// Staged file basenames, in submission order.
    pub files: Vec<String>,
}
