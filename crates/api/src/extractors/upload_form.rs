//! Multipart upload form extractor.
//!
//! Text fields are collected by name (first value wins) and turned into
//! [`ClientDetails`]. File parts under `documents` become [`FileItem`]s in
//! submission order.

use std::collections::HashMap;

use axum::extract::{FromRequest, Multipart, Request};
use docdrop_core::submission::{ClientDetails, FileItem, UploadRequest};
use tracing::debug;

use crate::error::ApiError;

/// Form field carrying the uploaded files.
pub const DOCUMENTS_FIELD: &str = "documents";

/// MIME type assumed when a file part declares none.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A parsed upload form.
#[derive(Debug)]
pub struct UploadForm(pub UploadRequest);

impl<S> FromRequest<S> for UploadForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state).await?;

        let mut fields: HashMap<String, String> = HashMap::new();
        let mut files = Vec::new();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            if let Some(filename) = field.file_name().map(str::to_owned) {
                if name != DOCUMENTS_FIELD {
                    debug!(field = %name, "Ignoring file under unexpected field");
                    continue;
                }
                let content_type = field
                    .content_type()
                    .unwrap_or(FALLBACK_CONTENT_TYPE)
                    .to_string();
                let content = field.bytes().await?;

                // Browsers send an empty part when no file was chosen.
                if filename.is_empty() && content.is_empty() {
                    continue;
                }
                files.push(FileItem::new(filename, content_type, content));
            } else {
                let value = field.text().await?;
                fields.entry(name).or_insert(value);
            }
        }

        Ok(Self(UploadRequest {
            client: ClientDetails::from_fields(&fields),
            files,
        }))
    }
}
