//! Upload submission relay.
//!
//! This module provides the business logic of an upload request:
//! - File count, type and size policy
//! - Filename sanitizing
//! - Request-scoped staging with guaranteed cleanup
//! - Owner notification and client receipt composition
//! - The relay service tying them together

pub mod compose;
pub mod error;
pub mod filename;
pub mod policy;
pub mod service;
pub mod staging;
pub mod types;

#[cfg(test)]
mod policy_props;

pub use error::{
    EMAIL_FAILED_MESSAGE, EMAIL_TIMEOUT_MESSAGE, STAGING_FAILED_MESSAGE, SubmissionError,
};
pub use filename::sanitize_filename;
pub use policy::{MIB, UploadPolicy, format_mib};
pub use service::{RelaySettings, SubmissionService};
pub use staging::{StagedFile, StagingArea};
pub use types::{ClientDetails, FileItem, SubmissionReceipt, SubmissionRecord, UploadRequest};
