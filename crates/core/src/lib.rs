//! Core relay logic for Docdrop.
//!
//! This crate contains the upload handling rules with ZERO web dependencies.
//!
//! # Modules
//!
//! - `submission` - Validation, staging, and relaying of uploads
//! - `notification` - The outbound mail capability

pub mod notification;
pub mod submission;

pub use notification::MailSender;
pub use submission::{SubmissionError, SubmissionService};
