//! Shared configuration, errors, and email transport for Docdrop.
//!
//! This crate provides common pieces used across all other crates:
//! - Application configuration loaded once at startup
//! - Application-wide error taxonomy with HTTP status mapping
//! - SMTP email service

pub mod config;
pub mod email;
pub mod error;

pub use config::{AppConfig, EmailConfig, ServerConfig, UploadConfig};
pub use email::{EmailError, EmailService, MailAttachment, OutgoingMail};
pub use error::AppError;
