//! Request extractors.

pub mod upload_form;

pub use upload_form::UploadForm;
