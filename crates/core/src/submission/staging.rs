//! Request-scoped staging of uploaded files.
//!
//! Files are written under unique names so they can be handed to the mail
//! transport by path. A [`StagingArea`] owns every file it creates. Callers
//! remove them with [`StagingArea::clear`]; whatever is left is removed on drop,
//! which covers a cancelled request.

use std::path::{Path, PathBuf};

use docdrop_shared::MailAttachment;
use tracing::{debug, warn};

use super::filename::{display_name, staged_name};
use super::types::FileItem;

/// An uploaded file written to disk for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Full path of the staged copy.
    pub path: PathBuf,
    /// Sanitized filename shown in mail.
    pub display_name: String,
    /// Declared MIME type.
    pub content_type: String,
    /// Size in bytes.
    pub size: u64,
}

impl StagedFile {
    /// Basename of the staged copy.
    #[must_use]
    pub fn basename(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Attachment descriptor for the mail transport.
    #[must_use]
    pub fn to_attachment(&self) -> MailAttachment {
        MailAttachment {
            path: self.path.clone(),
            filename: self.display_name.clone(),
            content_type: self.content_type.clone(),
        }
    }
}

/// Owner of the staged files of one request.
#[derive(Debug)]
pub struct StagingArea {
    dir: PathBuf,
    files: Vec<StagedFile>,
    pending: Vec<PathBuf>,
}

impl StagingArea {
    /// Create an empty staging area rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            files: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Directory the files are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a file to a unique path.
    ///
    /// The path is registered for removal before any byte is written, so a
    /// partial write is still cleaned up.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub async fn stage(&mut self, file: &FileItem) -> std::io::Result<&StagedFile> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let display_name = display_name(&file.filename);
        let path = self.dir.join(staged_name(&display_name));
        self.pending.push(path.clone());

        tokio::fs::write(&path, &file.content).await?;
        debug!(path = %path.display(), size = file.size(), "Staged upload");

        self.files.push(StagedFile {
            path,
            display_name,
            content_type: file.content_type.clone(),
            size: file.size(),
        });
        Ok(&self.files[self.files.len() - 1])
    }

    /// Files staged so far, in submission order.
    #[must_use]
    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    /// Basenames of all staged files.
    #[must_use]
    pub fn basenames(&self) -> Vec<String> {
        self.files.iter().map(StagedFile::basename).collect()
    }

    /// Remove every staged file.
    ///
    /// Failures are logged and otherwise ignored.
    pub async fn clear(&mut self) {
        for path in self.pending.drain(..) {
            log_removal(&path, tokio::fs::remove_file(&path).await);
        }
    }
}

impl Drop for StagingArea {
    // Blocking removal; only reached when `clear` did not run.
    fn drop(&mut self) {
        for path in self.pending.drain(..) {
            log_removal(&path, std::fs::remove_file(&path));
        }
    }
}

fn log_removal(path: &Path, result: std::io::Result<()>) {
    match result {
        Ok(()) => debug!(path = %path.display(), "Removed staged upload"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove staged upload"),
    }
}
