//! Upload type and size policy.

use super::error::SubmissionError;
use super::types::FileItem;

/// Bytes in one mebibyte.
pub const MIB: u64 = 1024 * 1024;

/// Limits applied to every upload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Maximum number of files per request.
    pub max_files: usize,
    /// Maximum size of a single file in bytes.
    pub max_file_bytes: u64,
    /// Maximum combined size of all files in bytes.
    pub max_total_bytes: u64,
    /// Allowed declared MIME types.
    pub allowed_mime_types: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadPolicy {
    /// Default max file count.
    pub const DEFAULT_MAX_FILES: usize = 10;
    /// Default per-file cap: 20 MiB.
    pub const DEFAULT_MAX_FILE_BYTES: u64 = 20 * MIB;
    /// Default aggregate cap: 22 MiB, roughly what mail relays accept.
    pub const DEFAULT_MAX_TOTAL_BYTES: u64 = 22 * MIB;

    /// Create a policy with the default limits.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_files: Self::DEFAULT_MAX_FILES,
            max_file_bytes: Self::DEFAULT_MAX_FILE_BYTES,
            max_total_bytes: Self::DEFAULT_MAX_TOTAL_BYTES,
            allowed_mime_types: Self::default_mime_types(),
        }
    }

    /// Set maximum file count.
    #[must_use]
    pub fn with_max_files(mut self, max: usize) -> Self {
        self.max_files = max;
        self
    }

    /// Set per-file cap.
    #[must_use]
    pub fn with_max_file_bytes(mut self, bytes: u64) -> Self {
        self.max_file_bytes = bytes;
        self
    }

    /// Set aggregate cap.
    #[must_use]
    pub fn with_max_total_bytes(mut self, bytes: u64) -> Self {
        self.max_total_bytes = bytes;
        self
    }

    /// Default allowed MIME types: PDF, JPEG, PNG.
    #[must_use]
    pub fn default_mime_types() -> Vec<String> {
        vec![
            "application/pdf".to_string(),
            "image/jpeg".to_string(),
            "image/png".to_string(),
        ]
    }

    /// Check if a MIME type is allowed.
    #[must_use]
    pub fn is_mime_type_allowed(&self, mime_type: &str) -> bool {
        self.allowed_mime_types.iter().any(|t| t == mime_type)
    }

    /// Human-readable list of allowed types, e.g. `PDF, JPG, PNG`.
    #[must_use]
    pub fn allowed_label(&self) -> String {
        self.allowed_mime_types
            .iter()
            .map(|t| match t.as_str() {
                "application/pdf" => "PDF",
                "image/jpeg" => "JPG",
                "image/png" => "PNG",
                other => other,
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Largest request body worth reading: every file at its cap, plus form overhead.
    #[must_use]
    pub fn body_limit(&self) -> usize {
        let bytes = (self.max_files as u64)
            .saturating_mul(self.max_file_bytes)
            .saturating_add(MIB);
        usize::try_from(bytes).unwrap_or(usize::MAX)
    }

    /// Validate the number of files in a request.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no files or more than the maximum.
    pub fn check_count(&self, count: usize) -> Result<(), SubmissionError> {
        if count == 0 {
            return Err(SubmissionError::NoFiles);
        }
        if count > self.max_files {
            return Err(SubmissionError::TooManyFiles {
                count,
                max: self.max_files,
            });
        }
        Ok(())
    }

    /// Validate one file given the total of the files accepted before it.
    ///
    /// Checks run in order: declared type, per-file size, running total.
    /// Returns the new running total.
    ///
    /// # Errors
    ///
    /// Returns the first failed check.
    pub fn check_file(&self, file: &FileItem, total_so_far: u64) -> Result<u64, SubmissionError> {
        if !self.is_mime_type_allowed(&file.content_type) {
            return Err(SubmissionError::DisallowedType {
                mime_type: file.content_type.clone(),
                allowed: self.allowed_label(),
            });
        }

        let size = file.size();
        if size > self.max_file_bytes {
            return Err(SubmissionError::FileTooLarge {
                filename: file.filename.clone(),
                size,
                max_mb: self.max_file_bytes / MIB,
            });
        }

        let total = total_so_far.saturating_add(size);
        if total > self.max_total_bytes {
            return Err(SubmissionError::TotalTooLarge {
                total,
                max_mb: self.max_total_bytes / MIB,
            });
        }

        Ok(total)
    }
}

/// Render a byte count in MiB with two decimals, rounded half up.
#[must_use]
pub fn format_mib(bytes: u64) -> String {
    let hundredths = (u128::from(bytes) * 100 + u128::from(MIB / 2)) / u128::from(MIB);
    format!("{}.{:02}", hundredths / 100, hundredths % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn file(name: &str, mime: &str, size: usize) -> FileItem {
        FileItem::new(name, mime, vec![0u8; size])
    }

    #[test]
    fn test_policy_defaults() {
        let policy = UploadPolicy::default();
        assert_eq!(policy.max_files, 10);
        assert_eq!(policy.max_file_bytes, 20 * MIB);
        assert_eq!(policy.max_total_bytes, 22 * MIB);
        assert_eq!(policy.allowed_label(), "PDF, JPG, PNG");
    }

    #[rstest]
    #[case("application/pdf", true)]
    #[case("image/jpeg", true)]
    #[case("image/png", true)]
    #[case("image/gif", false)]
    #[case("text/html", false)]
    #[case("application/octet-stream", false)]
    #[case("APPLICATION/PDF", false)]
    fn test_mime_allow_list(#[case] mime: &str, #[case] allowed: bool) {
        assert_eq!(UploadPolicy::default().is_mime_type_allowed(mime), allowed);
    }

    #[test]
    fn test_check_count() {
        let policy = UploadPolicy::default();
        assert!(matches!(policy.check_count(0), Err(SubmissionError::NoFiles)));
        assert!(policy.check_count(1).is_ok());
        assert!(policy.check_count(10).is_ok());
        assert!(matches!(
            policy.check_count(11),
            Err(SubmissionError::TooManyFiles { count: 11, max: 10 })
        ));
    }

    #[test]
    fn test_type_checked_before_size() {
        let policy = UploadPolicy::default().with_max_file_bytes(4);
        let err = policy
            .check_file(&file("notes.txt", "text/plain", 10), 0)
            .unwrap_err();
        assert!(matches!(err, SubmissionError::DisallowedType { .. }));
    }

    #[test]
    fn test_file_at_cap_is_accepted() {
        let policy = UploadPolicy::default()
            .with_max_file_bytes(MIB)
            .with_max_total_bytes(2 * MIB);
        let total = policy
            .check_file(&file("a.pdf", "application/pdf", 1024 * 1024), 0)
            .expect("file at cap is allowed");
        assert_eq!(total, MIB);
    }

    #[test]
    fn test_file_over_cap_names_file() {
        let policy = UploadPolicy::default().with_max_file_bytes(MIB);
        let err = policy
            .check_file(&file("big scan.pdf", "application/pdf", 1024 * 1024 + 1), 0)
            .unwrap_err();
        assert_eq!(err.to_string(), "big scan.pdf too large (max 1MB per file)");
    }

    #[test]
    fn test_running_total_over_cap() {
        let policy = UploadPolicy::default()
            .with_max_file_bytes(MIB)
            .with_max_total_bytes(MIB + 10);
        let total = policy
            .check_file(&file("a.png", "image/png", 1024 * 1024), 0)
            .expect("first file fits");
        let err = policy
            .check_file(&file("b.png", "image/png", 11), total)
            .unwrap_err();
        assert!(matches!(err, SubmissionError::TotalTooLarge { max_mb: 1, .. }));
    }

    #[test]
    fn test_body_limit_covers_every_file_at_cap() {
        let policy = UploadPolicy::default();
        assert_eq!(policy.body_limit() as u64, 10 * 20 * MIB + MIB);
    }

    #[rstest]
    #[case(0, "0.00")]
    #[case(5_243, "0.01")]
    #[case(524_288, "0.50")]
    #[case(1_048_576, "1.00")]
    #[case(1_572_864, "1.50")]
    #[case(20 * 1_048_576, "20.00")]
    fn test_format_mib(#[case] bytes: u64, #[case] expected: &str) {
        assert_eq!(format_mib(bytes), expected);
    }
}
