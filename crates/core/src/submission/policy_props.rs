//! Property-based tests for upload policy and filename sanitizing.

use proptest::prelude::*;

use super::error::SubmissionError;
use super::filename::{display_name, sanitize_filename};
use super::policy::UploadPolicy;
use super::types::FileItem;

/// Strategy for filenames mixing safe characters, separators and unicode.
fn filename_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[A-Za-z0-9]{1,6}",
            Just("/".to_string()),
            Just("\\".to_string()),
            Just("..".to_string()),
            Just(" ".to_string()),
            Just(".".to_string()),
            Just("_".to_string()),
            Just("-".to_string()),
            "[^\\x00-\\x7F]{1,3}",
        ],
        0..12,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn prop_sanitized_names_are_safe(name in filename_strategy()) {
        let sanitized = sanitize_filename(&name);
        prop_assert!(sanitized
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')));
        prop_assert!(!sanitized.starts_with('.'));
        prop_assert!(!sanitized.ends_with('.'));
        prop_assert!(!sanitized.starts_with('_'));
    }

    #[test]
    fn prop_display_name_is_never_empty(name in filename_strategy()) {
        prop_assert!(!display_name(&name).is_empty());
    }

    #[test]
    fn prop_running_total_fails_exactly_when_sum_exceeds_cap(
        sizes in prop::collection::vec(0usize..64, 1..10),
        cap in 0u64..256,
    ) {
        let policy = UploadPolicy::default()
            .with_max_file_bytes(64)
            .with_max_total_bytes(cap);

        let mut total = 0u64;
        let mut expected_sum = 0u64;
        for (i, size) in sizes.iter().enumerate() {
            expected_sum += *size as u64;
            let file = FileItem::new(format!("{i}.png"), "image/png", vec![0u8; *size]);
            match policy.check_file(&file, total) {
                Ok(next) => {
                    prop_assert!(expected_sum <= cap);
                    prop_assert_eq!(next, expected_sum);
                    total = next;
                }
                Err(SubmissionError::TotalTooLarge { total: reported, .. }) => {
                    prop_assert!(expected_sum > cap);
                    prop_assert_eq!(reported, expected_sum);
                    break;
                }
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn prop_count_check_matches_limit(count in 0usize..40, max in 1usize..20) {
        let policy = UploadPolicy::default().with_max_files(max);
        let result = policy.check_count(count);
        prop_assert_eq!(result.is_ok(), count >= 1 && count <= max);
    }
}
