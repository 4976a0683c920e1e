//! Filename sanitizing for staged uploads.

use uuid::Uuid;

/// Reduce a client-supplied filename to a safe basename.
///
/// Path separators become word breaks, whitespace runs collapse to `_`, and only
/// ASCII letters, digits, `.`, `-` and `_` survive. Leading and trailing `.`/`_`
/// are stripped so the result can never be `..` or a hidden file. May return an
/// empty string.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    let spaced = filename.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Sanitize a filename, falling back to a random name when nothing survives.
#[must_use]
pub fn display_name(filename: &str) -> String {
    let sanitized = sanitize_filename(filename);
    if sanitized.is_empty() {
        format!("file-{}", Uuid::new_v4().simple())
    } else {
        sanitized
    }
}

/// Unique on-disk name for a staged file: random token plus the display name.
#[must_use]
pub fn staged_name(display_name: &str) -> String {
    format!("{}-{display_name}", Uuid::new_v4().simple())
}
