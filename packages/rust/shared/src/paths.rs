//! Path segment sanitizing for component titles.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, SnippetLibError};

/// Separator substituted for every character outside `[A-Za-z0-9_.]`.
const SEPARATOR: char = '_';

/// Turn an arbitrary title into a file-name-safe path segment.
///
/// Lowercases, replaces each character outside ASCII word characters and `.`
/// with `_`, then strips leading and trailing `_`. The result may be empty;
/// use [`sanitize_segment`] where an empty segment is not acceptable.
pub fn sanitize(text: &str) -> String {
    static UNSAFE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.]").expect("valid regex"));

    let lowered = text.to_lowercase();
    let replaced = UNSAFE_RE.replace_all(&lowered, SEPARATOR.to_string().as_str());
    replaced.trim_matches(SEPARATOR).to_string()
}

/// Like [`sanitize`], but rejects titles that sanitize to nothing, or to a
/// segment made only of dots (`.`/`..` would leave the page directory).
pub fn sanitize_segment(title: &str) -> Result<String> {
    let segment = sanitize(title);
    if segment.is_empty() {
        return Err(SnippetLibError::extraction(
            title,
            "title sanitizes to an empty path segment",
        ));
    }
    if segment.chars().all(|c| c == '.') {
        return Err(SnippetLibError::extraction(
            title,
            format!("title sanitizes to the reserved path segment '{segment}'"),
        ));
    }
    Ok(segment)
}
