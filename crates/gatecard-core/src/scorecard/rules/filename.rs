//! Filename sanitization for the trailing filename line.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref UNSAFE_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_.-]").unwrap();
}

/// Reduce a user-supplied filename to a safe ASCII form.
///
/// Compatibility-decomposes the name and drops non-ASCII characters, turns
/// path separators into spaces, joins whitespace-separated words with `_`,
/// removes every character outside `[A-Za-z0-9_.-]` and strips leading and
/// trailing dots and underscores. Dashes survive, so the roll number
/// delimiter is preserved.
pub fn sanitize_filename(filename: &str) -> String {
    let ascii: String = filename.nfkd().filter(char::is_ascii).collect();
    let ascii = ascii.replace(['/', '\\'], " ");
    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");

    UNSAFE_CHARS
        .replace_all(&joined, "")
        .trim_matches(|c: char| c == '.' || c == '_')
        .to_string()
}
