//! Label grammar for vault tokens.
//!
//! A label is `PREFIX_N`: an uppercase prefix derived from the document key,
//! an underscore, and a per-prefix counter, e.g. `EMAIL_1`, `ENTITY_NAME_3`.

use once_cell::sync::Lazy;
use regex::Regex;

// Uppercase letters and underscores, then underscore and counter digits.
pub(crate) static LABEL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z_]+_[0-9]+").unwrap());

/// Canonical label prefix for a document key.
pub fn canonical_prefix(key: &str) -> String {
    key.to_uppercase()
}

/// Format a label from a canonical prefix and counter.
pub fn format_label(prefix: &str, counter: u64) -> String {
    format!("{}_{}", prefix, counter)
}

/// Split a label into its prefix and counter.
///
/// Returns `None` when the text does not follow the label grammar.
pub fn parse_label(label: &str) -> Option<(&str, u64)> {
    let (prefix, digits) = label.rsplit_once('_')?;
    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_uppercase() || b == b'_') {
        return None;
    }
    if digits.is_empty() {
        return None;
    }
    let counter = digits.parse::<u64>().ok()?;
    Some((prefix, counter))
}

/// Whether a label belongs to a prefix.
///
/// Membership is exact: the label must be the prefix, an underscore, and a
/// counter. `HOMETOWN_1` does not belong to `HOME`.
pub fn belongs_to(label: &str, prefix: &str) -> bool {
    match label.strip_prefix(prefix).and_then(|rest| rest.strip_prefix('_')) {
        Some(digits) => !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}
