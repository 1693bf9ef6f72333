//! Inline "KEY: value" record grammar.
//!
//! List elements in report documents often encode a single key/value pair as
//! one text line, e.g. `"HOME: 1515 Adela Ln"`. The walker parses these so
//! the embedded value can be classified and masked like any mapping entry.

use once_cell::sync::Lazy;
use regex::Regex;

// Key is a run of word characters or hyphens; at least one whitespace
// character must follow the colon.
static INLINE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([\w\-]+):\s+(.*)$").unwrap());

/// An embedded key/value pair parsed from a text scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlinePair<'a> {
    /// The embedded key, in its original case.
    pub key: &'a str,
    /// The text after the colon and its whitespace.
    pub value: &'a str,
}

/// Parse a text scalar as an inline record.
///
/// Returns `None` when the text is not an inline record; such scalars pass
/// through masking unchanged.
pub fn parse_line(text: &str) -> Option<InlinePair<'_>> {
    let caps = INLINE_PATTERN.captures(text)?;
    Some(InlinePair {
        key: caps.get(1)?.as_str(),
        value: caps.get(2)?.as_str(),
    })
}

/// Render an inline record back to its text form.
///
/// Whitespace after the colon is normalized to a single space.
pub fn render_line(key: &str, value: &str) -> String {
    format!("{}: {}", key, value)
}
