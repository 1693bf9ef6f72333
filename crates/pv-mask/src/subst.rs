//! Reverse substitution of labels in rendered text.

use crate::label::LABEL_PATTERN;
use crate::vault::TokenVault;
use crate::Result;
use serde_json::Value;

/// Replace every vault-registered label in `text` with its original value.
///
/// One left-to-right pass: substituted content is never re-scanned, and
/// label-shaped substrings with no vault entry are copied through verbatim.
/// String values are inserted as-is; other scalars use their JSON rendering.
pub fn unmask_text(vault: &TokenVault, text: &str) -> Result<String> {
    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;

    for m in LABEL_PATTERN.find_iter(text) {
        output.push_str(&text[cursor..m.start()]);
        match vault.get(m.as_str())? {
            Some(Value::String(original)) => output.push_str(&original),
            Some(other) => output.push_str(&other.to_string()),
            None => output.push_str(m.as_str()),
        }
        cursor = m.end();
    }

    output.push_str(&text[cursor..]);
    Ok(output)
}
