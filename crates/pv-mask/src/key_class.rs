//! Key classification for masking decisions.

use serde::{Deserialize, Serialize};

/// Classification of a document key.
///
/// Keys are looked up by exact name against the masking policy. A key found
/// in neither set is `Unknown`, whose string values are masked by default so
/// that newly introduced fields fail safe instead of leaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyClass {
    /// Structural or categorical metadata; value passes through unchanged.
    Known,
    /// Value always carries PII; always tokenized.
    Masked,
    /// In neither set; string values are masked and reported for review.
    Unknown,
}

impl KeyClass {
    /// Parse a key class from a string.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "known" => Some(KeyClass::Known),
            "masked" => Some(KeyClass::Masked),
            "unknown" => Some(KeyClass::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for KeyClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            KeyClass::Known => "known",
            KeyClass::Masked => "masked",
            KeyClass::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}
