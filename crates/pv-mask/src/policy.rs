//! Masking policy configuration.
//!
//! Defines which document keys are safe to pass through and which always
//! carry PII, plus the traversal depth limit. The default vocabularies cover
//! the fields of entity resolution report documents.

use crate::KeyClass;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Schema version for the policy file.
pub const POLICY_SCHEMA_VERSION: &str = "1.0.0";

/// Default recursion limit for document traversal.
///
/// Matches serde_json's own recursion limit so the walker never rejects a
/// document the deserializer accepted.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Report fields that are structural or categorical, safe to pass through.
const DEFAULT_KNOWN_KEYS: &[&str] = &[
    "AMOUNT",
    "CANDIDATE_CAP_REACHED",
    "CANDIDATE_FEAT_USAGE_TYPE",
    "CATEGORY",
    "DATE",
    "ENTITY_ID",
    "ENTITY_TYPE",
    "ERRULE_CODE",
    "FIRST_SEEN_DT",
    "FTYPE_CODE",
    "INBOUND_FEAT_USAGE_TYPE",
    "INBOUND_VIRTUAL_ENTITY_ID",
    "IS_AMBIGUOUS",
    "IS_DISCLOSED",
    "LAST_SEEN_DT",
    "MATCH_KEY",
    "MATCH_LEVEL",
    "MATCH_LEVEL_CODE",
    "RECORD_TYPE",
    "RESULT_VIRTUAL_ENTITY_ID",
    "SCORE_BEHAVIOR",
    "SCORE_BUCKET",
    "SCORING_CAP_REACHED",
    "SOURCE",
    "STATUS",
    "SUPPRESSED",
    "TOKEN",
    "USAGE_TYPE",
    "USED_FOR_CAND",
    "USED_FOR_SCORING",
    "VIRTUAL_ENTITY_ID",
    "WHY_ERRULE_CODE",
    "WHY_KEY",
];

/// Report fields whose values always carry PII.
const DEFAULT_MASKED_KEYS: &[&str] = &[
    "ACCT_NUM",
    "CANDIDATE_FEAT_DESC",
    "DATA_SOURCE",
    "DOB",
    "DRLIC",
    "EMAIL",
    "ENTITY_DESC",
    "ENTITY_KEY",
    "ENTITY_NAME",
    "FEAT_DESC",
    "HOME",
    "INBOUND_FEAT_DESC",
    "ISSUING_BANK",
    "MAILING",
    "MOBILE",
    "PRIMARY",
    "RECORD_ID",
];

/// Masking policy configuration.
///
/// Keys in `known_keys` pass through unmasked; keys in `masked_keys` are
/// always tokenized; everything else classifies as unknown and fails safe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskPolicy {
    /// Schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Keys whose values are structural metadata, never masked.
    #[serde(default)]
    pub known_keys: BTreeSet<String>,

    /// Keys whose values always carry PII, always masked.
    #[serde(default)]
    pub masked_keys: BTreeSet<String>,

    /// Maximum traversal depth before a subtree is passed through unmasked.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_schema_version() -> String {
    POLICY_SCHEMA_VERSION.to_string()
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl MaskPolicy {
    /// Create a policy with the default vocabularies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a policy with empty key sets.
    ///
    /// Every key classifies as unknown until `mask_key`/`allow_key` are used.
    pub fn empty() -> Self {
        Self {
            schema_version: POLICY_SCHEMA_VERSION.to_string(),
            known_keys: BTreeSet::new(),
            masked_keys: BTreeSet::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Load policy from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let policy: MaskPolicy = serde_json::from_str(&content)?;
        Ok(policy)
    }

    /// Save policy to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Classify a document key.
    ///
    /// A key present in both sets is treated as masked.
    pub fn classify(&self, key: &str) -> KeyClass {
        if self.masked_keys.contains(key) {
            KeyClass::Masked
        } else if self.known_keys.contains(key) {
            KeyClass::Known
        } else {
            KeyClass::Unknown
        }
    }

    /// Add a key to the masked set.
    pub fn mask_key(&mut self, key: impl Into<String>) {
        self.masked_keys.insert(key.into());
    }

    /// Add a key to the known set.
    pub fn allow_key(&mut self, key: impl Into<String>) {
        self.known_keys.insert(key.into());
    }
}

impl Default for MaskPolicy {
    fn default() -> Self {
        Self {
            schema_version: POLICY_SCHEMA_VERSION.to_string(),
            known_keys: DEFAULT_KNOWN_KEYS.iter().map(|k| k.to_string()).collect(),
            masked_keys: DEFAULT_MASKED_KEYS.iter().map(|k| k.to_string()).collect(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
