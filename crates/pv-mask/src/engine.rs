//! Main masking engine.
//!
//! The MaskingEngine is the central component pairing a policy with a
//! session vault, so `mask` and `unmask` operate over the same token space.

use crate::policy::MaskPolicy;
use crate::vault::TokenVault;
use crate::{subst, walker, Result};
use serde_json::Value;

/// The main masking engine.
pub struct MaskingEngine {
    /// The masking policy.
    policy: MaskPolicy,

    /// The session vault.
    vault: TokenVault,
}

impl MaskingEngine {
    /// Create an engine with the given policy and an empty in-memory vault.
    pub fn new(policy: MaskPolicy) -> Self {
        Self {
            policy,
            vault: TokenVault::new(),
        }
    }

    /// Create an engine over an existing vault, e.g. restored from a
    /// snapshot so earlier labels keep their meaning.
    pub fn with_vault(policy: MaskPolicy, vault: TokenVault) -> Self {
        Self { policy, vault }
    }

    /// Mask a document, minting labels into the session vault.
    pub fn mask(&mut self, doc: &Value) -> Result<Value> {
        walker::mask_document(&self.policy, &mut self.vault, doc)
    }

    /// Substitute vault labels in rendered text with their original values.
    pub fn unmask(&self, text: &str) -> Result<String> {
        subst::unmask_text(&self.vault, text)
    }

    /// Get a reference to the policy.
    pub fn policy(&self) -> &MaskPolicy {
        &self.policy
    }

    /// Get a reference to the session vault.
    pub fn vault(&self) -> &TokenVault {
        &self.vault
    }

    /// Consume the engine, yielding the session vault.
    pub fn into_vault(self) -> TokenVault {
        self.vault
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mask_then_unmask_recovers_value() {
        let mut engine = MaskingEngine::new(MaskPolicy::default());

        let masked = engine.mask(&json!({"EMAIL": "a@b.com"})).unwrap();
        assert_eq!(masked, json!({"EMAIL": "EMAIL_1"}));
        assert_eq!(
            engine.vault().get("EMAIL_1").unwrap(),
            Some(json!("a@b.com"))
        );

        let restored = engine.unmask("contact EMAIL_1 today").unwrap();
        assert_eq!(restored, "contact a@b.com today");
    }

    #[test]
    fn test_engine_over_restored_vault() {
        let mut first = MaskingEngine::new(MaskPolicy::default());
        first.mask(&json!({"EMAIL": "a@b.com"})).unwrap();
        let snapshot = first.into_vault().snapshot().unwrap();

        let second = MaskingEngine::with_vault(
            MaskPolicy::default(),
            TokenVault::from_snapshot(snapshot),
        );
        assert_eq!(second.unmask("EMAIL_1").unwrap(), "a@b.com");
    }

    #[test]
    fn test_sessions_are_independent() {
        let doc = json!({"EMAIL": "a@b.com"});

        let mut one = MaskingEngine::new(MaskPolicy::default());
        let mut two = MaskingEngine::new(MaskPolicy::default());
        one.mask(&doc).unwrap();

        // A fresh session has no knowledge of another session's labels.
        assert_eq!(two.unmask("EMAIL_1").unwrap(), "EMAIL_1");
        two.mask(&json!({"EMAIL": "z@y.com"})).unwrap();
        assert_eq!(two.unmask("EMAIL_1").unwrap(), "z@y.com");
    }
}
