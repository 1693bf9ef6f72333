//! Reversible PII masking for entity resolution reports.
//!
//! This crate masks the sensitive values inside nested report documents with
//! synthetic, reversible tokens, so the documents can be logged, shared, or
//! displayed safely and the original values recovered later from the same
//! session's vault.
//!
//! # Key Features
//!
//! - **Key-driven classification**: Each field name classifies as known
//!   (safe metadata), masked (always PII), or unknown; unknown string values
//!   fail safe and are masked with a warning.
//! - **Reversible tokens**: The vault holds a label-to-value bijection with
//!   per-prefix counters; equal values under the same prefix reuse their
//!   label, and equal values under different prefixes never share one.
//! - **Shape-preserving traversal**: Masking never changes the structure of
//!   a document, including inline `"KEY: value"` records inside list items.
//! - **Text-level unmasking**: Any text rendered from a masked document can
//!   be restored with a single substitution pass over the vault.
//! - **Pluggable storage**: Vaults that outgrow memory can back the token
//!   space with a caller-supplied store.
//!
//! # Example
//!
//! ```
//! use pv_mask::{MaskPolicy, MaskingEngine};
//! use serde_json::json;
//!
//! let mut engine = MaskingEngine::new(MaskPolicy::default());
//!
//! let masked = engine.mask(&json!({"EMAIL": "bsmith@work.com"})).unwrap();
//! assert_eq!(masked, json!({"EMAIL": "EMAIL_1"}));
//!
//! let restored = engine.unmask("send to EMAIL_1").unwrap();
//! assert_eq!(restored, "send to bsmith@work.com");
//! ```

pub mod engine;
pub mod error;
pub mod inline;
pub mod key_class;
pub mod label;
pub mod policy;
pub mod store;
pub mod subst;
pub mod vault;
pub mod walker;

pub use engine::MaskingEngine;
pub use error::{MaskError, Result};
pub use key_class::KeyClass;
pub use policy::{MaskPolicy, DEFAULT_MAX_DEPTH, POLICY_SCHEMA_VERSION};
pub use store::{MemoryTokenStore, TokenStore};
pub use subst::unmask_text;
pub use vault::{TokenVault, VaultSnapshot, VAULT_SCHEMA_VERSION};
pub use walker::mask_document;
