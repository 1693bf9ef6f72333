//! Recursive document masking.
//!
//! Walks a parsed document and replaces sensitive leaf values with vault
//! labels, preserving the document's shape exactly. Containers are always
//! recursed into, whatever their own key classifies as; classification only
//! decides what happens to scalar values.

use crate::inline;
use crate::label;
use crate::policy::MaskPolicy;
use crate::vault::TokenVault;
use crate::{KeyClass, Result};
use serde_json::{Map, Value};
use tracing::{error, warn};

/// Mask a document against a policy, minting labels into the vault.
///
/// The returned document has the same shape as the input; only scalar leaf
/// content changes. Data-level faults (unclassified keys, unsupported scalar
/// types, nesting beyond `max_depth`) degrade to logged diagnostics with the
/// affected node passed through unchanged; only store failures abort.
pub fn mask_document(policy: &MaskPolicy, vault: &mut TokenVault, doc: &Value) -> Result<Value> {
    mask_node(policy, vault, doc, 0)
}

fn mask_node(
    policy: &MaskPolicy,
    vault: &mut TokenVault,
    node: &Value,
    depth: usize,
) -> Result<Value> {
    if depth > policy.max_depth {
        error!(depth, "Recursion limit reached, passing subtree through unmasked");
        return Ok(node.clone());
    }

    match node {
        Value::Array(items) => {
            let mut masked = Vec::with_capacity(items.len());
            for item in items {
                masked.push(mask_node(policy, vault, item, depth + 1)?);
            }
            Ok(Value::Array(masked))
        }
        Value::Object(entries) => {
            let mut masked = Map::with_capacity(entries.len());
            for (key, value) in entries {
                masked.insert(key.clone(), mask_entry(policy, vault, key, value, depth + 1)?);
            }
            Ok(Value::Object(masked))
        }
        Value::String(text) => mask_text(policy, vault, text),
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(node.clone()),
        Value::Bool(_) => Ok(node.clone()),
        other => {
            error!(kind = value_kind(other), "Unsupported value type, passing through");
            Ok(other.clone())
        }
    }
}

/// Mask one mapping entry. Containers recurse regardless of the key's
/// classification; scalars go through the key rules.
fn mask_entry(
    policy: &MaskPolicy,
    vault: &mut TokenVault,
    key: &str,
    value: &Value,
    depth: usize,
) -> Result<Value> {
    if value.is_array() || value.is_object() {
        return mask_node(policy, vault, value, depth);
    }
    mask_scalar(policy, vault, key, value)
}

/// Text scalars reached as sequence elements or at the root may embed a
/// single "KEY: value" record; anything else passes through.
fn mask_text(policy: &MaskPolicy, vault: &mut TokenVault, text: &str) -> Result<Value> {
    match inline::parse_line(text) {
        Some(pair) => {
            let embedded = Value::String(pair.value.to_string());
            let masked = match mask_scalar(policy, vault, pair.key, &embedded)? {
                Value::String(s) => s,
                other => other.to_string(),
            };
            Ok(Value::String(inline::render_line(pair.key, &masked)))
        }
        None => Ok(Value::String(text.to_string())),
    }
}

fn mask_scalar(
    policy: &MaskPolicy,
    vault: &mut TokenVault,
    key: &str,
    value: &Value,
) -> Result<Value> {
    match policy.classify(key) {
        KeyClass::Masked => {
            let prefix = label::canonical_prefix(key);
            Ok(Value::String(vault.mask_value(&prefix, value)?))
        }
        KeyClass::Known => Ok(value.clone()),
        KeyClass::Unknown => match value {
            Value::String(_) => {
                warn!(key, "Unclassified key, masking value");
                let prefix = label::canonical_prefix(key);
                Ok(Value::String(vault.mask_value(&prefix, value)?))
            }
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
            Value::Bool(_) => Ok(value.clone()),
            other => {
                error!(key, kind = value_kind(other), "Unsupported value type, passing through");
                Ok(other.clone())
            }
        },
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
