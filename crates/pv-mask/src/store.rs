//! Pluggable token storage.
//!
//! The vault talks to its storage through [`TokenStore`], so sessions that
//! outgrow memory can back the same label space with a disk or network store.
//! The in-memory default suffices for single-session use and never fails.

use crate::label;
use crate::Result;
use serde_json::{Map, Value};

/// Storage backend for vault tokens.
///
/// Implementations map labels to original values. Labels are never
/// overwritten or removed. `scan` must visit entries in insertion order so
/// that reuse always finds the first label minted for a (prefix, value) pair.
pub trait TokenStore {
    /// Look up the value stored under a label.
    fn get(&self, label: &str) -> Result<Option<Value>>;

    /// Store a value under a fresh label.
    fn insert(&mut self, label: &str, value: Value) -> Result<()>;

    /// Number of stored tokens.
    fn len(&self) -> Result<usize>;

    /// Whether the store holds no tokens.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Visit every (label, value) pair in insertion order until the visitor
    /// returns `false`.
    fn scan(&self, visit: &mut dyn FnMut(&str, &Value) -> bool) -> Result<()>;

    /// Find the label under `prefix` already mapping to `value`.
    ///
    /// The default implementation is a linear scan over all entries. A store
    /// may override it with a reverse index, provided it still returns the
    /// earliest matching label and checks prefix membership exactly.
    fn find_label(&self, prefix: &str, value: &Value) -> Result<Option<String>> {
        let mut found = None;
        self.scan(&mut |label, stored| {
            if label::belongs_to(label, prefix) && stored == value {
                found = Some(label.to_string());
                return false;
            }
            true
        })?;
        Ok(found)
    }
}

/// In-memory token store backed by an insertion-ordered map.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    tokens: Map<String, Value>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self { tokens: Map::new() }
    }

    /// Create a store over an existing label/value map.
    pub fn from_map(tokens: Map<String, Value>) -> Self {
        Self { tokens }
    }

    /// Consume the store, yielding the raw label/value map.
    pub fn into_map(self) -> Map<String, Value> {
        self.tokens
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, label: &str) -> Result<Option<Value>> {
        Ok(self.tokens.get(label).cloned())
    }

    fn insert(&mut self, label: &str, value: Value) -> Result<()> {
        self.tokens.insert(label.to_string(), value);
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.tokens.len())
    }

    fn scan(&self, visit: &mut dyn FnMut(&str, &Value) -> bool) -> Result<()> {
        for (label, value) in &self.tokens {
            if !visit(label, value) {
                break;
            }
        }
        Ok(())
    }
}
