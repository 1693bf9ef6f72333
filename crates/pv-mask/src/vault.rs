//! Token vault: the label/value bijection and its counters.

use crate::label;
use crate::store::{MemoryTokenStore, TokenStore};
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::error;

/// Schema version for vault snapshot files.
pub const VAULT_SCHEMA_VERSION: &str = "1.0.0";

/// Append-only store of label to original-value mappings.
///
/// One vault spans one masking session. A label minted by [`mask_value`] is
/// never reassigned or removed, and the same (prefix, value) pair always
/// yields the same label within the session. Counters are keyed by canonical
/// prefix and only ever increase.
///
/// [`mask_value`]: TokenVault::mask_value
pub struct TokenVault {
    store: Box<dyn TokenStore + Send>,
    counters: BTreeMap<String, u64>,
}

impl TokenVault {
    /// Create an empty vault over the in-memory store.
    pub fn new() -> Self {
        Self::with_store(Box::new(MemoryTokenStore::new()))
    }

    /// Create an empty vault over a caller-supplied store.
    pub fn with_store(store: Box<dyn TokenStore + Send>) -> Self {
        Self {
            store,
            counters: BTreeMap::new(),
        }
    }

    /// Restore a vault from a snapshot.
    ///
    /// Counters are raised to the highest counter present among the stored
    /// labels, so a snapshot with stale counters can never re-mint a label.
    pub fn from_snapshot(snapshot: VaultSnapshot) -> Self {
        let mut counters = snapshot.counters;
        for stored in snapshot.tokens.keys() {
            if let Some((prefix, counter)) = label::parse_label(stored) {
                let entry = counters.entry(prefix.to_string()).or_insert(0);
                if *entry < counter {
                    *entry = counter;
                }
            }
        }
        Self {
            store: Box::new(MemoryTokenStore::from_map(snapshot.tokens)),
            counters,
        }
    }

    /// Mask a value under a canonical key prefix, returning its label.
    ///
    /// Reuses the label already mapping to an equal value under the same
    /// prefix; otherwise mints `PREFIX_N` with the prefix's next counter.
    pub fn mask_value(&mut self, prefix: &str, value: &Value) -> Result<String> {
        if let Some(existing) = self.store.find_label(prefix, value)? {
            return Ok(existing);
        }

        let counter = self.counters.entry(prefix.to_string()).or_insert(0);
        *counter += 1;
        let fresh = label::format_label(prefix, *counter);

        // A label that coincides with its own plaintext would survive
        // masking verbatim. Record it anyway; unmasking maps it to itself.
        if value.as_str() == Some(fresh.as_str()) {
            error!(label = %fresh, "Masked value is identical to its label");
        }

        self.store.insert(&fresh, value.clone())?;
        Ok(fresh)
    }

    /// Look up the original value for a label.
    pub fn get(&self, label: &str) -> Result<Option<Value>> {
        self.store.get(label)
    }

    /// Number of tokens in the vault.
    pub fn len(&self) -> Result<usize> {
        self.store.len()
    }

    /// Whether the vault holds no tokens.
    pub fn is_empty(&self) -> Result<bool> {
        self.store.is_empty()
    }

    /// Export the vault for persistence.
    pub fn snapshot(&self) -> Result<VaultSnapshot> {
        let mut tokens = Map::new();
        self.store.scan(&mut |stored, value| {
            tokens.insert(stored.to_string(), value.clone());
            true
        })?;
        Ok(VaultSnapshot {
            schema_version: VAULT_SCHEMA_VERSION.to_string(),
            tokens,
            counters: self.counters.clone(),
        })
    }
}

impl Default for TokenVault {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialized form of a vault for persistence across sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultSnapshot {
    /// Schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Stored tokens in insertion order.
    pub tokens: Map<String, Value>,

    /// Per-prefix counters at snapshot time.
    #[serde(default)]
    pub counters: BTreeMap<String, u64>,
}

fn default_schema_version() -> String {
    VAULT_SCHEMA_VERSION.to_string()
}

impl VaultSnapshot {
    /// Load a snapshot from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let snapshot: VaultSnapshot = serde_json::from_str(&content)?;
        Ok(snapshot)
    }

    /// Save the snapshot to a file with restricted permissions.
    ///
    /// Snapshots hold original PII values. On Unix the file is created with
    /// 0600 permissions atomically so it is never readable by others.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;

        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::OpenOptionsExt;

            let mut file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }

        #[cfg(not(unix))]
        {
            std::fs::write(&path, &content)?;
        }

        Ok(())
    }
}
