//! Persisted graph snapshots.
//!
//! A snapshot is the graph plus a content hash, written as pretty JSON with a
//! trailing newline. Regenerating a snapshot from identical input yields
//! byte-identical output, so version control only sees real changes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::CoreError;
use crate::graph::Graph;
use crate::identity::GraphIdentity;

/// Current on-disk snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    pub snapshot_version: u32,
    /// `sha256:<hex>` over the canonical JSON encoding of `graph`.
    pub content_hash: String,
    pub graph: Graph,
}

impl GraphSnapshot {
    /// Wrap a graph and compute its content hash.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Json`] if the graph cannot be serialized.
    pub fn new(graph: Graph) -> Result<Self, CoreError> {
        let content_hash = content_hash(&graph)?;
        Ok(Self {
            snapshot_version: SNAPSHOT_VERSION,
            content_hash,
            graph,
        })
    }

    #[must_use]
    pub const fn identity(&self) -> &GraphIdentity {
        self.graph.identity()
    }

    /// Pretty JSON with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Json`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, CoreError> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }

    /// Decode a snapshot from an already-parsed JSON value and verify it.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError`] when the value is not a snapshot, has an
    /// unsupported version, violates graph invariants, or its hash does not
    /// match the graph.
    pub fn from_value(value: serde_json::Value) -> Result<Self, CoreError> {
        let snapshot: Self = serde_json::from_value(value)?;
        snapshot.verify()
    }

    fn verify(self) -> Result<Self, CoreError> {
        if self.snapshot_version != SNAPSHOT_VERSION {
            return Err(CoreError::UnsupportedSnapshotVersion {
                found: self.snapshot_version,
                expected: SNAPSHOT_VERSION,
            });
        }
        let graph = self.graph.canonicalize()?;
        let computed = content_hash(&graph)?;
        if computed != self.content_hash {
            return Err(CoreError::HashMismatch {
                stored: self.content_hash,
                computed,
            });
        }
        Ok(Self {
            snapshot_version: self.snapshot_version,
            content_hash: self.content_hash,
            graph,
        })
    }
}

/// Content hash of a graph in `sha256:<hex>` form.
///
/// # Errors
///
/// Returns [`CoreError::Json`] if the graph cannot be serialized.
pub fn content_hash(graph: &Graph) -> Result<String, CoreError> {
    let bytes = serde_json::to_vec(graph)?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("sha256:{}", hex::encode(digest)))
}
