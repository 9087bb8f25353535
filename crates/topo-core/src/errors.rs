//! Cross-cutting error types for topo.
//!
//! Structural graph errors live here. Component errors (`ExtractError`,
//! `RenderError`, `ReportError`, ...) are defined in their own crates and
//! converge in `topo-cli` through `anyhow`.

use thiserror::Error;

/// Errors raised while constructing, validating or decoding graphs.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Two nodes share the same identifier.
    #[error("Duplicate node identifier: {id}")]
    DuplicateNode { id: String },

    /// Two edges share the same `(source, target, kind)` identity.
    #[error("Duplicate edge: {from} -> {to} ({kind})")]
    DuplicateEdge {
        from: String,
        to: String,
        kind: String,
    },

    /// An edge references a node that is not part of the graph.
    #[error("Edge {from} -> {to} references unknown node '{missing}'")]
    DanglingEdge {
        from: String,
        to: String,
        missing: String,
    },

    /// A node carries a line number of zero.
    #[error("Node '{id}' has line number 0 (lines are 1-based)")]
    InvalidLine { id: String },

    /// The snapshot was written by an incompatible version.
    #[error("Unsupported snapshot version {found} (expected {expected})")]
    UnsupportedSnapshotVersion { found: u32, expected: u32 },

    /// The stored content hash does not match the graph.
    #[error("Snapshot content hash mismatch: stored {stored}, computed {computed}")]
    HashMismatch { stored: String, computed: String },

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
