use topo_core::GraphSnapshot;

use crate::error::SchemaError;
use crate::registry::SchemaRegistry;

/// Whether a JSON document is a topo snapshot rather than raw extractor output.
#[must_use]
pub fn looks_like_snapshot(value: &serde_json::Value) -> bool {
    value.get("snapshotVersion").is_some() && value.get("graph").is_some()
}

/// Parse, schema-check and verify a snapshot file's text.
///
/// # Errors
///
/// Returns [`SchemaError::Json`] for malformed JSON,
/// [`SchemaError::ValidationFailed`] when the shape is wrong, and
/// [`SchemaError::Snapshot`] for version, hash or graph invariant failures.
pub fn decode_snapshot(registry: &SchemaRegistry, text: &str) -> Result<GraphSnapshot, SchemaError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    registry.validate("graph_snapshot", &value)?;
    Ok(GraphSnapshot::from_value(value)?)
}
