//! Extractor-independent intermediate form.
//!
//! Adapters and the definition parser both produce a [`RawGraph`]; the
//! builder turns it into a validated [`topo_core::Graph`].

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawResource {
    /// Identifier as emitted by the source (defaults to `name`).
    pub id: String,
    pub name: String,
    pub resource_type: String,
    /// File the resource is declared in, relative to the definition file's
    /// directory or absolute. `None` means the definition file itself.
    pub file: Option<String>,
    /// 1-based line, `0` when unknown.
    pub line: u32,
    pub properties: BTreeMap<String, String>,
}

/// A relation whose endpoints are still unresolved references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRelation {
    pub source: String,
    pub target: String,
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawGraph {
    pub resources: Vec<RawResource>,
    pub relations: Vec<RawRelation>,
}

/// Render scalar JSON property values as strings; nested values are dropped.
pub(crate) fn scalar_properties(
    properties: &BTreeMap<String, serde_json::Value>,
) -> BTreeMap<String, String> {
    properties
        .iter()
        .filter_map(|(key, value)| {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key.clone(), text))
        })
        .collect()
}
