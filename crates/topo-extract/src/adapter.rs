//! Adapters for the extractor's output formats.
//!
//! The extractor's JSON shape changes between releases. Each known shape
//! has one [`OutputAdapter`]; [`decode_output`] asks them in a fixed order
//! and the first that recognizes the document decodes it. Only the fields
//! the graph needs are read, everything else is ignored.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ExtractError;
use crate::raw::{RawGraph, RawRelation, RawResource, scalar_properties};

pub trait OutputAdapter: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Whether this adapter understands the document's shape.
    fn detect(&self, document: &Value) -> bool;

    /// Decode a document this adapter detected.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::SchemaMismatch`] when a required field is
    /// missing or has the wrong type.
    fn decode(&self, document: Value, raw: &str) -> Result<RawGraph, ExtractError>;
}

/// Adapters in detection order.
#[must_use]
pub fn adapters() -> [&'static dyn OutputAdapter; 3] {
    [&NestedLocation, &FlatLocation, &InlineConnections]
}

/// Parse extractor stdout into a [`RawGraph`].
///
/// # Errors
///
/// Returns [`ExtractError::SchemaMismatch`] (carrying the full output) when
/// the text is not JSON, no adapter recognizes it, or decoding fails.
pub fn decode_output(raw: &str) -> Result<RawGraph, ExtractError> {
    let document: Value = serde_json::from_str(raw)
        .map_err(|e| ExtractError::mismatch(format!("not JSON: {e}"), raw))?;
    decode_document(document, raw)
}

/// Decode an already-parsed document. `raw` is kept for error reporting.
///
/// # Errors
///
/// Same as [`decode_output`].
pub fn decode_document(document: Value, raw: &str) -> Result<RawGraph, ExtractError> {
    let Some(adapter) = adapters().into_iter().find(|a| a.detect(&document)) else {
        return Err(ExtractError::mismatch(
            "expected an object with a `resources` array",
            raw,
        ));
    };
    tracing::debug!(adapter = adapter.name(), "decoding extractor output");
    adapter.decode(document, raw)
}

fn typed<T: DeserializeOwned>(document: Value, adapter: &str, raw: &str) -> Result<T, ExtractError> {
    serde_json::from_value(document)
        .map_err(|e| ExtractError::mismatch(format!("{adapter}: {e}"), raw))
}

fn has_array(document: &Value, key: &str) -> bool {
    document.get(key).is_some_and(Value::is_array)
}

fn id_or_name(id: Option<String>, name: &str) -> String {
    id.filter(|id| !id.is_empty())
        .unwrap_or_else(|| name.to_string())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Connection {
    source_id: String,
    target_id: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

impl From<Connection> for RawRelation {
    fn from(connection: Connection) -> Self {
        Self {
            source: connection.source_id,
            target: connection.target_id,
            kind: connection.kind.filter(|k| !k.is_empty()),
        }
    }
}

/// `resources[].sourceLocation { file, line }` with top-level `connections`.
pub struct NestedLocation;

#[derive(Deserialize)]
struct NestedDocument {
    resources: Vec<NestedResource>,
    connections: Vec<Connection>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NestedResource {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(rename = "type")]
    resource_type: String,
    source_location: NestedLocationField,
    #[serde(default)]
    properties: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
struct NestedLocationField {
    #[serde(default)]
    file: Option<String>,
    line: u32,
}

impl OutputAdapter for NestedLocation {
    fn name(&self) -> &'static str {
        "nested-location"
    }

    fn detect(&self, document: &Value) -> bool {
        has_array(document, "connections")
            && document
                .get("resources")
                .and_then(Value::as_array)
                .is_some_and(|resources| {
                    resources.iter().any(|r| r.get("sourceLocation").is_some())
                })
    }

    fn decode(&self, document: Value, raw: &str) -> Result<RawGraph, ExtractError> {
        let doc: NestedDocument = typed(document, self.name(), raw)?;
        let resources = doc
            .resources
            .into_iter()
            .map(|r| RawResource {
                id: id_or_name(r.id, &r.name),
                resource_type: r.resource_type,
                file: r.source_location.file,
                line: r.source_location.line,
                properties: scalar_properties(&r.properties),
                name: r.name,
            })
            .collect();
        Ok(RawGraph {
            resources,
            relations: doc.connections.into_iter().map(Into::into).collect(),
        })
    }
}

/// `resources[] { file, line }` with top-level `connections`.
pub struct FlatLocation;

#[derive(Deserialize)]
struct FlatDocument {
    resources: Vec<FlatResource>,
    connections: Vec<Connection>,
}

#[derive(Deserialize)]
struct FlatResource {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(rename = "type")]
    resource_type: String,
    #[serde(default)]
    file: Option<String>,
    line: u32,
    #[serde(default)]
    properties: BTreeMap<String, Value>,
}

impl OutputAdapter for FlatLocation {
    fn name(&self) -> &'static str {
        "flat-location"
    }

    fn detect(&self, document: &Value) -> bool {
        has_array(document, "resources") && has_array(document, "connections")
    }

    fn decode(&self, document: Value, raw: &str) -> Result<RawGraph, ExtractError> {
        let doc: FlatDocument = typed(document, self.name(), raw)?;
        let resources = doc
            .resources
            .into_iter()
            .map(|r| RawResource {
                id: id_or_name(r.id, &r.name),
                resource_type: r.resource_type,
                file: r.file,
                line: r.line,
                properties: scalar_properties(&r.properties),
                name: r.name,
            })
            .collect();
        Ok(RawGraph {
            resources,
            relations: doc.connections.into_iter().map(Into::into).collect(),
        })
    }
}

/// Legacy shape: each resource lists the names it connects to.
pub struct InlineConnections;

#[derive(Deserialize)]
struct InlineDocument {
    resources: Vec<InlineResource>,
}

#[derive(Deserialize)]
struct InlineResource {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(rename = "type")]
    resource_type: String,
    #[serde(default)]
    file: Option<String>,
    line: u32,
    #[serde(default)]
    properties: BTreeMap<String, Value>,
    #[serde(default)]
    connections: Vec<String>,
}

impl OutputAdapter for InlineConnections {
    fn name(&self) -> &'static str {
        "inline-connections"
    }

    fn detect(&self, document: &Value) -> bool {
        has_array(document, "resources") && document.get("connections").is_none()
    }

    fn decode(&self, document: Value, raw: &str) -> Result<RawGraph, ExtractError> {
        let doc: InlineDocument = typed(document, self.name(), raw)?;
        let mut graph = RawGraph::default();
        for r in doc.resources {
            let id = id_or_name(r.id, &r.name);
            graph
                .relations
                .extend(r.connections.into_iter().map(|target| RawRelation {
                    source: id.clone(),
                    target,
                    kind: None,
                }));
            graph.resources.push(RawResource {
                id,
                resource_type: r.resource_type,
                file: r.file,
                line: r.line,
                properties: scalar_properties(&r.properties),
                name: r.name,
            });
        }
        Ok(graph)
    }
}
