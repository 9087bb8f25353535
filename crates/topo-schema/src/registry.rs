//! Central schema registry.
//!
//! Schemas are generated with [`schemars::schema_for!`] at construction time
//! and validated with `jsonschema`.

use std::collections::HashMap;

use schemars::schema_for;

use crate::error::SchemaError;

/// Named JSON Schemas for every type topo writes to disk or prints.
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, serde_json::Value>,
}

/// Insert a schema into the map, converting the `schemars` output to a
/// `serde_json::Value`. Panics if `serde_json::to_value` fails (should be
/// infallible for valid `schemars` output).
macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        $map.insert($name, serde_json::to_value(schema_for!($ty)).unwrap());
    };
}

impl SchemaRegistry {
    /// Build a registry with the snapshot, graph and diff report schemas.
    ///
    /// # Panics
    ///
    /// Panics if `serde_json::to_value` fails on any `schemars`-generated
    /// schema. This is not expected in practice because `schemars` always
    /// produces valid JSON-serialisable output.
    #[must_use]
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        // Persisted
        register!(schemas, "graph_snapshot", topo_core::GraphSnapshot);
        register!(schemas, "graph", topo_core::Graph);
        register!(schemas, "resource_node", topo_core::ResourceNode);
        register!(schemas, "connection_edge", topo_core::ConnectionEdge);

        // Review output
        register!(schemas, "diff_result", topo_diff::DiffResult);
        register!(schemas, "review_report", topo_diff::ReviewReport);

        Self { schemas }
    }

    /// Get a schema by name. Returns `None` if not found.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.schemas.get(name)
    }

    /// Validate a JSON value against a named schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the schema name is unknown, or
    /// `SchemaError::ValidationFailed` if validation produces errors.
    pub fn validate(&self, name: &str, instance: &serde_json::Value) -> Result<(), SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;

        let validator =
            jsonschema::validator_for(schema).map_err(|e| SchemaError::Compile(format!("{e}")))?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|e| format!("{e}"))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed {
                schema: name.to_string(),
                errors,
            })
        }
    }

    /// All registered schema names, sorted.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
