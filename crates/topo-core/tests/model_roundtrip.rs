//! Serde roundtrip and JsonSchema validation tests for the persisted model types.

use std::collections::BTreeMap;

use schemars::schema_for;
use topo_core::{
    Category, ConnectionEdge, Graph, GraphIdentity, GraphSnapshot, ResourceNode, SourceLocation,
};

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

fn shop_graph() -> Graph {
    let mut nodes = Vec::new();
    for (id, category, line) in [
        ("frontend", Category::Container, 10),
        ("backend", Category::Container, 25),
        ("database", Category::Datastore, 40),
    ] {
        nodes.push(ResourceNode {
            id: id.to_string(),
            resource_type: "Applications.Core/containers".to_string(),
            category,
            label: id.to_string(),
            source: Some(SourceLocation {
                file: "app.bicep".to_string(),
                line: Some(line),
            }),
            metadata: BTreeMap::new(),
        });
    }
    nodes.push(ResourceNode {
        id: "gateway".to_string(),
        resource_type: "Applications.Core/gateways".to_string(),
        category: Category::Other,
        label: "gateway".to_string(),
        source: None,
        metadata: BTreeMap::from([("port".to_string(), "443".to_string())]),
    });

    let mut tagged = ConnectionEdge::new("frontend", "backend");
    tagged
        .metadata
        .insert("target_ref".to_string(), "http://backend:3000".to_string());

    Graph::new(
        GraphIdentity::root(),
        Some("shop".to_string()),
        nodes,
        vec![
            tagged,
            ConnectionEdge::new("backend", "database"),
            ConnectionEdge::new("gateway", "frontend").with_kind("route"),
        ],
    )
    .expect("graph should be valid")
}

#[test]
fn graph_roundtrips_and_matches_schema() {
    let graph = shop_graph();
    let json = serde_json::to_string_pretty(&graph).unwrap();
    let recovered: Graph = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered, graph);

    let schema = serde_json::to_value(schema_for!(Graph)).unwrap();
    let instance = serde_json::to_value(&graph).unwrap();
    let errors = validate_against_schema(&schema, &instance);
    assert!(errors.is_empty(), "schema validation failed: {errors:?}");
}

#[test]
fn snapshot_roundtrips_and_matches_schema() {
    let snapshot = GraphSnapshot::new(shop_graph()).unwrap();
    let json = snapshot.to_json_pretty().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let schema = serde_json::to_value(schema_for!(GraphSnapshot)).unwrap();
    let errors = validate_against_schema(&schema, &value);
    assert!(errors.is_empty(), "schema validation failed: {errors:?}");

    let decoded = GraphSnapshot::from_value(value).unwrap();
    assert_eq!(decoded, snapshot);
}

#[test]
fn missing_edge_kind_defaults_to_connection() {
    let edge: ConnectionEdge =
        serde_json::from_str(r#"{"source":"a","target":"b"}"#).unwrap();
    assert_eq!(edge.kind, topo_core::DEFAULT_RELATION);
}
