use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use topo_core::{ConnectionEdge, GraphIdentity, ResourceNode};

/// Whether the graph exists on both sides of the comparison.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GraphStatus {
    Present,
    Added,
    Removed,
}

/// One attribute that differs between two versions of a node or edge.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    /// Attribute path, e.g. `label`, `source.line`, `metadata.image`.
    pub field: String,
    pub before: Option<String>,
    pub after: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeChange {
    pub before: ResourceNode,
    pub after: ResourceNode,
    pub fields: Vec<FieldChange>,
}

impl NodeChange {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.after.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EdgeChange {
    pub before: ConnectionEdge,
    pub after: ConnectionEdge,
    pub fields: Vec<FieldChange>,
}

/// Result of comparing two versions of one graph identity.
///
/// All lists are in canonical graph order.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    pub identity: GraphIdentity,
    pub status: GraphStatus,
    pub added_nodes: Vec<ResourceNode>,
    pub removed_nodes: Vec<ResourceNode>,
    pub modified_nodes: Vec<NodeChange>,
    pub added_edges: Vec<ConnectionEdge>,
    pub removed_edges: Vec<ConnectionEdge>,
    pub modified_edges: Vec<EdgeChange>,
    pub unchanged_nodes: usize,
    pub no_changes: bool,
    /// Labels of every endpoint of a changed edge, looked up in the new graph
    /// first and the old one second. Endpoints that are not nodes are absent.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub endpoint_labels: BTreeMap<String, String>,
}

impl DiffResult {
    #[must_use]
    pub fn has_node_changes(&self) -> bool {
        !(self.added_nodes.is_empty()
            && self.removed_nodes.is_empty()
            && self.modified_nodes.is_empty())
    }

    #[must_use]
    pub fn has_edge_changes(&self) -> bool {
        !(self.added_edges.is_empty()
            && self.removed_edges.is_empty()
            && self.modified_edges.is_empty())
    }

    /// Self-loops present in the new graph but not in the old one.
    pub fn new_self_loops(&self) -> impl Iterator<Item = &ConnectionEdge> {
        self.added_edges.iter().filter(|edge| edge.is_self_loop())
    }
}
