//! Resource graph model.
//!
//! A [`Graph`] is always canonically ordered: nodes by identifier, edges by
//! `(source, target, kind)`. Construction goes through [`Graph::new`], which
//! sorts and validates, so rendering and diffing are deterministic for equal
//! input.

use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Category;
use crate::errors::CoreError;
use crate::identity::GraphIdentity;

/// Relation kind used when the extractor does not name one.
pub const DEFAULT_RELATION: &str = "connection";

/// Where a resource is declared.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLocation {
    /// Repository-relative path of the definition file.
    pub file: String,
    /// 1-based line of the declaration, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

/// One infrastructure resource.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceNode {
    pub id: String,
    /// Declared resource type, e.g. `Applications.Core/containers`.
    #[serde(rename = "type")]
    pub resource_type: String,
    pub category: Category,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceLocation>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl ResourceNode {
    /// Last segment of the declared type (`Applications.Core/containers` -> `containers`).
    #[must_use]
    pub fn short_type(&self) -> &str {
        self.resource_type
            .rsplit('/')
            .next()
            .unwrap_or(&self.resource_type)
    }

    /// Source file and line, only when both are known.
    #[must_use]
    pub fn located_line(&self) -> Option<(&str, u32)> {
        let source = self.source.as_ref()?;
        source.line.map(|line| (source.file.as_str(), line))
    }
}

/// Identity of an edge inside a graph.
pub type EdgeKey<'a> = (&'a str, &'a str, &'a str);

/// A directed relation between two resources.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionEdge {
    pub source: String,
    pub target: String,
    #[serde(default = "default_relation")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

fn default_relation() -> String {
    DEFAULT_RELATION.to_string()
}

impl ConnectionEdge {
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind: default_relation(),
            metadata: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    #[must_use]
    pub fn key(&self) -> EdgeKey<'_> {
        (&self.source, &self.target, &self.kind)
    }

    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// A named, canonically ordered resource graph.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Graph {
    identity: GraphIdentity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    application: Option<String>,
    nodes: Vec<ResourceNode>,
    edges: Vec<ConnectionEdge>,
}

impl Graph {
    /// Sort and validate nodes and edges into a graph.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError`] on duplicate node ids, duplicate edge
    /// identities, edges referencing unknown nodes, or a zero line number.
    pub fn new(
        identity: GraphIdentity,
        application: Option<String>,
        mut nodes: Vec<ResourceNode>,
        mut edges: Vec<ConnectionEdge>,
    ) -> Result<Self, CoreError> {
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        edges.sort_by(|a, b| a.key().cmp(&b.key()));
        let graph = Self {
            identity,
            application,
            nodes,
            edges,
        };
        graph.validate()?;
        Ok(graph)
    }

    /// A graph without resources.
    #[must_use]
    pub const fn empty(identity: GraphIdentity) -> Self {
        Self {
            identity,
            application: None,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Re-establish canonical order and check structural invariants.
    ///
    /// Used after deserialization, where [`Graph::new`] was bypassed.
    ///
    /// # Errors
    ///
    /// Same as [`Graph::new`].
    pub fn canonicalize(self) -> Result<Self, CoreError> {
        Self::new(self.identity, self.application, self.nodes, self.edges)
    }

    fn validate(&self) -> Result<(), CoreError> {
        let mut ids = BTreeSet::new();
        for node in &self.nodes {
            if !ids.insert(node.id.as_str()) {
                return Err(CoreError::DuplicateNode {
                    id: node.id.clone(),
                });
            }
            if node.source.as_ref().and_then(|s| s.line) == Some(0) {
                return Err(CoreError::InvalidLine {
                    id: node.id.clone(),
                });
            }
        }

        let mut keys = BTreeSet::new();
        for edge in &self.edges {
            for endpoint in [&edge.source, &edge.target] {
                if !ids.contains(endpoint.as_str()) {
                    return Err(CoreError::DanglingEdge {
                        from: edge.source.clone(),
                        to: edge.target.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
            if !keys.insert(edge.key()) {
                return Err(CoreError::DuplicateEdge {
                    from: edge.source.clone(),
                    to: edge.target.clone(),
                    kind: edge.kind.clone(),
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub const fn identity(&self) -> &GraphIdentity {
        &self.identity
    }

    /// Name of the enclosing application resource, if the extractor reported one.
    #[must_use]
    pub fn application(&self) -> Option<&str> {
        self.application.as_deref()
    }

    #[must_use]
    pub fn nodes(&self) -> &[ResourceNode] {
        &self.nodes
    }

    #[must_use]
    pub fn edges(&self) -> &[ConnectionEdge] {
        &self.edges
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&ResourceNode> {
        self.nodes
            .binary_search_by(|node| node.id.as_str().cmp(id))
            .ok()
            .map(|index| &self.nodes[index])
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}
