//! Node and edge comparison.
//!
//! Both graphs are canonically ordered, so the comparison is a single merge
//! walk over each sorted list: nodes keyed by id, edges keyed by
//! `(source, target, kind)`.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use topo_core::{ConnectionEdge, Graph, GraphIdentity, ResourceNode};

use crate::model::{DiffResult, EdgeChange, FieldChange, GraphStatus, NodeChange};

enum Side<'a, T> {
    Old(&'a T),
    New(&'a T),
    Both(&'a T, &'a T),
}

fn merge_by<'a, T, K: Ord>(
    old: &'a [T],
    new: &'a [T],
    key: impl Fn(&'a T) -> K,
) -> Vec<Side<'a, T>> {
    let (mut i, mut j) = (0, 0);
    let mut out = Vec::with_capacity(old.len().max(new.len()));
    while i < old.len() && j < new.len() {
        match key(&old[i]).cmp(&key(&new[j])) {
            Ordering::Less => {
                out.push(Side::Old(&old[i]));
                i += 1;
            }
            Ordering::Greater => {
                out.push(Side::New(&new[j]));
                j += 1;
            }
            Ordering::Equal => {
                out.push(Side::Both(&old[i], &new[j]));
                i += 1;
                j += 1;
            }
        }
    }
    out.extend(old[i..].iter().map(Side::Old));
    out.extend(new[j..].iter().map(Side::New));
    out
}

fn node_key(node: &ResourceNode) -> &str {
    &node.id
}

/// Compare two versions of the same graph.
#[must_use]
pub fn diff_graphs(old: &Graph, new: &Graph) -> DiffResult {
    diff_presence(new.identity().clone(), Some(old), Some(new))
}

/// Compare two versions of a graph identity where either side may be
/// missing. A missing side is an empty graph, so the whole other side shows
/// up as added or removed.
#[must_use]
pub fn diff_presence(
    identity: GraphIdentity,
    old: Option<&Graph>,
    new: Option<&Graph>,
) -> DiffResult {
    let status = match (old, new) {
        (None, Some(_)) => GraphStatus::Added,
        (Some(_), None) => GraphStatus::Removed,
        _ => GraphStatus::Present,
    };
    let empty = Graph::empty(identity.clone());
    let old = old.unwrap_or(&empty);
    let new = new.unwrap_or(&empty);

    let mut added_nodes = Vec::new();
    let mut removed_nodes = Vec::new();
    let mut modified_nodes = Vec::new();
    let mut unchanged_nodes = 0;
    for side in merge_by(old.nodes(), new.nodes(), node_key) {
        match side {
            Side::Old(node) => removed_nodes.push(node.clone()),
            Side::New(node) => added_nodes.push(node.clone()),
            Side::Both(before, after) => {
                let fields = node_fields(before, after);
                if fields.is_empty() {
                    unchanged_nodes += 1;
                } else {
                    modified_nodes.push(NodeChange {
                        before: before.clone(),
                        after: after.clone(),
                        fields,
                    });
                }
            }
        }
    }

    let mut added_edges = Vec::new();
    let mut removed_edges = Vec::new();
    let mut modified_edges = Vec::new();
    for side in merge_by(old.edges(), new.edges(), ConnectionEdge::key) {
        match side {
            Side::Old(edge) => removed_edges.push(edge.clone()),
            Side::New(edge) => added_edges.push(edge.clone()),
            Side::Both(before, after) => {
                let mut fields = Vec::new();
                metadata_changes(&mut fields, &before.metadata, &after.metadata);
                if !fields.is_empty() {
                    modified_edges.push(EdgeChange {
                        before: before.clone(),
                        after: after.clone(),
                        fields,
                    });
                }
            }
        }
    }

    let no_changes = added_nodes.is_empty()
        && removed_nodes.is_empty()
        && modified_nodes.is_empty()
        && added_edges.is_empty()
        && removed_edges.is_empty()
        && modified_edges.is_empty();

    let endpoint_labels = labels_for_endpoints(
        old,
        new,
        added_edges
            .iter()
            .chain(&removed_edges)
            .chain(modified_edges.iter().map(|change| &change.after)),
    );

    DiffResult {
        identity,
        status,
        added_nodes,
        removed_nodes,
        modified_nodes,
        added_edges,
        removed_edges,
        modified_edges,
        unchanged_nodes,
        no_changes,
        endpoint_labels,
    }
}

fn labels_for_endpoints<'a>(
    old: &Graph,
    new: &Graph,
    edges: impl Iterator<Item = &'a ConnectionEdge>,
) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    for edge in edges {
        for id in [&edge.source, &edge.target] {
            if labels.contains_key(id) {
                continue;
            }
            if let Some(node) = new.node(id).or_else(|| old.node(id)) {
                labels.insert(id.clone(), node.label.clone());
            }
        }
    }
    labels
}

fn node_fields(before: &ResourceNode, after: &ResourceNode) -> Vec<FieldChange> {
    let mut fields = Vec::new();
    push_if_changed(
        &mut fields,
        "type",
        Some(before.resource_type.clone()),
        Some(after.resource_type.clone()),
    );
    push_if_changed(
        &mut fields,
        "category",
        Some(before.category.to_string()),
        Some(after.category.to_string()),
    );
    push_if_changed(
        &mut fields,
        "label",
        Some(before.label.clone()),
        Some(after.label.clone()),
    );
    push_if_changed(
        &mut fields,
        "source.file",
        before.source.as_ref().map(|s| s.file.clone()),
        after.source.as_ref().map(|s| s.file.clone()),
    );
    push_if_changed(
        &mut fields,
        "source.line",
        before.source.as_ref().and_then(|s| s.line).map(|l| l.to_string()),
        after.source.as_ref().and_then(|s| s.line).map(|l| l.to_string()),
    );
    metadata_changes(&mut fields, &before.metadata, &after.metadata);
    fields
}

fn push_if_changed(
    fields: &mut Vec<FieldChange>,
    field: &str,
    before: Option<String>,
    after: Option<String>,
) {
    if before != after {
        fields.push(FieldChange {
            field: field.to_string(),
            before,
            after,
        });
    }
}

fn metadata_changes(
    fields: &mut Vec<FieldChange>,
    before: &BTreeMap<String, String>,
    after: &BTreeMap<String, String>,
) {
    let keys: BTreeSet<&String> = before.keys().chain(after.keys()).collect();
    for key in keys {
        push_if_changed(
            fields,
            &format!("metadata.{key}"),
            before.get(key).cloned(),
            after.get(key).cloned(),
        );
    }
}
