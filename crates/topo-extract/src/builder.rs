//! Normalization of a [`RawGraph`] into a validated [`Graph`].

use std::collections::{BTreeMap, HashMap};
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use topo_core::{
    Category, ConnectionEdge, DEFAULT_RELATION, Graph, GraphIdentity, ResourceNode, SourceLocation,
};

use crate::classify::Classifier;
use crate::error::ExtractError;
use crate::raw::{RawGraph, RawResource};
use crate::resolve::{Endpoint, Resolver};

/// Metadata key holding the raw target reference of a resolved edge.
pub const TARGET_REF: &str = "target_ref";

/// A relation left out of the graph because an endpoint did not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRelation {
    pub source: String,
    pub target: String,
    pub kind: String,
}

#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub graph: Graph,
    pub skipped: Vec<SkippedRelation>,
}

pub struct GraphBuilder {
    classifier: Classifier,
    repo_root: PathBuf,
    check_lines: bool,
}

impl GraphBuilder {
    #[must_use]
    pub fn new(classifier: Classifier, repo_root: impl Into<PathBuf>) -> Self {
        Self {
            classifier,
            repo_root: repo_root.into(),
            check_lines: true,
        }
    }

    /// Skip the check of line numbers against files on disk. Used for
    /// output recorded at another revision, whose files are not checked out.
    #[must_use]
    pub fn without_line_check(mut self) -> Self {
        self.check_lines = false;
        self
    }

    /// Build the graph for the application whose definition file is
    /// `definition` (absolute, inside the repository root).
    ///
    /// # Errors
    ///
    /// - [`ExtractError::AmbiguousResource`] for conflicting duplicates.
    /// - [`ExtractError::SchemaMismatch`] for a line past the end of its file,
    ///   or a line in a file that cannot be read.
    /// - [`ExtractError::Graph`] if the result violates graph invariants.
    pub fn build(&self, definition: &Path, raw: RawGraph) -> Result<BuildOutcome, ExtractError> {
        let definition_rel = self.relative(definition);
        let identity = GraphIdentity::from_definition_path(&definition_rel);
        let base_dir = definition.parent().unwrap_or(&self.repo_root);
        let mut line_counts = LineCounts::default();

        let mut application: Option<String> = None;
        let mut application_keys: Vec<String> = Vec::new();
        let mut nodes: BTreeMap<String, ResourceNode> = BTreeMap::new();

        for resource in raw.resources {
            let category = self.classifier.classify(&resource.resource_type);
            if category == Category::Application {
                if application.is_none() {
                    application = Some(resource.name.clone());
                }
                application_keys.push(resource.id);
                application_keys.push(resource.name);
                continue;
            }
            let node = self.node(resource, category, base_dir, &definition_rel, &mut line_counts)?;
            match nodes.get(&node.id) {
                Some(existing) if *existing == node => {
                    tracing::debug!(id = %node.id, "merged identical duplicate resource");
                }
                Some(existing) => {
                    return Err(ExtractError::AmbiguousResource {
                        id: node.id.clone(),
                        first: describe(existing),
                        second: describe(&node),
                    });
                }
                None => {
                    nodes.insert(node.id.clone(), node);
                }
            }
        }

        let resolver = Resolver::new(
            nodes.values().map(|n| (n.id.as_str(), n.label.as_str())),
            application_keys.iter().map(String::as_str),
        );

        let mut edges: BTreeMap<(String, String, String), ConnectionEdge> = BTreeMap::new();
        let mut skipped = Vec::new();
        for relation in raw.relations {
            let kind = relation
                .kind
                .clone()
                .unwrap_or_else(|| DEFAULT_RELATION.to_string());
            let (source, target) = match (
                resolver.resolve(&relation.source),
                resolver.resolve(&relation.target),
            ) {
                (Some(Endpoint::Node(source)), Some(Endpoint::Node(target))) => (source, target),
                (Some(Endpoint::Application), _) | (_, Some(Endpoint::Application)) => {
                    tracing::debug!(source = %relation.source, target = %relation.target, %kind, "dropped relation to application");
                    continue;
                }
                _ => {
                    tracing::warn!(
                        source = %relation.source,
                        target = %relation.target,
                        %kind,
                        "skipping relation with unresolved endpoint"
                    );
                    skipped.push(SkippedRelation {
                        source: relation.source,
                        target: relation.target,
                        kind,
                    });
                    continue;
                }
            };

            let mut edge = ConnectionEdge::new(source.clone(), target.clone()).with_kind(kind.clone());
            if relation.target != target {
                edge.metadata.insert(TARGET_REF.to_string(), relation.target);
            }
            edges.entry((source, target, kind)).or_insert(edge);
        }

        let graph = Graph::new(
            identity,
            application,
            nodes.into_values().collect(),
            edges.into_values().collect(),
        )?;
        tracing::info!(
            identity = %graph.identity(),
            nodes = graph.nodes().len(),
            edges = graph.edges().len(),
            skipped = skipped.len(),
            "built graph"
        );
        Ok(BuildOutcome { graph, skipped })
    }

    fn node(
        &self,
        resource: RawResource,
        category: Category,
        base_dir: &Path,
        definition_rel: &str,
        line_counts: &mut LineCounts,
    ) -> Result<ResourceNode, ExtractError> {
        let file_rel = match &resource.file {
            Some(file) if !file.is_empty() => {
                let path = Path::new(file);
                let absolute = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    base_dir.join(path)
                };
                self.relative(&absolute)
            }
            _ => definition_rel.to_string(),
        };

        let line = (resource.line > 0).then_some(resource.line);
        if let (Some(line), true) = (line, self.check_lines) {
            let absolute = self.repo_root.join(&file_rel);
            let count = line_counts.get(&absolute).map_err(|error| {
                ExtractError::mismatch(
                    format!(
                        "resource '{}' cites line {line} of {file_rel}, which cannot be read: {error}",
                        resource.id
                    ),
                    "",
                )
            })?;
            if line as usize > count {
                return Err(ExtractError::mismatch(
                    format!(
                        "resource '{}' cites line {line} but {file_rel} has {count} lines",
                        resource.id
                    ),
                    "",
                ));
            }
        }

        Ok(ResourceNode {
            id: resource.id,
            resource_type: resource.resource_type,
            category,
            label: resource.name,
            source: Some(SourceLocation {
                file: file_rel,
                line,
            }),
            metadata: resource.properties,
        })
    }

    /// Repository-relative, forward-slash form of `path`. Paths outside the
    /// repository are kept as given.
    fn relative(&self, path: &Path) -> String {
        let normalized = lexical_normalize(path);
        let relative = normalized
            .strip_prefix(lexical_normalize(&self.repo_root))
            .unwrap_or(&normalized);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn describe(node: &ResourceNode) -> String {
    match node.located_line() {
        Some((file, line)) => format!("{} '{}' at {file}:{line}", node.resource_type, node.label),
        None => format!("{} '{}'", node.resource_type, node.label),
    }
}

/// Resolve `.` and `..` without touching the filesystem.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Line counts per file, read once. Read failures are kept as messages.
#[derive(Default)]
struct LineCounts(HashMap<PathBuf, Result<usize, String>>);

impl LineCounts {
    fn get(&mut self, path: &Path) -> Result<usize, String> {
        self.0
            .entry(path.to_path_buf())
            .or_insert_with(|| {
                std::fs::read_to_string(path)
                    .map(|content| content.lines().count())
                    .map_err(|error| error.to_string())
            })
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;
    use topo_config::ClassifyConfig;

    use super::*;
    use crate::raw::RawRelation;

    fn builder(root: &Path) -> GraphBuilder {
        GraphBuilder::new(
            Classifier::from_config(&ClassifyConfig::default()).unwrap(),
            root,
        )
    }

    fn resource(id: &str, resource_type: &str, line: u32) -> RawResource {
        RawResource {
            id: id.to_string(),
            name: id.to_string(),
            resource_type: resource_type.to_string(),
            file: None,
            line,
            properties: BTreeMap::new(),
        }
    }

    fn relation(source: &str, target: &str, kind: Option<&str>) -> RawRelation {
        RawRelation {
            source: source.to_string(),
            target: target.to_string(),
            kind: kind.map(ToString::to_string),
        }
    }

    fn write_definition(root: &Path, rel: &str, lines: usize) -> PathBuf {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "// line\n".repeat(lines)).unwrap();
        path
    }

    #[test]
    fn application_becomes_graph_name_not_node() {
        let dir = tempfile::tempdir().unwrap();
        let definition = write_definition(dir.path(), "apps/shop/app.bicep", 40);
        let raw = RawGraph {
            resources: vec![
                resource("app", "Applications.Core/applications", 1),
                resource("web", "Applications.Core/containers", 10),
            ],
            relations: vec![relation("web", "app", Some("dependsOn"))],
        };

        let outcome = builder(dir.path()).build(&definition, raw).unwrap();
        assert_eq!(outcome.graph.identity().as_str(), "apps/shop");
        assert_eq!(outcome.graph.application(), Some("app"));
        assert_eq!(outcome.graph.nodes().len(), 1);
        assert!(outcome.graph.edges().is_empty());
        assert!(outcome.skipped.is_empty());
        assert_eq!(
            outcome.graph.nodes()[0].source,
            Some(SourceLocation {
                file: "apps/shop/app.bicep".to_string(),
                line: Some(10),
            })
        );
    }

    #[test]
    fn unresolved_relations_are_skipped_and_reported() {
        let dir = tempfile::tempdir().unwrap();
        let definition = write_definition(dir.path(), "app.bicep", 20);
        let raw = RawGraph {
            resources: vec![
                resource("frontend", "Applications.Core/containers", 2),
                resource("backend", "Applications.Core/containers", 9),
            ],
            relations: vec![
                relation("frontend", "http://backend:3000", None),
                relation("frontend", "https://payments.example.com", None),
            ],
        };

        let outcome = builder(dir.path()).build(&definition, raw).unwrap();
        let edges = outcome.graph.edges();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, "frontend");
        assert_eq!(edges[0].target, "backend");
        assert_eq!(edges[0].kind, DEFAULT_RELATION);
        assert_eq!(edges[0].metadata[TARGET_REF], "http://backend:3000");
        assert_eq!(
            outcome.skipped,
            vec![SkippedRelation {
                source: "frontend".to_string(),
                target: "https://payments.example.com".to_string(),
                kind: DEFAULT_RELATION.to_string(),
            }]
        );
    }

    #[test]
    fn conflicting_duplicates_are_ambiguous() {
        let dir = tempfile::tempdir().unwrap();
        let definition = write_definition(dir.path(), "app.bicep", 20);
        let raw = RawGraph {
            resources: vec![
                resource("web", "Applications.Core/containers", 2),
                resource("web", "Applications.Core/containers", 2),
                resource("web", "Applications.Core/containers", 5),
            ],
            relations: vec![],
        };
        let err = builder(dir.path()).build(&definition, raw).unwrap_err();
        assert!(matches!(err, ExtractError::AmbiguousResource { id, .. } if id == "web"));
    }

    #[test]
    fn line_past_end_of_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let definition = write_definition(dir.path(), "app.bicep", 5);
        let raw = RawGraph {
            resources: vec![resource("web", "Applications.Core/containers", 6)],
            relations: vec![],
        };
        let err = builder(dir.path()).build(&definition, raw.clone()).unwrap_err();
        assert!(matches!(err, ExtractError::SchemaMismatch { .. }));

        let outcome = builder(dir.path())
            .without_line_check()
            .build(&definition, raw)
            .unwrap();
        assert_eq!(outcome.graph.nodes().len(), 1);
    }

    #[test]
    fn line_in_missing_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let definition = write_definition(dir.path(), "app.bicep", 5);
        let mut ghost = resource("web", "Applications.Core/containers", 4000);
        ghost.file = Some("modules/ghost.bicep".to_string());
        let raw = RawGraph {
            resources: vec![ghost],
            relations: vec![],
        };

        let err = builder(dir.path()).build(&definition, raw.clone()).unwrap_err();
        let ExtractError::SchemaMismatch { reason, .. } = err else {
            panic!("expected SchemaMismatch");
        };
        assert!(reason.contains("modules/ghost.bicep"), "{reason}");

        let outcome = builder(dir.path())
            .without_line_check()
            .build(&definition, raw)
            .unwrap();
        assert_eq!(
            outcome.graph.nodes()[0].located_line(),
            Some(("modules/ghost.bicep", 4000))
        );
    }

    #[test]
    fn zero_line_means_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let definition = write_definition(dir.path(), "app.bicep", 5);
        let raw = RawGraph {
            resources: vec![resource("web", "Applications.Core/containers", 0)],
            relations: vec![],
        };
        let outcome = builder(dir.path()).build(&definition, raw).unwrap();
        assert_eq!(outcome.graph.nodes()[0].located_line(), None);
    }

    #[test]
    fn distinct_kinds_are_distinct_edges() {
        let dir = tempfile::tempdir().unwrap();
        let definition = write_definition(dir.path(), "app.bicep", 20);
        let raw = RawGraph {
            resources: vec![
                resource("a", "Applications.Core/containers", 1),
                resource("b", "Applications.Core/containers", 2),
            ],
            relations: vec![
                relation("a", "b", None),
                relation("a", "b", Some("dependsOn")),
                relation("a", "b", None),
            ],
        };
        let outcome = builder(dir.path()).build(&definition, raw).unwrap();
        let kinds: Vec<_> = outcome.graph.edges().iter().map(|e| e.kind.as_str()).collect();
        assert_eq!(kinds, vec!["connection", "dependsOn"]);
    }
}
