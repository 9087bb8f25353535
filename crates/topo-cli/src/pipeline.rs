//! Publish pipeline: definition → graph → snapshot → diagram → document.
//!
//! 1. Obtain the raw graph (configured extractor, or a direct scan)
//! 2. Classify, resolve and validate it with `GraphBuilder`
//! 3. Serialize the snapshot next to the definition file
//! 4. Render the Mermaid diagram and patch the target document section
//!
//! Files are only written when their content changes. In check mode nothing
//! is written and the caller reports what is out of date.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use topo_config::TopoConfig;
use topo_core::{Graph, GraphIdentity, GraphSnapshot};
use topo_extract::{Classifier, ExtractionMode, GraphBuilder, SkippedRelation, extract_raw};
use topo_render::{MermaidRenderer, diagram_section, patch_section};

/// A definition file located inside its repository.
#[derive(Debug, Clone)]
pub struct Definition {
    /// Absolute path.
    pub path: PathBuf,
    /// Working tree root the definition belongs to.
    pub repo_root: PathBuf,
    /// Repository-relative path with forward slashes.
    pub relative: String,
}

impl Definition {
    /// Locate `path` (absolute, or relative to `project_root`).
    pub fn locate(project_root: &Path, path: &Path) -> anyhow::Result<Self> {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            project_root.join(path)
        };
        let path = std::fs::canonicalize(&joined)
            .with_context(|| format!("definition file '{}' not found", joined.display()))?;

        let start = path.parent().unwrap_or(project_root);
        let repo_root = match topo_git::Repository::discover(start) {
            Ok(repo) => std::fs::canonicalize(repo.root())
                .with_context(|| format!("failed to resolve '{}'", repo.root().display()))?,
            Err(error) => {
                tracing::debug!(%error, "not in a git repository; using project root");
                std::fs::canonicalize(project_root).with_context(|| {
                    format!("failed to resolve project root '{}'", project_root.display())
                })?
            }
        };
        let relative = path
            .strip_prefix(&repo_root)
            .with_context(|| {
                format!(
                    "definition '{}' is outside repository '{}'",
                    path.display(),
                    repo_root.display()
                )
            })?
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        Ok(Self {
            path,
            repo_root,
            relative,
        })
    }

    pub fn identity(&self) -> GraphIdentity {
        GraphIdentity::from_definition_path(&self.relative)
    }
}

/// Extracted graph plus what the builder left out.
pub struct ExtractedGraph {
    pub graph: Graph,
    pub skipped: Vec<SkippedRelation>,
    pub mode: ExtractionMode,
}

pub async fn extract_graph(
    config: &TopoConfig,
    definition: &Definition,
    force_direct: bool,
) -> anyhow::Result<ExtractedGraph> {
    let (raw, mode) = extract_raw(&config.extractor, &definition.path, force_direct)
        .await
        .with_context(|| format!("failed to extract graph from {}", definition.relative))?;
    let classifier = Classifier::from_config(&config.classify)?;
    let outcome = GraphBuilder::new(classifier, &definition.repo_root)
        .build(&definition.path, raw)
        .with_context(|| format!("failed to build graph for {}", definition.relative))?;

    for relation in &outcome.skipped {
        tracing::warn!(
            source = %relation.source,
            target = %relation.target,
            kind = %relation.kind,
            "relation skipped: endpoint not found"
        );
    }

    Ok(ExtractedGraph {
        graph: outcome.graph,
        skipped: outcome.skipped,
        mode,
    })
}

/// Outcome of syncing one generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Written,
    Unchanged,
    /// Check mode: the file on disk differs from what would be written.
    Stale,
}

impl FileStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Written => "written",
            Self::Unchanged => "unchanged",
            Self::Stale => "stale",
        }
    }
}

/// Write `content` to `path` unless it already holds exactly that.
pub fn sync_file(path: &Path, content: &str, check: bool) -> anyhow::Result<FileStatus> {
    let current = match std::fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => None,
        Err(error) => {
            return Err(error).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    if current.as_deref() == Some(content) {
        return Ok(FileStatus::Unchanged);
    }
    if check {
        return Ok(FileStatus::Stale);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote file");
    Ok(FileStatus::Written)
}

/// Serialize the snapshot for `graph` and sync it to the application's
/// snapshot path. Returns the repository-relative path and its status.
pub fn write_snapshot(
    config: &TopoConfig,
    definition: &Definition,
    graph: &Graph,
    check: bool,
) -> anyhow::Result<(String, FileStatus)> {
    let snapshot = GraphSnapshot::new(graph.clone())?;
    let relative = definition.identity().join(&config.layout.snapshot_path);
    let status = sync_file(
        &definition.repo_root.join(&relative),
        &snapshot.to_json_pretty()?,
        check,
    )?;
    Ok((relative, status))
}

/// Render the diagram and sync it into the document section.
pub fn patch_document(
    config: &TopoConfig,
    definition: &Definition,
    graph: &Graph,
    document: &Path,
    section: &str,
    check: bool,
) -> anyhow::Result<FileStatus> {
    let path = definition.repo_root.join(document);
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read document {}", path.display()))?;
    let diagram = MermaidRenderer::new(&config.theme)
        .with_links(&config.repo)
        .render(graph);
    let outcome = patch_section(&text, section, &diagram_section(&definition.relative, &diagram))
        .with_context(|| format!("failed to patch {}", path.display()))?;
    if !outcome.changed {
        return Ok(FileStatus::Unchanged);
    }
    sync_file(&path, &outcome.text, check)
}
