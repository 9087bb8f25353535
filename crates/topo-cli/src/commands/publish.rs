use std::path::{Path, PathBuf};

use anyhow::bail;
use serde::Serialize;
use topo_config::TopoConfig;
use topo_extract::ExtractionMode;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::PublishArgs;
use crate::output::{TextOutput, output};
use crate::pipeline::{self, Definition, FileStatus};

#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub identity: String,
    pub definition: String,
    pub extraction: &'static str,
    pub nodes: usize,
    pub edges: usize,
    pub skipped_relations: usize,
    pub snapshot: String,
    pub snapshot_status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_status: Option<FileStatus>,
}

impl PublishResponse {
    fn is_stale(&self) -> bool {
        self.snapshot_status == FileStatus::Stale
            || self.document_status == Some(FileStatus::Stale)
    }
}

impl TextOutput for PublishResponse {
    fn text(&self) -> String {
        let mut lines = vec![
            format!(
                "{} ({}): {} resources, {} connections via {}",
                self.definition, self.identity, self.nodes, self.edges, self.extraction
            ),
            format!("  snapshot {}: {}", self.snapshot, self.snapshot_status.as_str()),
        ];
        if let (Some(document), Some(status)) = (&self.document, self.document_status) {
            lines.push(format!("  document {document}: {}", status.as_str()));
        }
        if self.skipped_relations > 0 {
            lines.push(format!(
                "  {} relation(s) skipped (endpoint not found)",
                self.skipped_relations
            ));
        }
        lines.join("\n")
    }
}

pub const fn mode_name(mode: ExtractionMode) -> &'static str {
    match mode {
        ExtractionMode::Extractor => "extractor",
        ExtractionMode::Direct => "direct scan",
    }
}

/// Handle `topo publish`.
pub async fn handle(
    args: &PublishArgs,
    project_root: &Path,
    config: &TopoConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let definition = Definition::locate(project_root, &args.definition)?;
    let extracted = pipeline::extract_graph(config, &definition, args.direct).await?;
    let (snapshot, snapshot_status) =
        pipeline::write_snapshot(config, &definition, &extracted.graph, args.check)?;

    let document = args
        .document
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.layout.document));
    let section = args.section.as_deref().unwrap_or(&config.layout.section);
    let document_status = pipeline::patch_document(
        config,
        &definition,
        &extracted.graph,
        &document,
        section,
        args.check,
    )?;

    let response = PublishResponse {
        identity: definition.identity().to_string(),
        definition: definition.relative.clone(),
        extraction: mode_name(extracted.mode),
        nodes: extracted.graph.nodes().len(),
        edges: extracted.graph.edges().len(),
        skipped_relations: extracted.skipped.len(),
        snapshot,
        snapshot_status,
        document: Some(document.display().to_string()),
        document_status: Some(document_status),
    };
    output(&response, flags.format)?;

    if response.is_stale() {
        bail!(
            "publish --check: generated files are out of date. Run `topo publish {}` and commit the result.",
            definition.relative
        );
    }
    Ok(())
}
