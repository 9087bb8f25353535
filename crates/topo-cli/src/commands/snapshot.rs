use std::path::Path;

use anyhow::bail;
use topo_config::TopoConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SnapshotArgs;
use crate::commands::publish::{PublishResponse, mode_name};
use crate::output::output;
use crate::pipeline::{self, Definition, FileStatus};

/// Handle `topo snapshot`.
pub async fn handle(
    args: &SnapshotArgs,
    project_root: &Path,
    config: &TopoConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let definition = Definition::locate(project_root, &args.definition)?;
    let extracted = pipeline::extract_graph(config, &definition, args.direct).await?;
    let (snapshot, snapshot_status) =
        pipeline::write_snapshot(config, &definition, &extracted.graph, args.check)?;

    let response = PublishResponse {
        identity: definition.identity().to_string(),
        definition: definition.relative.clone(),
        extraction: mode_name(extracted.mode),
        nodes: extracted.graph.nodes().len(),
        edges: extracted.graph.edges().len(),
        skipped_relations: extracted.skipped.len(),
        snapshot,
        snapshot_status,
        document: None,
        document_status: None,
    };
    output(&response, flags.format)?;

    if snapshot_status == FileStatus::Stale {
        bail!(
            "snapshot --check: {} is out of date. Run `topo snapshot {}` and commit the result.",
            response.snapshot,
            definition.relative
        );
    }
    Ok(())
}
