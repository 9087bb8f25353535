use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use topo_config::TopoConfig;
use topo_render::MermaidRenderer;
use topo_schema::{SchemaRegistry, decode_snapshot};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RenderArgs;
use crate::output::{TextOutput, output};

#[derive(Debug, Serialize)]
struct RenderResponse {
    identity: String,
    diagram: String,
}

impl TextOutput for RenderResponse {
    fn text(&self) -> String {
        self.diagram.clone()
    }
}

/// Handle `topo render`.
pub fn handle(
    args: &RenderArgs,
    project_root: &Path,
    config: &TopoConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let path = project_root.join(&args.snapshot);
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let snapshot = decode_snapshot(&SchemaRegistry::new(), &text)
        .with_context(|| format!("invalid snapshot {}", path.display()))?;

    let diagram = MermaidRenderer::new(&config.theme)
        .with_links(&config.repo)
        .render(&snapshot.graph);
    output(
        &RenderResponse {
            identity: snapshot.identity().to_string(),
            diagram,
        },
        flags.format,
    )
}
