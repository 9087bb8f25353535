use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use topo_config::TopoConfig;
use topo_diff::{ReviewReport, compare_identities, render_markdown};
use topo_git::Repository;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::DiffArgs;
use crate::output::{TextOutput, output};
use crate::review::{RevisionLoader, load_pair_blocking};

#[derive(Debug, Serialize)]
struct DiffResponse {
    base: String,
    head: String,
    no_changes: bool,
    changed: usize,
    failed: usize,
    report: ReviewReport,
    #[serde(skip)]
    markdown: String,
}

impl TextOutput for DiffResponse {
    fn text(&self) -> String {
        self.markdown.clone()
    }
}

/// Handle `topo diff`.
pub async fn handle(
    args: &DiffArgs,
    project_root: &Path,
    config: &TopoConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let repo = Repository::discover(project_root)?;
    let loader = Arc::new(RevisionLoader::new(repo, config, &args.base, &args.head)?);

    let identities = if args.graphs.is_empty() {
        loader.discover_identities()?
    } else {
        args.graphs
            .iter()
            .map(|path| loader.identity_for(path))
            .collect::<anyhow::Result<BTreeSet<_>>>()?
    };

    let report = compare_identities(identities, |identity| {
        load_pair_blocking(Arc::clone(&loader), identity)
    })
    .await;

    for section in &report.sections {
        if let topo_diff::IdentityOutcome::Failed { error } = &section.outcome {
            tracing::warn!(identity = %section.identity, %error, "graph comparison failed");
        }
    }

    let markdown = render_markdown(&report, &config.layout.snapshot_path);
    if let Some(path) = &args.output {
        let path = project_root.join(path);
        std::fs::write(&path, &markdown)
            .with_context(|| format!("failed to write report {}", path.display()))?;
    }

    output(
        &DiffResponse {
            base: args.base.clone(),
            head: args.head.clone(),
            no_changes: report.no_changes(),
            changed: report.changed_count(),
            failed: report.failed_count(),
            report,
            markdown,
        },
        flags.format,
    )
}
