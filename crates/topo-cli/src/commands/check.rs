use std::path::Path;

use anyhow::bail;
use serde::Serialize;
use topo_config::TopoConfig;
use topo_git::Repository;
use topo_report::{StaleCheckReport, check_snapshots};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CheckArgs;
use crate::output::{TextOutput, output};

#[derive(Debug, Serialize)]
struct CheckResponse {
    passed: bool,
    #[serde(flatten)]
    report: StaleCheckReport,
}

impl TextOutput for CheckResponse {
    fn text(&self) -> String {
        if self.passed {
            return format!(
                "Snapshots up to date ({} definition(s) checked).",
                self.report.checked.len()
            );
        }
        self.report
            .findings
            .iter()
            .map(|finding| format!("✗ {}", finding.message))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Handle `topo check`.
pub fn handle(
    args: &CheckArgs,
    project_root: &Path,
    config: &TopoConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let changed = if args.changed.is_empty() {
        let repo = Repository::discover(project_root)?;
        match (&args.base, &args.head) {
            (Some(base), Some(head)) => repo.changed_files(base, head)?,
            _ => repo.staged_files()?,
        }
    } else {
        args.changed.clone()
    };

    let report = check_snapshots(&changed, &config.layout);
    let response = CheckResponse {
        passed: report.passed(),
        report,
    };
    output(&response, flags.format)?;

    if !response.passed {
        bail!(
            "snapshot check failed: {} stale snapshot(s)",
            response.report.findings.len()
        );
    }
    Ok(())
}
