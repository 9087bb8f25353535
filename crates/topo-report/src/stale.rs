//! Snapshot staleness gate.
//!
//! A change set is stale when it touches a definition file but not the
//! snapshot committed next to it.

use std::collections::BTreeSet;

use serde::Serialize;
use topo_config::LayoutConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotStale {
    pub definition: String,
    pub snapshot: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StaleCheckReport {
    /// Definition files examined.
    pub checked: Vec<String>,
    pub findings: Vec<SnapshotStale>,
}

impl StaleCheckReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Snapshot path for the application whose definition lives at `definition`.
#[must_use]
pub fn snapshot_for(definition: &str, layout: &LayoutConfig) -> String {
    match definition.rfind('/') {
        Some(i) => format!("{}/{}", &definition[..i], layout.snapshot_path),
        None => layout.snapshot_path.clone(),
    }
}

/// Check a set of changed repository-relative paths.
///
/// A deleted application removes both files, so both appear in `changed`
/// and the check passes.
#[must_use]
pub fn check_snapshots(changed: &[String], layout: &LayoutConfig) -> StaleCheckReport {
    let changed_set: BTreeSet<&str> = changed.iter().map(|p| normalize(p)).collect();
    let mut report = StaleCheckReport::default();

    for definition in changed_set.iter().copied().filter(|p| layout.is_definition(p)) {
        let snapshot = snapshot_for(definition, layout);
        report.checked.push(definition.to_string());
        if changed_set.contains(snapshot.as_str()) {
            continue;
        }
        tracing::warn!(definition, snapshot = %snapshot, "snapshot not updated");
        report.findings.push(SnapshotStale {
            message: format!(
                "{definition} changed but {snapshot} was not updated. \
                 Run `topo snapshot {definition}` and commit the result."
            ),
            definition: definition.to_string(),
            snapshot,
        });
    }
    report
}

fn normalize(path: &str) -> &str {
    path.trim_start_matches("./")
}
