//! Markdown rendering of a [`ReviewReport`] for a pull request comment.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use topo_core::{ConnectionEdge, DEFAULT_RELATION, ResourceNode};

use crate::model::{DiffResult, FieldChange, GraphStatus};
use crate::review::{IdentityOutcome, IdentityReport, ReviewReport};

/// Umbrella heading of every report.
pub const REPORT_TITLE: &str = "## 📊 App Graph Diff";

/// Whole-report body when nothing changed anywhere.
pub const NO_CHANGES_SENTINEL: &str = "No app graph changes detected.";

const SECTION_UNCHANGED: &str = "> No resource or connection changes.";

/// Render the full report.
///
/// `snapshot_path` is the per-application snapshot location named in the
/// footer (e.g. `.radius/app-graph.json`).
#[must_use]
pub fn render_markdown(report: &ReviewReport, snapshot_path: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{REPORT_TITLE}\n");

    if report.no_changes() {
        let _ = writeln!(out, "{NO_CHANGES_SENTINEL}");
        return out;
    }

    let sections: Vec<String> = report.sections.iter().map(render_section).collect();
    out.push_str(&sections.join("\n"));
    let _ = write!(
        out,
        "\n---\n*Auto-generated by topo — comparing `{snapshot_path}`*\n"
    );
    out
}

fn render_section(section: &IdentityReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "### 📦 `{}`\n", section.identity);

    let diff = match &section.outcome {
        IdentityOutcome::Failed { error } => {
            let _ = writeln!(out, "> ❌ {}", single_line(error));
            return out;
        }
        IdentityOutcome::Compared { diff } => diff,
    };

    match diff.status {
        GraphStatus::Added => out.push_str("_New application graph._\n\n"),
        GraphStatus::Removed => out.push_str("_Application graph removed._\n\n"),
        GraphStatus::Present => {}
    }

    if diff.no_changes {
        let _ = writeln!(out, "{SECTION_UNCHANGED}");
        return out;
    }

    if diff.has_node_changes() {
        render_resources(&mut out, diff);
    }
    if diff.has_edge_changes() {
        render_connections(&mut out, diff);
    }
    render_self_loops(&mut out, diff);
    let _ = writeln!(out, "*Resources: {}*", summary(diff));
    out
}

fn render_resources(out: &mut String, diff: &DiffResult) {
    out.push_str("#### Resources\n\n");
    out.push_str("| Status | Resource |\n");
    out.push_str("|--------|----------|\n");
    for node in &diff.added_nodes {
        let _ = writeln!(out, "| 🟢 Added | {} |", resource_label(node));
    }
    for node in &diff.removed_nodes {
        let _ = writeln!(out, "| 🔴 Removed | {} |", resource_label(node));
    }
    for change in &diff.modified_nodes {
        let _ = writeln!(
            out,
            "| 🟡 Modified | {} ({}) |",
            resource_label(&change.after),
            fields_label(&change.fields)
        );
    }
    out.push('\n');
}

fn render_connections(out: &mut String, diff: &DiffResult) {
    let names = display_names(diff);
    out.push_str("#### Connections\n\n");
    out.push_str("| Status | Connection |\n");
    out.push_str("|--------|------------|\n");
    for edge in &diff.added_edges {
        let _ = writeln!(out, "| 🟢 Added | {} |", connection_label(edge, &names));
    }
    for edge in &diff.removed_edges {
        let _ = writeln!(out, "| 🔴 Removed | {} |", connection_label(edge, &names));
    }
    for change in &diff.modified_edges {
        let _ = writeln!(
            out,
            "| 🟡 Modified | {} ({}) |",
            connection_label(&change.after, &names),
            fields_label(&change.fields)
        );
    }
    out.push('\n');
}

fn render_self_loops(out: &mut String, diff: &DiffResult) {
    let mut any = false;
    for edge in diff.new_self_loops() {
        let _ = writeln!(
            out,
            "> ⚠️ New self-loop: `{}` connects to itself.",
            escape_cell(&edge.source)
        );
        any = true;
    }
    if any {
        out.push('\n');
    }
}

fn summary(diff: &DiffResult) -> String {
    let mut parts = Vec::new();
    if !diff.added_nodes.is_empty() {
        parts.push(format!("+{} added", diff.added_nodes.len()));
    }
    if !diff.removed_nodes.is_empty() {
        parts.push(format!("-{} removed", diff.removed_nodes.len()));
    }
    if !diff.modified_nodes.is_empty() {
        parts.push(format!("~{} modified", diff.modified_nodes.len()));
    }
    if diff.unchanged_nodes > 0 {
        parts.push(format!("{} unchanged", diff.unchanged_nodes));
    }
    if parts.is_empty() {
        // Only connections changed.
        parts.push("0 changed".to_string());
    }
    parts.join(", ")
}

/// `**name** — `type` — file:line`
fn resource_label(node: &ResourceNode) -> String {
    let mut parts = vec![
        format!("**{}**", escape_cell(&node.label)),
        format!("`{}`", node.short_type()),
    ];
    if let Some(source) = &node.source {
        match source.line {
            Some(line) => parts.push(format!("{}:{line}", escape_cell(&source.file))),
            None => parts.push(escape_cell(&source.file)),
        }
    }
    parts.join(" — ")
}

fn connection_label(edge: &ConnectionEdge, names: &BTreeMap<&str, &str>) -> String {
    let name = |id: &str| escape_cell(names.get(id).copied().unwrap_or(id));
    let mut label = format!("{} → {}", name(&edge.source), name(&edge.target));
    if edge.kind != DEFAULT_RELATION {
        let _ = write!(label, " _{}_", escape_cell(&edge.kind));
    }
    label
}

fn fields_label(fields: &[FieldChange]) -> String {
    fields
        .iter()
        .map(|change| {
            format!(
                "`{}`: {} → {}",
                change.field,
                value_label(change.before.as_deref()),
                value_label(change.after.as_deref())
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn value_label(value: Option<&str>) -> String {
    value.map_or_else(|| "∅".to_string(), |v| format!("`{}`", escape_cell(v)))
}

/// Node labels by id across both revisions, new side winning.
fn display_names(diff: &DiffResult) -> BTreeMap<&str, &str> {
    let mut names: BTreeMap<&str, &str> = diff
        .endpoint_labels
        .iter()
        .map(|(id, label)| (id.as_str(), label.as_str()))
        .collect();
    for node in diff
        .removed_nodes
        .iter()
        .chain(diff.modified_nodes.iter().map(|c| &c.before))
        .chain(&diff.added_nodes)
        .chain(diff.modified_nodes.iter().map(|c| &c.after))
    {
        names.insert(node.id.as_str(), node.label.as_str());
    }
    names
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn single_line(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;
    use topo_core::{Category, Graph, GraphIdentity, SourceLocation};

    use super::*;
    use crate::engine::diff_graphs;

    fn node(id: &str, line: u32) -> ResourceNode {
        ResourceNode {
            id: id.to_string(),
            resource_type: "Applications.Core/containers".to_string(),
            category: Category::Container,
            label: id.to_string(),
            source: Some(SourceLocation {
                file: "app.bicep".to_string(),
                line: Some(line),
            }),
            metadata: BTreeMap::new(),
        }
    }

    fn report_for(old: &Graph, new: &Graph) -> ReviewReport {
        ReviewReport::from_outcomes([(
            new.identity().clone(),
            IdentityOutcome::Compared {
                diff: diff_graphs(old, new),
            },
        )])
    }

    const CONTAINERS: &str =
        "/planes/radius/local/resourceGroups/rg/providers/Applications.Core/containers";

    fn arm_node(name: &str, line: u32) -> ResourceNode {
        ResourceNode {
            id: format!("{CONTAINERS}/{name}"),
            label: name.to_string(),
            ..node(name, line)
        }
    }

    fn arm_edge(source: &str, target: &str) -> ConnectionEdge {
        ConnectionEdge::new(format!("{CONTAINERS}/{source}"), format!("{CONTAINERS}/{target}"))
    }

    #[test]
    fn connection_to_unchanged_node_uses_its_name() {
        let old = Graph::new(
            GraphIdentity::root(),
            None,
            vec![arm_node("frontend", 1), arm_node("backend", 10), arm_node("database", 20)],
            vec![arm_edge("frontend", "backend"), arm_edge("backend", "database")],
        )
        .unwrap();
        let new = Graph::new(
            GraphIdentity::root(),
            None,
            vec![
                arm_node("frontend", 1),
                arm_node("backend", 10),
                arm_node("database", 20),
                arm_node("cache", 30),
            ],
            vec![
                arm_edge("frontend", "backend"),
                arm_edge("backend", "database"),
                arm_edge("backend", "cache"),
            ],
        )
        .unwrap();

        let markdown = render_markdown(&report_for(&old, &new), ".radius/app-graph.json");
        assert!(markdown.contains("| 🟢 Added | backend → cache |"), "{markdown}");
        assert!(!markdown.contains("/planes/radius"));
    }

    #[test]
    fn removed_connection_between_unchanged_nodes_uses_names() {
        let old = Graph::new(
            GraphIdentity::root(),
            None,
            vec![arm_node("frontend", 1), arm_node("backend", 10)],
            vec![arm_edge("frontend", "backend")],
        )
        .unwrap();
        let new = Graph::new(
            GraphIdentity::root(),
            None,
            vec![arm_node("frontend", 1), arm_node("backend", 10)],
            vec![],
        )
        .unwrap();

        let markdown = render_markdown(&report_for(&old, &new), ".radius/app-graph.json");
        assert!(markdown.contains("| 🔴 Removed | frontend → backend |"), "{markdown}");
    }

    #[test]
    fn unchanged_report_is_the_sentinel() {
        let graph = Graph::new(GraphIdentity::root(), None, vec![node("a", 1)], vec![]).unwrap();
        let markdown = render_markdown(&report_for(&graph, &graph), ".radius/app-graph.json");
        assert_eq!(
            markdown,
            "## 📊 App Graph Diff\n\nNo app graph changes detected.\n"
        );
    }

    #[test]
    fn added_resource_renders_table_and_summary() {
        let old = Graph::new(GraphIdentity::root(), None, vec![node("web", 4)], vec![]).unwrap();
        let new = Graph::new(
            GraphIdentity::root(),
            None,
            vec![node("web", 4), node("api", 12)],
            vec![ConnectionEdge::new("web", "api")],
        )
        .unwrap();

        let markdown = render_markdown(&report_for(&old, &new), ".radius/app-graph.json");
        let expected = "\
## 📊 App Graph Diff

### 📦 `(root)`

#### Resources

| Status | Resource |
|--------|----------|
| 🟢 Added | **api** — `containers` — app.bicep:12 |

#### Connections

| Status | Connection |
|--------|------------|
| 🟢 Added | web → api |

*Resources: +1 added, 1 unchanged*

---
*Auto-generated by topo — comparing `.radius/app-graph.json`*
";
        assert_eq!(markdown, expected);
    }

    #[test]
    fn failed_section_is_reported_not_omitted() {
        let report = ReviewReport::from_outcomes([(
            GraphIdentity::new("apps/broken"),
            IdentityOutcome::Failed {
                error: "schema mismatch:\nmissing resources".to_string(),
            },
        )]);
        let markdown = render_markdown(&report, ".radius/app-graph.json");
        assert!(markdown.contains("### 📦 `apps/broken`\n\n> ❌ schema mismatch: missing resources\n"));
        assert!(!markdown.contains(NO_CHANGES_SENTINEL));
    }

    #[test]
    fn modified_fields_and_relation_kind_are_shown() {
        let mut before = node("api", 3);
        before.metadata.insert("image".to_string(), "api:1".to_string());
        let mut after = node("api", 3);
        after.metadata.insert("image".to_string(), "api:2".to_string());
        let old = Graph::new(GraphIdentity::root(), None, vec![before, node("db", 9)], vec![])
            .unwrap();
        let new = Graph::new(
            GraphIdentity::root(),
            None,
            vec![after, node("db", 9)],
            vec![ConnectionEdge::new("api", "db").with_kind("dependsOn")],
        )
        .unwrap();

        let markdown = render_markdown(&report_for(&old, &new), "snap.json");
        assert!(markdown.contains(
            "| 🟡 Modified | **api** — `containers` — app.bicep:3 (`metadata.image`: `api:1` → `api:2`) |"
        ));
        assert!(markdown.contains("| 🟢 Added | api → db _dependsOn_ |"));
        assert!(markdown.contains("*Resources: ~1 modified, 1 unchanged*"));
    }
}
