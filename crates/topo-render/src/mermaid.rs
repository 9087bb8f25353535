//! Mermaid flowchart rendering.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use topo_config::{CategoryStyle, NodeShape, RepoConfig, ThemeConfig};
use topo_core::{Category, DEFAULT_RELATION, Graph, ResourceNode};

/// Identifiers Mermaid treats as keywords inside a flowchart.
const RESERVED: &[&str] = &[
    "end", "graph", "flowchart", "subgraph", "click", "style", "class", "classdef", "linkstyle",
    "direction", "call", "href",
];

/// Renders graphs with a fixed theme and, optionally, source links.
pub struct MermaidRenderer<'a> {
    theme: &'a ThemeConfig,
    repo: Option<&'a RepoConfig>,
}

impl<'a> MermaidRenderer<'a> {
    #[must_use]
    pub const fn new(theme: &'a ThemeConfig) -> Self {
        Self { theme, repo: None }
    }

    /// Emit `click` links into this repository. Ignored when the repository
    /// coordinates are incomplete.
    #[must_use]
    pub fn with_links(mut self, repo: &'a RepoConfig) -> Self {
        if repo.is_configured() {
            self.repo = Some(repo);
        } else {
            tracing::debug!("repository not configured; diagram has no source links");
        }
        self
    }

    #[must_use]
    pub fn render(&self, graph: &Graph) -> String {
        let ids = mermaid_ids(graph.nodes());
        let mut out = String::new();

        let _ = writeln!(out, "{}", self.init_directive());
        let _ = writeln!(out, "graph {}", self.theme.direction);

        for category in Category::RENDERED {
            let _ = writeln!(
                out,
                "    classDef {} {}",
                category.as_str(),
                class_def(&self.theme.style_for(category))
            );
        }

        for node in graph.nodes() {
            let style = self.theme.style_for(node.category);
            let _ = writeln!(
                out,
                "    {}:::{}",
                shaped(&ids[node.id.as_str()], &self.label(node), style.shape),
                class_name(node.category)
            );
        }

        for edge in graph.edges() {
            let (from, to) = (&ids[edge.source.as_str()], &ids[edge.target.as_str()]);
            if edge.kind == DEFAULT_RELATION {
                let _ = writeln!(out, "    {from} --> {to}");
            } else {
                let _ = writeln!(out, "    {from} -->|{}| {to}", escape(&edge.kind));
            }
        }

        if let Some(repo) = self.repo {
            for node in graph.nodes() {
                let Some((file, line)) = node.located_line() else {
                    continue;
                };
                let _ = writeln!(
                    out,
                    "    click {} href \"{}\" \"{}\" _blank",
                    ids[node.id.as_str()],
                    repo.blob_url(file, line),
                    escape(&format!("{} — {file} line {line}", node.label))
                );
            }
        }

        for index in 0..graph.edges().len() {
            let _ = writeln!(
                out,
                "    linkStyle {index} stroke:{},stroke-width:{}",
                self.theme.edge.stroke, self.theme.edge.stroke_width
            );
        }

        // No trailing newline: the caller places the text inside a fence.
        out.truncate(out.trim_end().len());
        out
    }

    fn init_directive(&self) -> String {
        let v = &self.theme.variables;
        let variables = [
            ("primaryColor", v.primary_color.as_str()),
            ("primaryTextColor", v.primary_text_color.as_str()),
            ("primaryBorderColor", v.primary_border_color.as_str()),
            ("lineColor", v.line_color.as_str()),
            ("secondaryColor", v.secondary_color.as_str()),
            ("tertiaryColor", v.tertiary_color.as_str()),
            ("background", v.background.as_str()),
            ("fontFamily", self.theme.font_family.as_str()),
            ("fontSize", self.theme.font_size.as_str()),
        ]
        .iter()
        .map(|(key, value)| format!("'{key}': '{}'", value.replace('\'', "")))
        .collect::<Vec<_>>()
        .join(", ");
        format!("%%{{init: {{'theme': 'base', 'themeVariables': {{{variables}}}}}}}%%")
    }

    /// `<b>name</b>`, then configured metadata values, then `file Lline`.
    fn label(&self, node: &ResourceNode) -> String {
        let mut parts = vec![format!("<b>{}</b>", escape(&node.label))];
        for key in &self.theme.label_keys {
            if let Some(value) = node.metadata.get(key) {
                parts.push(escape(value));
            }
        }
        if let Some((file, line)) = node.located_line() {
            parts.push(escape(&format!("{file} L{line}")));
        }
        parts.join("<br/>")
    }
}

/// Section body for the target document: a generated-content notice and the
/// fenced diagram.
#[must_use]
pub fn diagram_section(definition_file: &str, diagram: &str) -> String {
    format!(
        "> *Auto-generated from `{definition_file}` — click any node to jump to its definition in the source.*\n\
         \n\
         ```mermaid\n\
         {diagram}\n\
         ```\n"
    )
}

fn class_name(category: Category) -> &'static str {
    match category {
        Category::Container | Category::Datastore => category.as_str(),
        Category::Other | Category::Application => Category::Other.as_str(),
    }
}

fn class_def(style: &CategoryStyle) -> String {
    let mut def = format!(
        "fill:{},stroke:{},stroke-width:{},color:{}",
        style.fill, style.stroke, style.stroke_width, style.color
    );
    if style.corner_radius > 0 {
        let _ = write!(def, ",rx:{0},ry:{0}", style.corner_radius);
    }
    def
}

fn shaped(id: &str, label: &str, shape: NodeShape) -> String {
    match shape {
        NodeShape::Rect => format!("{id}[\"{label}\"]"),
        NodeShape::Rounded => format!("{id}(\"{label}\")"),
        NodeShape::Stadium => format!("{id}([\"{label}\"])"),
        NodeShape::Cylinder => format!("{id}[(\"{label}\")]"),
        NodeShape::Hexagon => format!("{id}{{{{\"{label}\"}}}}"),
    }
}

/// Mermaid-safe text: entity codes for quotes, angle brackets and pipes.
fn escape(text: &str) -> String {
    text.replace('"', "#quot;")
        .replace('<', "#lt;")
        .replace('>', "#gt;")
        .replace('|', "#124;")
}

/// Stable Mermaid identifiers for every node, in canonical node order.
///
/// The last path segment of the node id is reduced to `[A-Za-z0-9_]`;
/// collisions get `_2`, `_3`, ... in node order.
fn mermaid_ids(nodes: &[ResourceNode]) -> BTreeMap<&str, String> {
    let mut taken = BTreeSet::new();
    let mut ids = BTreeMap::new();
    for node in nodes {
        let base = sanitize(&node.id);
        let mut candidate = base.clone();
        let mut suffix = 2;
        while taken.contains(&candidate) {
            candidate = format!("{base}_{suffix}");
            suffix += 1;
        }
        taken.insert(candidate.clone());
        ids.insert(node.id.as_str(), candidate);
    }
    ids
}

fn sanitize(id: &str) -> String {
    let segment = id
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(id);
    let mut out: String = segment
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() {
        out.push_str("node");
    }
    if out.starts_with(|c: char| c.is_ascii_digit())
        || RESERVED.contains(&out.to_ascii_lowercase().as_str())
    {
        out.insert_str(0, "n_");
    }
    out
}
