//! Rendering a full graph and splicing it into a README.

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use topo_config::{RepoConfig, ThemeConfig};
use topo_core::{Category, ConnectionEdge, Graph, GraphIdentity, ResourceNode, SourceLocation};
use topo_render::{MermaidRenderer, diagram_section, patch_section};

fn node(id: &str, category: Category, line: Option<u32>, image: Option<&str>) -> ResourceNode {
    ResourceNode {
        id: id.to_string(),
        resource_type: "Applications.Core/containers".to_string(),
        category,
        label: id.to_string(),
        source: Some(SourceLocation {
            file: "app.bicep".to_string(),
            line,
        }),
        metadata: image
            .map(|i| BTreeMap::from([("image".to_string(), i.to_string())]))
            .unwrap_or_default(),
    }
}

fn shop(reversed: bool) -> Graph {
    let mut nodes = vec![
        node("frontend", Category::Container, Some(12), Some("nginx:alpine")),
        node("backend", Category::Container, Some(30), None),
        node("cache", Category::Datastore, None, None),
    ];
    let mut edges = vec![
        ConnectionEdge::new("frontend", "backend"),
        ConnectionEdge::new("backend", "cache").with_kind("dependsOn"),
    ];
    if reversed {
        nodes.reverse();
        edges.reverse();
    }
    Graph::new(GraphIdentity::root(), Some("shop".to_string()), nodes, edges).unwrap()
}

fn repo() -> RepoConfig {
    RepoConfig {
        owner: "acme".to_string(),
        name: "shop".to_string(),
        ..RepoConfig::default()
    }
}

#[test]
fn renders_themed_interactive_diagram() {
    let theme = ThemeConfig::default();
    let repo = repo();
    let diagram = MermaidRenderer::new(&theme).with_links(&repo).render(&shop(false));

    let expected = "\
%%{init: {'theme': 'base', 'themeVariables': {'primaryColor': '#ffffff', 'primaryTextColor': '#1f2328', 'primaryBorderColor': '#d1d9e0', 'lineColor': '#2da44e', 'secondaryColor': '#f6f8fa', 'tertiaryColor': '#ffffff', 'background': '#ffffff', 'fontFamily': '-apple-system, BlinkMacSystemFont, Segoe UI, Noto Sans, Helvetica, Arial, sans-serif', 'fontSize': '14px'}}}%%
graph LR
    classDef container fill:#ffffff,stroke:#2da44e,stroke-width:1.5px,color:#1f2328,rx:6,ry:6
    classDef datastore fill:#ffffff,stroke:#d4a72c,stroke-width:1.5px,color:#1f2328,rx:6,ry:6
    classDef other fill:#ffffff,stroke:#d1d9e0,stroke-width:1.5px,color:#1f2328,rx:6,ry:6
    backend[\"<b>backend</b><br/>app.bicep L30\"]:::container
    cache[(\"<b>cache</b>\")]:::datastore
    frontend[\"<b>frontend</b><br/>nginx:alpine<br/>app.bicep L12\"]:::container
    backend -->|dependsOn| cache
    frontend --> backend
    click backend href \"https://github.com/acme/shop/blob/main/app.bicep#L30\" \"backend — app.bicep line 30\" _blank
    click frontend href \"https://github.com/acme/shop/blob/main/app.bicep#L12\" \"frontend — app.bicep line 12\" _blank
    linkStyle 0 stroke:#2da44e,stroke-width:1.5px
    linkStyle 1 stroke:#2da44e,stroke-width:1.5px";
    assert_eq!(diagram, expected);
}

#[test]
fn unconfigured_repository_means_no_click_directives() {
    let theme = ThemeConfig::default();
    let repo = RepoConfig::default();
    let diagram = MermaidRenderer::new(&theme).with_links(&repo).render(&shop(false));
    assert!(!diagram.contains("click "));
}

#[test]
fn publish_path_patches_readme_idempotently() {
    let theme = ThemeConfig::default();
    let repo = repo();
    let renderer = MermaidRenderer::new(&theme).with_links(&repo);
    let section = diagram_section("app.bicep", &renderer.render(&shop(false)));
    let readme = "# Shop\n\n## Architecture\n\nTBD\n\n## License\n\nMIT\n";

    let first = patch_section(readme, "Architecture", &section).unwrap();
    assert!(first.changed);
    assert!(first.text.contains("## Architecture\n\n> *Auto-generated from `app.bicep`"));
    assert!(first.text.contains("```mermaid\n%%{init:"));
    assert!(first.text.ends_with("```\n\n## License\n\nMIT\n"));

    let section_again = diagram_section("app.bicep", &renderer.render(&shop(true)));
    let second = patch_section(&first.text, "Architecture", &section_again).unwrap();
    assert!(!second.changed);
}

proptest! {
    #[test]
    fn rendering_ignores_input_order(ids in prop::collection::btree_set("[a-z][a-z0-9-]{0,8}", 1..8)) {
        let nodes: Vec<_> = ids.iter().map(|id| node(id, Category::Container, Some(1), None)).collect();
        let mut shuffled = nodes.clone();
        shuffled.reverse();
        let theme = ThemeConfig::default();
        let renderer = MermaidRenderer::new(&theme);
        let a = renderer.render(&Graph::new(GraphIdentity::root(), None, nodes, vec![]).unwrap());
        let b = renderer.render(&Graph::new(GraphIdentity::root(), None, shuffled, vec![]).unwrap());
        prop_assert_eq!(a, b);
    }
}
