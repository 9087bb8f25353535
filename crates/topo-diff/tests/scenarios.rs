//! End-to-end review scenarios: diff, fan-out and Markdown report together.

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use topo_core::{Category, ConnectionEdge, Graph, GraphIdentity, ResourceNode, SourceLocation};
use topo_diff::{
    GraphPair, IdentityOutcome, NO_CHANGES_SENTINEL, ReviewReport, compare_identities, diff_graphs,
    render_markdown,
};

const SNAPSHOT: &str = ".radius/app-graph.json";

fn node(identity: &str, id: &str, category: Category, line: u32) -> ResourceNode {
    let resource_type = match category {
        Category::Datastore => "Applications.Datastores/redisCaches",
        _ => "Applications.Core/containers",
    };
    let file = if identity.is_empty() {
        "app.bicep".to_string()
    } else {
        format!("{identity}/app.bicep")
    };
    ResourceNode {
        id: id.to_string(),
        resource_type: resource_type.to_string(),
        category,
        label: id.to_string(),
        source: Some(SourceLocation {
            file,
            line: Some(line),
        }),
        metadata: BTreeMap::new(),
    }
}

fn shop(identity: &str, with_cache: bool) -> Graph {
    let mut nodes = vec![
        node(identity, "frontend", Category::Container, 5),
        node(identity, "backend", Category::Container, 20),
        node(identity, "database", Category::Datastore, 40),
    ];
    let mut edges = vec![
        ConnectionEdge::new("frontend", "backend"),
        ConnectionEdge::new("backend", "database"),
    ];
    if with_cache {
        nodes.push(node(identity, "cache", Category::Datastore, 55));
        edges.push(ConnectionEdge::new("backend", "cache"));
    }
    Graph::new(GraphIdentity::new(identity), Some("shop".to_string()), nodes, edges).unwrap()
}

#[test]
fn adding_a_connection_yields_one_added_edge() {
    let diff = diff_graphs(&shop("", false), &shop("", true));

    assert_eq!(diff.added_edges, vec![ConnectionEdge::new("backend", "cache")]);
    assert!(diff.removed_edges.is_empty());
    assert!(diff.modified_edges.is_empty());
    assert!(diff.modified_nodes.is_empty());
    assert!(diff.removed_nodes.is_empty());
    assert_eq!(diff.unchanged_nodes, 3);
    assert!(!diff.no_changes);
}

#[test]
fn self_diff_renders_the_sentinel() {
    let graph = shop("", true);
    let report = ReviewReport::from_outcomes([(
        graph.identity().clone(),
        IdentityOutcome::Compared {
            diff: diff_graphs(&graph, &graph),
        },
    )]);
    let markdown = render_markdown(&report, SNAPSHOT);
    assert!(markdown.ends_with(&format!("{NO_CHANGES_SENTINEL}\n")));
    assert!(!markdown.contains("###"));
}

#[tokio::test]
async fn two_identities_one_changed() {
    let report = compare_identities(
        [GraphIdentity::new("apps/shop"), GraphIdentity::new("apps/blog")],
        |identity| async move {
            let name = identity.as_str().to_string();
            let changed = name == "apps/shop";
            Ok::<_, String>(GraphPair {
                old: Some(shop(&name, false)),
                new: Some(shop(&name, changed)),
            })
        },
    )
    .await;

    assert_eq!(report.changed_count(), 1);
    let markdown = render_markdown(&report, SNAPSHOT);

    let blog = markdown.find("### 📦 `apps/blog`").unwrap();
    let shop_at = markdown.find("### 📦 `apps/shop`").unwrap();
    assert!(blog < shop_at, "sections are ordered by identity");

    let blog_section = &markdown[blog..shop_at];
    assert!(blog_section.contains("> No resource or connection changes."));

    let shop_section = &markdown[shop_at..];
    assert!(shop_section.contains("| 🟢 Added | **cache** — `redisCaches` — apps/shop/app.bicep:55 |"));
    assert!(shop_section.contains("| 🟢 Added | backend → cache |"));
    assert!(markdown.contains(&format!("comparing `{SNAPSHOT}`")));
}

#[tokio::test]
async fn application_added_in_head_is_all_additions() {
    let report = compare_identities([GraphIdentity::new("apps/new")], |identity| async move {
        Ok::<_, String>(GraphPair {
            old: None,
            new: Some(shop(identity.as_str(), false)),
        })
    })
    .await;

    let IdentityOutcome::Compared { diff } = &report.sections[0].outcome else {
        panic!("expected a comparison");
    };
    assert_eq!(diff.added_nodes.len(), 3);
    assert_eq!(diff.added_edges.len(), 2);
    assert!(render_markdown(&report, SNAPSHOT).contains("_New application graph._"));
}
