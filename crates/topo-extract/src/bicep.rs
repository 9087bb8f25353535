//! Direct scan of a Bicep definition file.
//!
//! Used when no extractor is configured. This is a pattern scan, not a
//! Bicep parser: it understands top-level `resource` blocks closed by a `}`
//! at column 0, and inside them `name:`, `image:`, `containerPort:`, the
//! keys of a `connections: { ... }` block and `source: <symbol>.id`
//! references.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::raw::{RawGraph, RawRelation, RawResource};

static RESOURCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)resource\s+(\w+)\s+'([^']+)'\s*=\s*\{(.*?)\n\}").expect("resource pattern")
});
static NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"name:\s*'([^']+)'").expect("name pattern"));
static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"image:\s*'([^']+)'").expect("image pattern"));
static PORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"containerPort:\s*(\d+)").expect("port pattern"));
static CONNECTIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)connections:\s*\{(.*?)\n\s*\}").expect("connections pattern")
});
static CONNECTION_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+):\s*\{").expect("connection key pattern"));
static SOURCE_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"source:\s*(\w+)\.(?:id|connectionString)").expect("source ref pattern")
});

/// Scan Bicep source text. Resources are identified by symbolic name and
/// labelled with their `name:` property when present.
#[must_use]
pub fn parse_bicep(content: &str) -> RawGraph {
    let mut graph = RawGraph::default();

    for capture in RESOURCE.captures_iter(content) {
        let (Some(whole), Some(symbol), Some(declared), Some(body)) =
            (capture.get(0), capture.get(1), capture.get(2), capture.get(3))
        else {
            continue;
        };
        let symbol = symbol.as_str();
        let body = body.as_str();
        let line = line_of(content, whole.start());

        let mut properties = BTreeMap::new();
        if let Some(image) = first_group(&IMAGE, body) {
            properties.insert("image".to_string(), image.to_string());
        }
        if let Some(port) = first_group(&PORT, body) {
            properties.insert("port".to_string(), port.to_string());
        }

        // `Applications.Core/containers@2023-10-01-preview`
        let resource_type = declared
            .as_str()
            .split_once('@')
            .map_or(declared.as_str(), |(ty, _)| ty);

        graph.resources.push(RawResource {
            id: symbol.to_string(),
            name: first_group(&NAME, body).unwrap_or(symbol).to_string(),
            resource_type: resource_type.to_string(),
            file: None,
            line,
            properties,
        });

        let mut targets: Vec<&str> = Vec::new();
        if let Some(block) = first_group(&CONNECTIONS, body) {
            targets.extend(
                CONNECTION_KEY
                    .captures_iter(block)
                    .filter_map(|c| c.get(1).map(|m| m.as_str())),
            );
        }
        targets.extend(
            SOURCE_REF
                .captures_iter(body)
                .filter_map(|c| c.get(1).map(|m| m.as_str())),
        );
        let mut seen = Vec::new();
        for target in targets {
            if seen.contains(&target) {
                continue;
            }
            seen.push(target);
            graph.relations.push(RawRelation {
                source: symbol.to_string(),
                target: target.to_string(),
                kind: None,
            });
        }
    }

    tracing::debug!(
        resources = graph.resources.len(),
        relations = graph.relations.len(),
        "scanned definition file"
    );
    graph
}

fn first_group<'a>(pattern: &Regex, text: &'a str) -> Option<&'a str> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

fn line_of(content: &str, offset: usize) -> u32 {
    let newlines = content[..offset].bytes().filter(|b| *b == b'\n').count();
    u32::try_from(newlines + 1).unwrap_or(u32::MAX)
}
