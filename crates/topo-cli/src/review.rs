//! Loading both revisions of each application graph for the review path.

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::Context;
use topo_config::TopoConfig;
use topo_core::{Graph, GraphIdentity};
use topo_diff::GraphPair;
use topo_extract::{Classifier, GraphBuilder, decode_document};
use topo_git::Repository;
use topo_schema::{SchemaRegistry, decode_snapshot, looks_like_snapshot};

/// Reads snapshot files out of two resolved revisions.
pub struct RevisionLoader {
    repo: Repository,
    base: String,
    head: String,
    snapshot_path: String,
    definition_file: String,
    classifier: Classifier,
    registry: SchemaRegistry,
}

impl RevisionLoader {
    /// Resolve `base` and `head` to commit ids up front so a typo fails the
    /// whole run instead of every identity.
    pub fn new(repo: Repository, config: &TopoConfig, base: &str, head: &str) -> anyhow::Result<Self> {
        let base = repo.resolve_revision(base)?;
        let head = repo.resolve_revision(head)?;
        Ok(Self {
            repo,
            base,
            head,
            snapshot_path: config.layout.snapshot_path.clone(),
            definition_file: config.layout.definition_file.clone(),
            classifier: Classifier::from_config(&config.classify)?,
            registry: SchemaRegistry::new(),
        })
    }

    /// Identities of every snapshot present in either revision.
    pub fn discover_identities(&self) -> anyhow::Result<BTreeSet<GraphIdentity>> {
        let mut identities = BTreeSet::new();
        for rev in [&self.base, &self.head] {
            for path in self.repo.list_files(rev)? {
                if let Some(identity) = GraphIdentity::from_snapshot_path(&path, &self.snapshot_path) {
                    identities.insert(identity);
                }
            }
        }
        tracing::debug!(count = identities.len(), "discovered snapshot identities");
        Ok(identities)
    }

    /// Identity owning an explicitly named snapshot path.
    pub fn identity_for(&self, snapshot: &str) -> anyhow::Result<GraphIdentity> {
        GraphIdentity::from_snapshot_path(snapshot, &self.snapshot_path).with_context(|| {
            format!(
                "'{snapshot}' is not a snapshot path (expected <app>/{})",
                self.snapshot_path
            )
        })
    }

    /// Both revisions of one identity's graph.
    pub fn load_pair(&self, identity: &GraphIdentity) -> anyhow::Result<GraphPair> {
        let path = identity.join(&self.snapshot_path);
        let old = self.load_graph(&self.base, &path, identity)?;
        let new = self.load_graph(&self.head, &path, identity)?;
        if old.is_none() && new.is_none() {
            anyhow::bail!("no snapshot at {path} in either revision");
        }
        Ok(GraphPair { old, new })
    }

    fn load_graph(
        &self,
        rev: &str,
        path: &str,
        identity: &GraphIdentity,
    ) -> anyhow::Result<Option<Graph>> {
        let Some(text) = self.repo.show_file(rev, path)? else {
            return Ok(None);
        };
        let short = &rev[..rev.len().min(8)];
        let value: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("{path} at {short} is not valid JSON"))?;

        if looks_like_snapshot(&value) {
            let snapshot = decode_snapshot(&self.registry, &text)
                .with_context(|| format!("invalid snapshot {path} at {short}"))?;
            return Ok(Some(snapshot.graph));
        }

        // Older revisions committed the extractor output verbatim.
        tracing::debug!(%path, rev = short, "decoding raw extractor output");
        let raw = decode_document(value, &text)
            .with_context(|| format!("unrecognized graph format in {path} at {short}"))?;
        let definition = self.repo.root().join(identity.join(&self.definition_file));
        let outcome = GraphBuilder::new(self.classifier.clone(), self.repo.root())
            .without_line_check()
            .build(&definition, raw)
            .with_context(|| format!("failed to build graph from {path} at {short}"))?;
        Ok(Some(outcome.graph))
    }
}

/// Load one identity on the blocking pool; git runs as a subprocess.
pub async fn load_pair_blocking(
    loader: Arc<RevisionLoader>,
    identity: GraphIdentity,
) -> anyhow::Result<GraphPair> {
    tokio::task::spawn_blocking(move || loader.load_pair(&identity))
        .await
        .context("snapshot loading task failed")?
}
