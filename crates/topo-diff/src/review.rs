//! Multi-identity review: one independent task per graph identity, merged
//! into a report ordered by identity.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Display;
use std::future::Future;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use topo_core::{Graph, GraphIdentity};

use crate::engine::diff_presence;
use crate::model::DiffResult;

/// Both revisions of one graph identity; `None` where it does not exist.
#[derive(Debug, Clone, Default)]
pub struct GraphPair {
    pub old: Option<Graph>,
    pub new: Option<Graph>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IdentityOutcome {
    Compared { diff: DiffResult },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct IdentityReport {
    pub identity: GraphIdentity,
    #[serde(flatten)]
    pub outcome: IdentityOutcome,
}

impl IdentityReport {
    #[must_use]
    pub fn has_changes(&self) -> bool {
        match &self.outcome {
            IdentityOutcome::Compared { diff } => !diff.no_changes,
            IdentityOutcome::Failed { .. } => false,
        }
    }
}

/// Per-identity outcomes, sorted by identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReviewReport {
    pub sections: Vec<IdentityReport>,
}

impl ReviewReport {
    /// Build a report, ordering sections by identity. A later outcome for the
    /// same identity replaces an earlier one.
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = (GraphIdentity, IdentityOutcome)>) -> Self {
        let ordered: BTreeMap<_, _> = outcomes.into_iter().collect();
        Self {
            sections: ordered
                .into_iter()
                .map(|(identity, outcome)| IdentityReport { identity, outcome })
                .collect(),
        }
    }

    /// True when every identity was compared and none changed.
    #[must_use]
    pub fn no_changes(&self) -> bool {
        self.sections.iter().all(|section| {
            matches!(&section.outcome, IdentityOutcome::Compared { diff } if diff.no_changes)
        })
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.sections
            .iter()
            .filter(|section| matches!(section.outcome, IdentityOutcome::Failed { .. }))
            .count()
    }

    #[must_use]
    pub fn changed_count(&self) -> usize {
        self.sections.iter().filter(|s| s.has_changes()).count()
    }
}

/// Load and compare every identity concurrently.
///
/// `load` produces the old/new pair for one identity. A load error, or a
/// panic inside the task, becomes a failed section for that identity only;
/// the other identities are still compared and reported.
pub async fn compare_identities<F, Fut, E>(
    identities: impl IntoIterator<Item = GraphIdentity>,
    load: F,
) -> ReviewReport
where
    F: Fn(GraphIdentity) -> Fut,
    Fut: Future<Output = Result<GraphPair, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let identities: BTreeSet<GraphIdentity> = identities.into_iter().collect();
    let mut tasks = JoinSet::new();
    let mut by_task = HashMap::new();

    for identity in identities {
        let pending = load(identity.clone());
        let task_identity = identity.clone();
        let handle = tasks.spawn(async move {
            let outcome = match pending.await {
                Ok(pair) => IdentityOutcome::Compared {
                    diff: diff_presence(task_identity.clone(), pair.old.as_ref(), pair.new.as_ref()),
                },
                Err(error) => IdentityOutcome::Failed {
                    error: error.to_string(),
                },
            };
            (task_identity, outcome)
        });
        by_task.insert(handle.id(), identity);
    }

    let mut outcomes = Vec::with_capacity(by_task.len());
    while let Some(joined) = tasks.join_next_with_id().await {
        match joined {
            Ok((_, (identity, outcome))) => {
                let changed =
                    matches!(&outcome, IdentityOutcome::Compared { diff } if !diff.no_changes);
                tracing::debug!(%identity, changed, "identity compared");
                outcomes.push((identity, outcome));
            }
            Err(error) => {
                let Some(identity) = by_task.get(&error.id()).cloned() else {
                    tracing::warn!(%error, "review task for unknown identity failed");
                    continue;
                };
                tracing::warn!(%identity, %error, "review task failed");
                outcomes.push((
                    identity,
                    IdentityOutcome::Failed {
                        error: format!("comparison task failed: {error}"),
                    },
                ));
            }
        }
    }

    ReviewReport::from_outcomes(outcomes)
}
