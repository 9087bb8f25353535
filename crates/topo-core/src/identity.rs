//! Graph identities.
//!
//! A repository may hold several applications, each with its own definition
//! file and snapshot. The identity of an application graph is the directory
//! holding its definition file, relative to the repository root and written
//! with forward slashes. The repository root itself is the empty identity.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(transparent)]
pub struct GraphIdentity(String);

impl GraphIdentity {
    /// Build an identity from a repository-relative directory path.
    #[must_use]
    pub fn new(path: impl AsRef<str>) -> Self {
        Self(normalize(path.as_ref()))
    }

    /// The identity of an application living at the repository root.
    #[must_use]
    pub const fn root() -> Self {
        Self(String::new())
    }

    /// Identity of the application whose definition file is `definition`
    /// (repository-relative).
    #[must_use]
    pub fn from_definition_path(definition: &str) -> Self {
        let normalized = normalize(definition);
        match normalized.rsplit_once('/') {
            Some((dir, _)) => Self(dir.to_string()),
            None => Self::root(),
        }
    }

    /// Identity of the application owning `snapshot` (repository-relative),
    /// given the conventional snapshot location inside an application root.
    ///
    /// Returns `None` when `snapshot` is not at the conventional location.
    #[must_use]
    pub fn from_snapshot_path(snapshot: &str, snapshot_path: &str) -> Option<Self> {
        let snapshot = normalize(snapshot);
        let suffix = normalize(snapshot_path);
        if snapshot == suffix {
            return Some(Self::root());
        }
        snapshot
            .strip_suffix(&suffix)
            .and_then(|prefix| prefix.strip_suffix('/'))
            .map(Self::new)
    }

    /// Repository-relative path of `relative` inside this application root.
    #[must_use]
    pub fn join(&self, relative: &str) -> String {
        let relative = normalize(relative);
        if self.0.is_empty() {
            relative
        } else {
            format!("{}/{relative}", self.0)
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for GraphIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("(root)")
        } else {
            f.write_str(&self.0)
        }
    }
}

fn normalize(path: &str) -> String {
    let path = path.trim().replace('\\', "/");
    let mut parts = Vec::new();
    for part in path.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        parts.push(part);
    }
    parts.join("/")
}
