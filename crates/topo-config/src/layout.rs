//! Repository layout conventions.

use serde::{Deserialize, Serialize};

fn default_definition_file() -> String {
    "app.bicep".to_string()
}

fn default_snapshot_path() -> String {
    ".radius/app-graph.json".to_string()
}

fn default_document() -> String {
    "README.md".to_string()
}

fn default_section() -> String {
    "Architecture".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LayoutConfig {
    /// File name of a definition file inside an application root.
    #[serde(default = "default_definition_file")]
    pub definition_file: String,

    /// Snapshot location relative to an application root.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,

    /// Document patched on publish, relative to the repository root.
    #[serde(default = "default_document")]
    pub document: String,

    /// Heading of the section owned by the diagram.
    #[serde(default = "default_section")]
    pub section: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            definition_file: default_definition_file(),
            snapshot_path: default_snapshot_path(),
            document: default_document(),
            section: default_section(),
        }
    }
}

impl LayoutConfig {
    /// Whether a repository-relative path names a definition file.
    #[must_use]
    pub fn is_definition(&self, path: &str) -> bool {
        path.rsplit(['/', '\\']).next() == Some(self.definition_file.as_str())
    }
}
