//! Resource classification rule table.
//!
//! Rules are glob patterns over the declared resource type, matched
//! case-insensitively in order; the first match decides the category.
//! `extra_rules` are consulted before the built-in `rules`, so a project can
//! add types without restating the defaults.

use serde::{Deserialize, Serialize};
use topo_core::Category;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ClassifyRule {
    /// Glob over the resource type, e.g. `*rediscaches*`.
    pub pattern: String,
    pub category: Category,
}

impl ClassifyRule {
    #[must_use]
    pub fn new(pattern: &str, category: Category) -> Self {
        Self {
            pattern: pattern.to_string(),
            category,
        }
    }
}

fn default_rules() -> Vec<ClassifyRule> {
    vec![
        ClassifyRule::new("*containers*", Category::Container),
        ClassifyRule::new("*rediscaches*", Category::Datastore),
        ClassifyRule::new("*sqldatabases*", Category::Datastore),
        ClassifyRule::new("*mongodatabases*", Category::Datastore),
        ClassifyRule::new("*/applications", Category::Application),
    ]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassifyConfig {
    #[serde(default = "default_rules")]
    pub rules: Vec<ClassifyRule>,

    #[serde(default)]
    pub extra_rules: Vec<ClassifyRule>,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
            extra_rules: Vec::new(),
        }
    }
}

impl ClassifyConfig {
    /// All rules in evaluation order.
    pub fn effective_rules(&self) -> impl Iterator<Item = &ClassifyRule> {
        self.extra_rules.iter().chain(self.rules.iter())
    }
}
