use globset::{GlobBuilder, GlobMatcher};
use topo_config::ClassifyConfig;
use topo_core::Category;

use crate::error::ExtractError;

/// Compiled classification rules: case-insensitive globs over the resource
/// type, first match wins, no match is [`Category::Other`].
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<(GlobMatcher, Category)>,
}

impl Classifier {
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidRule`] for a pattern that is not a glob.
    pub fn from_config(config: &ClassifyConfig) -> Result<Self, ExtractError> {
        let rules = config
            .effective_rules()
            .map(|rule| {
                GlobBuilder::new(&rule.pattern)
                    .case_insensitive(true)
                    .build()
                    .map(|glob| (glob.compile_matcher(), rule.category))
                    .map_err(|e| ExtractError::InvalidRule {
                        pattern: rule.pattern.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { rules })
    }

    #[must_use]
    pub fn classify(&self, resource_type: &str) -> Category {
        self.rules
            .iter()
            .find(|(matcher, _)| matcher.is_match(resource_type))
            .map_or(Category::Other, |(_, category)| *category)
    }
}
