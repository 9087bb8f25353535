use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Visual and semantic category of a resource.
///
/// `Application` marks the resource that encloses an application. It is
/// recorded on the graph but never becomes a node.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Container,
    Datastore,
    Application,
    Other,
}

impl Category {
    /// Categories that are rendered as nodes, in style declaration order.
    pub const RENDERED: [Self; 3] = [Self::Container, Self::Datastore, Self::Other];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Datastore => "datastore",
            Self::Application => "application",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "container" => Ok(Self::Container),
            "datastore" => Ok(Self::Datastore),
            "application" => Ok(Self::Application),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown category '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_serde_name() {
        for category in [
            Category::Container,
            Category::Datastore,
            Category::Application,
            Category::Other,
        ] {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{category}\""));
            assert_eq!(category.to_string().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("DataStore".parse::<Category>().unwrap(), Category::Datastore);
        assert!("queue".parse::<Category>().is_err());
    }
}
