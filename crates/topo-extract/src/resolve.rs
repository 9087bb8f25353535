//! Resolution of relation endpoints to node identifiers.
//!
//! Extractors refer to resources in several ways: by id, by name, by ARM
//! expression (`[reference('db').id]`), by URL (`http://backend:3000`) or by
//! a resource path. Strategies are tried in that order.

use std::sync::LazyLock;

use regex::Regex;

static ARM_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[reference\('(\w+)'\)").expect("reference pattern"));
static URL_HOST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://([^:/]+)").expect("url pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Node(String),
    /// The enclosing application resource, which is not a node.
    Application,
}

struct Candidate {
    id: String,
    name: String,
}

/// Lookup table over one graph's nodes, kept in id order.
pub struct Resolver {
    nodes: Vec<Candidate>,
    application: Vec<String>,
}

impl Resolver {
    /// `nodes` are `(id, name)` pairs; `application` holds the ids and names
    /// of application resources.
    pub fn new<'a>(
        nodes: impl IntoIterator<Item = (&'a str, &'a str)>,
        application: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut nodes: Vec<Candidate> = nodes
            .into_iter()
            .map(|(id, name)| Candidate {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        Self {
            nodes,
            application: application.into_iter().map(ToString::to_string).collect(),
        }
    }

    pub fn resolve(&self, reference: &str) -> Option<Endpoint> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        if let Some(found) = self.exact(reference) {
            return Some(found);
        }
        if let Some(symbol) = ARM_REFERENCE.captures(reference).and_then(|c| c.get(1)) {
            return self.exact(symbol.as_str());
        }
        if let Some(host) = URL_HOST.captures(reference).and_then(|c| c.get(1)) {
            let host = host.as_str();
            return self.exact(host).or_else(|| {
                self.nodes
                    .iter()
                    .filter(|c| !c.name.is_empty())
                    .find(|c| c.name.contains(host) || host.contains(c.name.as_str()))
                    .map(|c| Endpoint::Node(c.id.clone()))
            });
        }
        let segment = reference.trim_end_matches('/').rsplit('/').next()?;
        self.exact(segment).or_else(|| {
            let suffix = format!("/{segment}");
            self.nodes
                .iter()
                .find(|c| c.id.ends_with(&suffix))
                .map(|c| Endpoint::Node(c.id.clone()))
        })
    }

    fn exact(&self, key: &str) -> Option<Endpoint> {
        if self.application.iter().any(|a| a == key) {
            return Some(Endpoint::Application);
        }
        self.nodes
            .iter()
            .find(|c| c.id == key)
            .or_else(|| self.nodes.iter().find(|c| c.name == key))
            .map(|c| Endpoint::Node(c.id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn resolver() -> Resolver {
        Resolver::new(
            [
                ("/planes/radius/local/containers/frontend", "frontend"),
                ("/planes/radius/local/containers/backend-api", "backend-api"),
                ("/planes/radius/local/redisCaches/cache", "cache"),
            ],
            ["/planes/radius/local/applications/shop", "shop"],
        )
    }

    fn node(id: &str) -> Option<Endpoint> {
        Some(Endpoint::Node(id.to_string()))
    }

    #[rstest]
    #[case::exact_id("/planes/radius/local/redisCaches/cache", node("/planes/radius/local/redisCaches/cache"))]
    #[case::exact_name("frontend", node("/planes/radius/local/containers/frontend"))]
    #[case::arm("[reference('cache').id]", node("/planes/radius/local/redisCaches/cache"))]
    #[case::url_exact("http://frontend:80", node("/planes/radius/local/containers/frontend"))]
    #[case::url_substring("http://backend:3000", node("/planes/radius/local/containers/backend-api"))]
    #[case::path_segment("/other/plane/containers/frontend/", node("/planes/radius/local/containers/frontend"))]
    #[case::application("shop", Some(Endpoint::Application))]
    #[case::unknown_url("https://payments.example.com", None)]
    #[case::unknown_name("ghost", None)]
    #[case::empty("", None)]
    fn resolves_references(#[case] reference: &str, #[case] expected: Option<Endpoint>) {
        assert_eq!(resolver().resolve(reference), expected);
    }

    #[test]
    fn unnamed_resource_does_not_absorb_urls() {
        let resolver = Resolver::new(
            [
                ("/planes/radius/local/containers/anonymous", ""),
                ("/planes/radius/local/containers/backend-api", "backend-api"),
            ],
            ["shop"],
        );
        assert_eq!(resolver.resolve("https://payments.example.com"), None);
        assert_eq!(
            resolver.resolve("http://backend:3000"),
            node("/planes/radius/local/containers/backend-api")
        );
    }
}
