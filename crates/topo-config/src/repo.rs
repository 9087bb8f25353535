//! Repository coordinates for source links and the review API.

use serde::{Deserialize, Serialize};

fn default_host() -> String {
    "https://github.com".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RepoConfig {
    /// Web host used for blob links.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default)]
    pub owner: String,

    #[serde(default)]
    pub name: String,

    /// Branch that diagram links point at.
    #[serde(default = "default_branch")]
    pub branch: String,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            owner: String::new(),
            name: String::new(),
            branch: default_branch(),
        }
    }
}

impl RepoConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.owner.is_empty() && !self.name.is_empty()
    }

    /// `<host>/<owner>/<repo>/blob/<branch>/<file>#L<line>`
    #[must_use]
    pub fn blob_url(&self, file: &str, line: u32) -> String {
        format!(
            "{}/{}/{}/blob/{}/{}#L{line}",
            self.host.trim_end_matches('/'),
            self.owner,
            self.name,
            self.branch,
            file.trim_start_matches('/'),
        )
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GithubConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Token for the issue comments API. Falls back to `GITHUB_TOKEN`.
    #[serde(default)]
    pub token: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: String::new(),
        }
    }
}

impl GithubConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.token.is_empty()
    }
}
