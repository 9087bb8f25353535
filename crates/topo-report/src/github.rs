//! GitHub issue comments API client.

use std::time::Duration;

use serde_json::json;
use topo_config::{GithubConfig, RepoConfig};

use crate::error::ReportError;
use crate::http::check_response;
use crate::thread::{Comment, ReviewThread};

/// GitHub caps `per_page` at 100.
const PAGE_SIZE: usize = 100;

/// Review thread backed by the comments of a GitHub pull request.
pub struct GithubThread {
    http: reqwest::Client,
    api_url: String,
    token: String,
    owner: String,
    repo: String,
}

impl GithubThread {
    /// Client for `repo` using the configured API endpoint and token.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NotConfigured`] when the token or the
    /// repository coordinates are missing.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    pub fn new(github: &GithubConfig, repo: &RepoConfig) -> Result<Self, ReportError> {
        if !github.is_configured() {
            return Err(ReportError::NotConfigured(
                "no token (set github.token or GITHUB_TOKEN)".to_string(),
            ));
        }
        if !repo.is_configured() {
            return Err(ReportError::NotConfigured(
                "repository owner/name unknown (set repo.owner and repo.name)".to_string(),
            ));
        }
        Ok(Self {
            http: reqwest::Client::builder()
                .user_agent(concat!("topo/", env!("CARGO_PKG_VERSION")))
                .timeout(Duration::from_secs(30))
                .build()
                .expect("reqwest client should build"),
            api_url: github.api_url.trim_end_matches('/').to_string(),
            token: github.token.clone(),
            owner: repo.owner.clone(),
            repo: repo.name.clone(),
        })
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    fn issue_comments_url(&self, context: u64) -> String {
        format!(
            "{}/repos/{}/{}/issues/{context}/comments",
            self.api_url, self.owner, self.repo
        )
    }
}

impl ReviewThread for GithubThread {
    async fn list_comments(&self, context: u64) -> Result<Vec<Comment>, ReportError> {
        let base = self.issue_comments_url(context);
        let mut comments = Vec::new();
        let mut page = 1;
        loop {
            let url = format!("{base}?per_page={PAGE_SIZE}&page={page}");
            let resp = check_response(self.request(reqwest::Method::GET, &url).send().await?).await?;
            let batch: Vec<Comment> = resp.json().await?;
            let done = batch.len() < PAGE_SIZE;
            comments.extend(batch);
            if done {
                break;
            }
            page += 1;
        }
        tracing::debug!(context, count = comments.len(), "listed review comments");
        Ok(comments)
    }

    async fn create_comment(&self, context: u64, body: &str) -> Result<Comment, ReportError> {
        let url = self.issue_comments_url(context);
        let resp = check_response(
            self.request(reqwest::Method::POST, &url)
                .json(&json!({ "body": body }))
                .send()
                .await?,
        )
        .await?;
        Ok(resp.json().await?)
    }

    async fn update_comment(&self, comment_id: u64, body: &str) -> Result<Comment, ReportError> {
        let url = format!(
            "{}/repos/{}/{}/issues/comments/{comment_id}",
            self.api_url, self.owner, self.repo
        );
        let resp = check_response(
            self.request(reqwest::Method::PATCH, &url)
                .json(&json!({ "body": body }))
                .send()
                .await?,
        )
        .await?;
        Ok(resp.json().await?)
    }
}
