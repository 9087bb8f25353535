use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use topo_config::TopoConfig;
use topo_report::{
    GithubThread, InMemoryThread, PublishOutcome, marked_body, publish_report,
};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CommentArgs;
use crate::output::{TextOutput, output};

#[derive(Debug, Serialize)]
struct CommentResponse {
    pr: u64,
    dry_run: bool,
    outcome: PublishOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<String>,
}

impl TextOutput for CommentResponse {
    fn text(&self) -> String {
        let action = match self.outcome {
            PublishOutcome::Created(_) => "created",
            PublishOutcome::Updated(_) => "updated",
            PublishOutcome::Unchanged(_) => "unchanged",
        };
        let mut text = format!(
            "PR #{}: report comment {action} (id {})",
            self.pr,
            self.outcome.comment_id()
        );
        if let Some(body) = &self.body {
            text.push_str("\n\n");
            text.push_str(body);
        }
        text
    }
}

/// Handle `topo comment`.
pub async fn handle(
    args: &CommentArgs,
    project_root: &Path,
    config: &TopoConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let path = project_root.join(&args.body_file);
    let body = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read report {}", path.display()))?;

    let response = if args.dry_run {
        let thread = InMemoryThread::new();
        let outcome = publish_report(&thread, args.pr, &body).await?;
        CommentResponse {
            pr: args.pr,
            dry_run: true,
            outcome,
            body: Some(marked_body(&body)),
        }
    } else {
        let thread = GithubThread::new(&config.github, &config.repo)?;
        let outcome = publish_report(&thread, args.pr, &body)
            .await
            .with_context(|| format!("failed to publish report on PR #{}", args.pr))?;
        CommentResponse {
            pr: args.pr,
            dry_run: false,
            outcome,
            body: None,
        }
    };
    output(&response, flags.format)
}
