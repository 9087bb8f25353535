//! Idempotent publishing of the review report.

use serde::Serialize;

use crate::error::ReportError;
use crate::thread::ReviewThread;

/// Hidden marker identifying the report comment on a review context.
pub const COMMENT_MARKER: &str = "<!-- topo:app-graph-diff -->";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "comment_id", rename_all = "snake_case")]
pub enum PublishOutcome {
    Created(u64),
    Updated(u64),
    Unchanged(u64),
}

impl PublishOutcome {
    #[must_use]
    pub const fn comment_id(self) -> u64 {
        match self {
            Self::Created(id) | Self::Updated(id) | Self::Unchanged(id) => id,
        }
    }
}

/// `report` prefixed with [`COMMENT_MARKER`], unless it already carries it.
#[must_use]
pub fn marked_body(report: &str) -> String {
    if report.contains(COMMENT_MARKER) {
        report.to_string()
    } else {
        format!("{COMMENT_MARKER}\n{report}")
    }
}

/// Create or update the single report comment on `context`.
///
/// The first comment carrying [`COMMENT_MARKER`] is the report comment.
/// It is left alone when its body already matches.
///
/// # Errors
///
/// Propagates any [`ReportError`] from the thread. Nothing is retried.
pub async fn publish_report<T: ReviewThread>(
    thread: &T,
    context: u64,
    report: &str,
) -> Result<PublishOutcome, ReportError> {
    let body = marked_body(report);
    let comments = thread.list_comments(context).await?;

    let outcome = match comments.iter().find(|c| c.body.contains(COMMENT_MARKER)) {
        Some(existing) if existing.body == body => PublishOutcome::Unchanged(existing.id),
        Some(existing) => {
            let updated = thread.update_comment(existing.id, &body).await?;
            PublishOutcome::Updated(updated.id)
        }
        None => {
            let created = thread.create_comment(context, &body).await?;
            PublishOutcome::Created(created.id)
        }
    };
    tracing::info!(context, ?outcome, "published review report");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::thread::InMemoryThread;

    #[tokio::test]
    async fn rerun_updates_and_never_duplicates() {
        let thread = InMemoryThread::new();
        thread.create_comment(7, "LGTM").await.unwrap();

        let first = publish_report(&thread, 7, "report v1").await.unwrap();
        let second = publish_report(&thread, 7, "report v2").await.unwrap();
        let third = publish_report(&thread, 7, "report v2").await.unwrap();

        assert!(matches!(first, PublishOutcome::Created(_)));
        assert_eq!(second, PublishOutcome::Updated(first.comment_id()));
        assert_eq!(third, PublishOutcome::Unchanged(first.comment_id()));

        let comments = thread.comments(7);
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[1].body, format!("{COMMENT_MARKER}\nreport v2"));
    }

    #[tokio::test]
    async fn contexts_are_independent() {
        let thread = InMemoryThread::new();
        publish_report(&thread, 1, "a").await.unwrap();
        let outcome = publish_report(&thread, 2, "a").await.unwrap();
        assert!(matches!(outcome, PublishOutcome::Created(_)));
        assert_eq!(thread.comments(1).len(), 1);
        assert_eq!(thread.comments(2).len(), 1);
    }

    #[test]
    fn marker_is_not_doubled() {
        let once = marked_body("body");
        assert_eq!(marked_body(&once), once);
    }
}
