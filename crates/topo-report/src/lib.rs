//! # topo-report
//!
//! The review side's outward surfaces: publishing the diff report as a
//! single, idempotently updated pull request comment, and the snapshot
//! staleness gate run against a change set.

mod error;
mod github;
mod http;
mod publish;
mod stale;
mod thread;

pub use error::ReportError;
pub use github::GithubThread;
pub use publish::{COMMENT_MARKER, PublishOutcome, marked_body, publish_report};
pub use stale::{SnapshotStale, StaleCheckReport, check_snapshots, snapshot_for};
pub use thread::{Comment, InMemoryThread, ReviewThread};
