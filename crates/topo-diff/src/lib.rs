//! # topo-diff
//!
//! Structural diffing of resource graphs and composition of the review
//! report posted on pull requests.
//!
//! - [`diff_graphs`] compares two versions of one graph identity.
//! - [`compare_identities`] fans out over many identities (monorepo case),
//!   one task per identity, and merges the outcomes into an ordered
//!   [`ReviewReport`].
//! - [`render_markdown`] turns a report into the comment body.

mod engine;
mod markdown;
mod model;
mod review;

pub use engine::{diff_graphs, diff_presence};
pub use markdown::{NO_CHANGES_SENTINEL, REPORT_TITLE, render_markdown};
pub use model::{DiffResult, EdgeChange, FieldChange, GraphStatus, NodeChange};
pub use review::{GraphPair, IdentityOutcome, IdentityReport, ReviewReport, compare_identities};
