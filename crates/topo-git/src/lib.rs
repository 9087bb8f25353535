//! # topo-git
//!
//! The review path reads graphs at two revisions and the staleness check
//! needs the paths a change touched. Repository discovery uses `gix`;
//! revision queries shell out to the `git` CLI, which is always present
//! where pull requests are reviewed.

mod error;
mod repo;

pub use error::GitError;
pub use repo::Repository;
