use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("not a git repository: {}", .0.display())]
    NotGitRepo(PathBuf),

    #[error("repository at {} has no working tree", .0.display())]
    Bare(PathBuf),

    #[error("git {args} failed: {stderr}")]
    Command { args: String, stderr: String },

    #[error("unknown revision '{0}'")]
    UnknownRevision(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
