use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::GitError;

/// A discovered repository with a working tree.
#[derive(Debug, Clone)]
pub struct Repository {
    root: PathBuf,
}

impl Repository {
    /// Find the repository containing `path`.
    ///
    /// # Errors
    ///
    /// [`GitError::NotGitRepo`] when `path` is not inside a repository,
    /// [`GitError::Bare`] for a repository without a working tree.
    pub fn discover(path: &Path) -> Result<Self, GitError> {
        let repo = gix::discover(path).map_err(|_| GitError::NotGitRepo(path.to_path_buf()))?;
        let root = repo
            .work_dir()
            .map(Path::to_path_buf)
            .ok_or_else(|| GitError::Bare(repo.git_dir().to_path_buf()))?;
        tracing::debug!(root = %root.display(), "discovered repository");
        Ok(Self { root })
    }

    /// Working tree root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full commit id of `rev`.
    ///
    /// # Errors
    ///
    /// [`GitError::UnknownRevision`] when `rev` does not name a commit.
    pub fn resolve_revision(&self, rev: &str) -> Result<String, GitError> {
        let spec = format!("{rev}^{{commit}}");
        let output = self.output(&["rev-parse", "--verify", "--quiet", &spec])?;
        if !output.status.success() {
            return Err(GitError::UnknownRevision(rev.to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Paths changed between two revisions. Renames are reported as a
    /// deletion plus an addition, so both paths appear.
    ///
    /// # Errors
    ///
    /// [`GitError::Command`] if `git diff` fails (e.g. unknown revision).
    pub fn changed_files(&self, base: &str, head: &str) -> Result<Vec<String>, GitError> {
        let out = self.run(&["diff", "--name-only", "--no-renames", base, head])?;
        Ok(lines(&out))
    }

    /// Paths staged in the index relative to `HEAD`.
    ///
    /// # Errors
    ///
    /// [`GitError::Command`] if `git diff --cached` fails.
    pub fn staged_files(&self) -> Result<Vec<String>, GitError> {
        let out = self.run(&["diff", "--cached", "--name-only", "--no-renames"])?;
        Ok(lines(&out))
    }

    /// Every file path tracked at `rev`.
    ///
    /// # Errors
    ///
    /// [`GitError::Command`] if `rev` is not a tree-ish.
    pub fn list_files(&self, rev: &str) -> Result<Vec<String>, GitError> {
        let out = self.run(&["ls-tree", "-r", "--name-only", rev])?;
        Ok(lines(&out))
    }

    /// Content of `path` at `rev`, or `None` if the file does not exist there.
    ///
    /// # Errors
    ///
    /// [`GitError::Command`] if `rev` is not a tree-ish.
    pub fn show_file(&self, rev: &str, path: &str) -> Result<Option<String>, GitError> {
        let listed = self.run(&["ls-tree", "--name-only", rev, "--", path])?;
        if listed.trim().is_empty() {
            return Ok(None);
        }
        let spec = format!("{rev}:{path}");
        self.run(&["show", &spec]).map(Some)
    }

    fn output(&self, args: &[&str]) -> Result<std::process::Output, GitError> {
        Ok(Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()?)
    }

    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(GitError::Command {
                args: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}
