//! Revision queries against a scratch repository built with the git CLI.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use topo_git::{GitError, Repository};

fn run_git(repo: &Path, args: &[&str]) -> String {
    let output = std::process::Command::new("git")
        .args(args)
        .current_dir(repo)
        .output()
        .expect("run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn init_repo() -> tempfile::TempDir {
    let dir = tempfile::TempDir::new().unwrap();
    run_git(dir.path(), &["init", "--initial-branch=main"]);
    run_git(dir.path(), &["config", "user.email", "test@topo.dev"]);
    run_git(dir.path(), &["config", "user.name", "Topo Test"]);
    run_git(dir.path(), &["config", "commit.gpgsign", "false"]);
    dir
}

fn commit(repo: &Path, files: &[(&str, &str)], message: &str) -> String {
    for (path, content) in files {
        let full = repo.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
        run_git(repo, &["add", path]);
    }
    run_git(repo, &["commit", "-m", message]);
    run_git(repo, &["rev-parse", "HEAD"])
}

#[test]
fn discovers_root_from_subdirectory() {
    let dir = init_repo();
    commit(dir.path(), &[("apps/shop/app.bicep", "x\n")], "init");
    let repo = Repository::discover(&dir.path().join("apps/shop")).unwrap();
    assert_eq!(
        repo.root().canonicalize().unwrap(),
        dir.path().canonicalize().unwrap()
    );
}

#[test]
fn outside_a_repository_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = Repository::discover(dir.path()).unwrap_err();
    assert!(matches!(err, GitError::NotGitRepo(_)));
}

#[test]
fn changed_and_listed_files_between_revisions() {
    let dir = init_repo();
    let base = commit(
        dir.path(),
        &[
            ("apps/shop/app.bicep", "v1\n"),
            ("apps/shop/.radius/app-graph.json", "{}\n"),
            ("README.md", "# r\n"),
        ],
        "base",
    );
    let head = commit(dir.path(), &[("apps/shop/app.bicep", "v2\n")], "head");
    let repo = Repository::discover(dir.path()).unwrap();

    assert_eq!(repo.changed_files(&base, &head).unwrap(), vec!["apps/shop/app.bicep"]);
    assert_eq!(
        repo.list_files(&head).unwrap(),
        vec!["README.md", "apps/shop/.radius/app-graph.json", "apps/shop/app.bicep"]
    );
    assert_eq!(repo.resolve_revision("HEAD").unwrap(), head);
}

#[test]
fn show_file_distinguishes_missing_paths() {
    let dir = init_repo();
    let base = commit(dir.path(), &[("a.txt", "one\n")], "base");
    let head = commit(dir.path(), &[("b.txt", "two\n")], "head");
    let repo = Repository::discover(dir.path()).unwrap();

    assert_eq!(repo.show_file(&head, "b.txt").unwrap().as_deref(), Some("two\n"));
    assert_eq!(repo.show_file(&base, "b.txt").unwrap(), None);
    assert!(repo.show_file("no-such-rev", "a.txt").is_err());
    assert!(matches!(
        repo.resolve_revision("no-such-rev"),
        Err(GitError::UnknownRevision(_))
    ));
}

#[test]
fn staged_files_lists_the_index() {
    let dir = init_repo();
    commit(dir.path(), &[("a.txt", "one\n")], "base");
    fs::write(dir.path().join("a.txt"), "changed\n").unwrap();
    fs::write(dir.path().join("new.txt"), "new\n").unwrap();
    run_git(dir.path(), &["add", "a.txt", "new.txt"]);

    let repo = Repository::discover(dir.path()).unwrap();
    assert_eq!(repo.staged_files().unwrap(), vec!["a.txt", "new.txt"]);
}
