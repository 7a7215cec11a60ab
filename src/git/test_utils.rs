//! Shared test helpers: throwaway git repositories with fixed commit dates.
//! Requires `git` to be in PATH.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// A git repository in a temporary directory, removed on drop.
pub(crate) struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create an empty temp directory that is NOT a git repository.
    pub(crate) fn plain() -> Self {
        TestRepo { dir: tempfile::tempdir().expect("create temp dir") }
    }

    /// Create a temp directory with `git init` already run.
    pub(crate) fn init() -> Self {
        let repo = Self::plain();
        repo.git(&["init", "-q"]);
        repo
    }

    pub(crate) fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Run git in the repository with a fixed identity, panicking on failure.
    pub(crate) fn git(&self, args: &[&str]) -> String {
        self.git_dated(args, "2024-01-01T12:00:00+00:00")
    }

    fn git_dated(&self, args: &[&str], date: &str) -> String {
        let output = Command::new("git")
            .current_dir(self.path())
            .args(["-c", "user.name=Test Author", "-c", "user.email=test@example.com"])
            .args(["-c", "commit.gpgsign=false"])
            .args(args)
            .env("GIT_AUTHOR_DATE", date)
            .env("GIT_COMMITTER_DATE", date)
            .output()
            .expect("spawn git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    /// Write a file relative to the repository root, creating parent dirs.
    pub(crate) fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, content).expect("write file");
        path
    }

    /// Stage everything and commit with the given author/committer date.
    pub(crate) fn commit_all(&self, message: &str, date: &str) {
        self.git(&["add", "-A"]);
        self.git_dated(&["commit", "-q", "-m", message], date);
    }
}
