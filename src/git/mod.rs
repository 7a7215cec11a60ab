//! Git history queries through the `git` CLI.
//!
//! Invocation is the only impure part: [`run_git`] spawns one blocking
//! process and returns stdout or a distinct failure. Parsing of log output
//! ([`parse_commit_log`]) is a pure function over text so it can be tested
//! without a repository.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::{CommitRecord, HistoryError};

// ─── Git CLI helpers ────────────────────────────────────────────────

/// Field separator in `git log` output. Commit subjects never contain tabs
/// in practice; extra tabs fold into the message.
const FIELD_SEP: char = '\t';

/// `git log --format` string: full hash, strict ISO-8601 author date, subject.
const LOG_FORMAT: &str = "--format=%H%x09%aI%x09%s";

/// Run a git command and return stdout as String.
fn run_git(cmd: &mut Command) -> Result<String, HistoryError> {
    let output = cmd.output().map_err(HistoryError::GitUnavailable)?;

    if !output.status.success() {
        let args = cmd
            .get_args()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ");
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(HistoryError::GitFailed {
            args,
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(String::from_utf8(output.stdout)?)
}

/// Check whether `repo_root` is inside a git work tree.
///
/// Any failure (git missing, not a repository, bare repository) reads as
/// `false`; callers degrade rather than abort.
#[must_use]
pub fn is_work_tree(repo_root: &Path) -> bool {
    let mut cmd = Command::new("git");
    cmd.current_dir(repo_root)
        .arg("rev-parse")
        .arg("--is-inside-work-tree");

    match run_git(&mut cmd) {
        Ok(out) => out.trim() == "true",
        Err(e) => {
            debug!(root = %repo_root.display(), error = %e, "Work tree probe failed");
            false
        }
    }
}

/// Raw `git log` output for one file, newest first, following renames.
///
/// `file` is relative to `repo_root`.
pub fn file_log(repo_root: &Path, file: &str) -> Result<String, HistoryError> {
    let mut cmd = Command::new("git");
    cmd.current_dir(repo_root)
        .arg("--literal-pathspecs") // file names may contain glob characters
        .arg("log")
        .arg(LOG_FORMAT)
        .arg("--follow") // follow renames
        .arg("--")
        .arg(file);

    run_git(&mut cmd)
}

/// Query and parse the commit history of one file.
pub fn file_history(
    repo_root: &Path,
    file: &str,
    repo_url: Option<&str>,
) -> Result<Vec<CommitRecord>, HistoryError> {
    let output = file_log(repo_root, file)?;
    Ok(parse_commit_log(&output, repo_url))
}

// ─── Parsing ────────────────────────────────────────────────────────

/// Web link to a commit on the canonical repository.
#[must_use]
pub fn commit_url(repo_url: &str, hash: &str) -> String {
    format!("{}/commit/{}", repo_url, hash)
}

/// Parse one `hash<TAB>date<TAB>subject` line. Lines without a hash yield `None`.
fn parse_commit_line(line: &str, repo_url: Option<&str>) -> Option<CommitRecord> {
    let mut fields = line.splitn(3, FIELD_SEP);
    let hash = fields.next()?.trim();
    if hash.is_empty() {
        return None;
    }
    let date = fields.next().unwrap_or("").trim();
    let message = fields.next().unwrap_or("").trim();

    Some(CommitRecord {
        hash: hash.to_string(),
        date: date.to_string(),
        message: message.to_string(),
        url: repo_url.map(|url| commit_url(url, hash)),
    })
}

/// Parse line-oriented `git log` output into commit records.
///
/// Input order is preserved; ordering is the query's responsibility.
///
/// # Examples
///
/// ```
/// use post_history::parse_commit_log;
///
/// let out = "abc123\t2024-02-01T09:00:00+01:00\tFix typo\n";
/// let commits = parse_commit_log(out, Some("https://github.com/acme/site"));
/// assert_eq!(commits.len(), 1);
/// assert_eq!(commits[0].url.as_deref(), Some("https://github.com/acme/site/commit/abc123"));
/// ```
#[must_use]
pub fn parse_commit_log(output: &str, repo_url: Option<&str>) -> Vec<CommitRecord> {
    output
        .lines()
        .filter_map(|line| parse_commit_line(line, repo_url))
        .collect()
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod test_utils;

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
