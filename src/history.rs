//! History data model and artifact persistence.
//!
//! The aggregate is built once per run, written as pretty-printed JSON and
//! then only read. `posts` and `byFile` are two access paths into the same
//! entries, so both maps hold shared `Arc<HistoryEntry>` handles.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::HistoryError;

/// One commit that touched a content file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub hash: String,
    /// Author date, strict ISO-8601.
    pub date: String,
    pub message: String,
    /// Web link to the commit; `None` when no repository URL is known.
    pub url: Option<String>,
}

/// Normalized revision metadata for one content file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Commits touching the file, floored at 1.
    pub revisions: u64,
    pub last_updated: Option<String>,
    /// Newest first.
    pub commits: Vec<CommitRecord>,
}

impl HistoryEntry {
    /// Build an entry from commits already ordered newest first.
    ///
    /// A file with no detected commits still exists, so it reports one
    /// revision and no `last_updated`.
    #[must_use]
    pub fn from_commits(commits: Vec<CommitRecord>) -> Self {
        HistoryEntry {
            revisions: (commits.len() as u64).max(1),
            last_updated: commits.first().map(|c| c.date.clone()),
            commits,
        }
    }
}

/// The persisted artifact: every entry indexed by slug and by file path.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct HistoryAggregate {
    pub generated_at: String,
    pub repo_url: Option<String>,
    pub warning: Option<String>,
    #[serde(default)]
    pub posts: BTreeMap<String, Arc<HistoryEntry>>,
    #[serde(default)]
    pub by_file: BTreeMap<String, Arc<HistoryEntry>>,
}

/// Current UTC time as an RFC 3339 string with millisecond precision.
#[must_use]
pub fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

impl HistoryAggregate {
    /// Empty aggregate stamped with the current time.
    #[must_use]
    pub fn new(repo_url: Option<String>) -> Self {
        HistoryAggregate {
            generated_at: now_iso8601(),
            repo_url,
            ..Default::default()
        }
    }

    /// Minimal valid artifact written when a build pass fails outright.
    #[must_use]
    pub fn fallback(repo_url: Option<String>, warning: impl Into<String>) -> Self {
        HistoryAggregate {
            generated_at: now_iso8601(),
            repo_url,
            warning: Some(warning.into()),
            ..Default::default()
        }
    }

    /// Record one entry under both its slug and its normalized file path.
    pub fn insert(&mut self, slug: String, file_key: String, entry: HistoryEntry) {
        let entry = Arc::new(entry);
        self.posts.insert(slug, Arc::clone(&entry));
        self.by_file.insert(file_key, entry);
    }

    /// Write the aggregate as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), HistoryError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        fs::write(path, json)?;
        debug!(path = %path.display(), posts = self.posts.len(), "Saved git history");
        Ok(())
    }

    /// Read a previously persisted aggregate.
    pub fn load(path: &Path) -> Result<Self, HistoryError> {
        let text = fs::read_to_string(path).map_err(|e| HistoryError::ArtifactLoad {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| HistoryError::ArtifactLoad {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// Normalize a content path into the `byFile` key convention: forward
/// slashes, no leading `./`, no empty or `.` segments.
///
/// # Examples
///
/// ```
/// use post_history::normalize_content_path;
///
/// assert_eq!(normalize_content_path("./src/posts/a.md"), "src/posts/a.md");
/// assert_eq!(normalize_content_path("src\\posts\\a.md"), "src/posts/a.md");
/// ```
#[must_use]
pub fn normalize_content_path(path: &str) -> String {
    path.split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}
