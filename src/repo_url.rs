//! Repository URL normalization.
//!
//! Remote URLs arrive in many spellings: SSH shorthand (`git@host:owner/repo`),
//! `git+https://` manifest URLs, trailing `.git` suffixes and slashes. Commit
//! links need one canonical HTTPS form, or nothing at all.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

/// Normalize an arbitrary remote URL spelling into a canonical HTTPS URL.
///
/// Returns `None` for missing or blank input. Never fails: malformed input
/// degrades to a best-effort string.
///
/// # Examples
///
/// ```
/// use post_history::normalize_repo_url;
///
/// assert_eq!(
///     normalize_repo_url(Some("git@github.com:acme/site.git")).as_deref(),
///     Some("https://github.com/acme/site")
/// );
/// assert_eq!(normalize_repo_url(Some("   ")), None);
/// ```
#[must_use]
pub fn normalize_repo_url(raw: Option<&str>) -> Option<String> {
    let value = raw?.trim();
    if value.is_empty() {
        return None;
    }

    let mut url = match value.strip_prefix("git@").and_then(|s| s.split_once(':')) {
        Some((host, path)) => format!("https://{}/{}", host, path.trim_start_matches('/')),
        None => value.to_string(),
    };

    while let Some(stripped) = url.strip_prefix("git+") {
        url = stripped.to_string();
    }

    // ssh://git@host/owner/repo has no web form of its own
    if let Some(rest) = url.strip_prefix("ssh://") {
        let rest = rest.split_once('@').map_or(rest, |(_, r)| r);
        url = format!("https://{}", rest);
    }

    // Strip until stable so that normalizing twice changes nothing
    loop {
        let trimmed = url.trim_end_matches('/');
        let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
        if trimmed.len() == url.len() {
            break;
        }
        url = trimmed.to_string();
    }

    if url.is_empty() { None } else { Some(url) }
}

/// The `repository` field of a package manifest: either a bare URL string or
/// an object carrying a `url` string.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RepositoryField {
    Url(String),
    Object {
        #[serde(default)]
        url: Option<String>,
    },
}

impl RepositoryField {
    pub fn url(&self) -> Option<&str> {
        match self {
            RepositoryField::Url(url) => Some(url),
            RepositoryField::Object { url } => url.as_deref(),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
struct Manifest {
    #[serde(default)]
    repository: Option<RepositoryField>,
}

/// Read the raw `repository` URL declared in a manifest file.
///
/// A missing manifest, unreadable file, or unexpected shape all yield `None`.
pub fn manifest_repository(path: &Path) -> Option<String> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "No manifest to read repository from");
            return None;
        }
    };

    match serde_json::from_str::<Manifest>(&text) {
        Ok(manifest) => manifest
            .repository
            .and_then(|field| field.url().map(str::to_string)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring unparseable manifest");
            None
        }
    }
}

/// Determine the canonical repository URL, preferring an explicit override
/// over the manifest-declared value.
#[must_use]
pub fn resolve_repo_url(override_url: Option<&str>, manifest_url: Option<&str>) -> Option<String> {
    normalize_repo_url(override_url).or_else(|| normalize_repo_url(manifest_url))
}
