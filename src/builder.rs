//! History builder — one full extraction pass over the content directory.
//!
//! Files are queried one at a time in sorted order so the artifact is
//! reproducible for a given repository state. Environment problems and
//! per-file failures become warnings on the aggregate; only a failure to
//! produce the aggregate at all falls back to the minimal artifact.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::{debug, info, warn};

use crate::front_matter::derive_slug;
use crate::git;
use crate::repo_url::{manifest_repository, resolve_repo_url};
use crate::{normalize_content_path, HistoryAggregate, HistoryEntry, HistoryError};

/// Default watched content directory, relative to the project root.
pub const DEFAULT_CONTENT_DIR: &str = "src/posts";
/// Default content file extension.
pub const DEFAULT_EXTENSION: &str = "md";
/// Default artifact location, relative to the project root.
pub const DEFAULT_OUTPUT: &str = "src/_data/gitHistory.json";
/// Default manifest location, relative to the project root.
pub const DEFAULT_MANIFEST: &str = "package.json";

/// Where content lives and how its files are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLayout {
    /// Content directory relative to the project root, `/`-separated.
    pub content_dir: String,
    /// Extension without the leading dot.
    pub extension: String,
}

impl Default for ContentLayout {
    fn default() -> Self {
        ContentLayout {
            content_dir: DEFAULT_CONTENT_DIR.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl ContentLayout {
    /// `byFile` key for a file name inside the content directory.
    #[must_use]
    pub fn file_key(&self, file_name: &str) -> String {
        normalize_content_path(&format!("{}/{}", self.content_dir, file_name))
    }

    /// Conventional `byFile` key for a slug (`src/posts/<slug>.md`).
    #[must_use]
    pub fn slug_key(&self, slug: &str) -> String {
        self.file_key(&format!("{}.{}", slug, self.extension))
    }
}

/// Everything one build pass needs to know.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Project root: git runs here and relative paths resolve against it.
    pub root: PathBuf,
    pub layout: ContentLayout,
    /// Artifact path, relative to `root` unless absolute.
    pub output: PathBuf,
    /// Manifest path, relative to `root` unless absolute.
    pub manifest: PathBuf,
    /// Explicit repository URL; wins over the manifest.
    pub repo_url_override: Option<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            root: PathBuf::from("."),
            layout: ContentLayout::default(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            manifest: PathBuf::from(DEFAULT_MANIFEST),
            repo_url_override: None,
        }
    }
}

impl BuildConfig {
    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.output)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.manifest)
    }

    pub fn content_path(&self) -> PathBuf {
        self.root.join(&self.layout.content_dir)
    }

    /// Normalized repository URL: the override, else the manifest's `repository`.
    pub fn repo_url(&self) -> Option<String> {
        let manifest_url = manifest_repository(&self.manifest_path());
        resolve_repo_url(self.repo_url_override.as_deref(), manifest_url.as_deref())
    }
}

/// List content file names (not paths) directly inside `dir` with the given
/// extension, sorted. A missing directory yields an empty list.
pub fn list_content_files(dir: &Path, extension: &str) -> Vec<String> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "Content directory does not exist");
        return Vec::new();
    }

    let mut names: Vec<String> = WalkBuilder::new(dir)
        .max_depth(Some(1))
        .standard_filters(false)
        .build()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable content entry");
                None
            }
        })
        .filter(|e| e.depth() == 1 && e.file_type().is_some_and(|ft| ft.is_file()))
        .filter(|e| e.path().extension().is_some_and(|ext| ext == extension))
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .collect();

    names.sort();
    names
}

/// Run steps 1-5 of a build pass and return the aggregate without writing it.
pub fn build_history(config: &BuildConfig) -> Result<HistoryAggregate, HistoryError> {
    let mut aggregate = HistoryAggregate::new(config.repo_url());

    let mut warnings: Vec<String> = Vec::new();

    let content_dir = config.content_path();
    if !content_dir.is_dir() {
        let warning = format!("Content directory {} does not exist", content_dir.display());
        warn!("{}", warning);
        warnings.push(warning);
    }
    let files = list_content_files(&content_dir, &config.layout.extension);

    if !git::is_work_tree(&config.root) {
        let warning = format!(
            "Not a git work tree ({}); skipped history for {} file(s)",
            config.root.display(),
            files.len()
        );
        warn!("{}", warning);
        warnings.push(warning);
        aggregate.warning = Some(warnings.join("; "));
        return Ok(aggregate);
    }

    for file_name in &files {
        let key = config.layout.file_key(file_name);

        let slug = match fs::read_to_string(content_dir.join(file_name)) {
            Ok(content) => derive_slug(&content, file_name),
            Err(e) => {
                warnings.push(format!("{}: failed to read front matter: {}", key, e));
                derive_slug("", file_name)
            }
        };

        debug!(file = %key, slug = %slug, "Querying git history");
        match git::file_history(&config.root, &key, aggregate.repo_url.as_deref()) {
            Ok(commits) => {
                if aggregate.posts.contains_key(&slug) {
                    warn!(slug = %slug, file = %key, "Duplicate slug; later file wins");
                }
                aggregate.insert(slug, key, HistoryEntry::from_commits(commits));
            }
            Err(e) => {
                warn!(file = %key, error = %e, "git history query failed");
                warnings.push(format!("{}: {}", key, e));
            }
        }
    }

    if !warnings.is_empty() {
        aggregate.warning = Some(warnings.join("; "));
    }
    Ok(aggregate)
}

/// Run a full build pass and persist the artifact.
///
/// Always returns an aggregate and always attempts to write one: on any
/// failure of the main pass, a minimal fallback artifact with an explanatory
/// warning replaces it. The returned error is set only when even the
/// fallback could not be written.
pub fn write_history(config: &BuildConfig) -> (HistoryAggregate, Option<HistoryError>) {
    let output = config.output_path();

    let result = build_history(config).and_then(|aggregate| {
        aggregate.save(&output)?;
        Ok(aggregate)
    });

    match result {
        Ok(aggregate) => {
            info!(
                output = %output.display(),
                posts = aggregate.posts.len(),
                files = aggregate.by_file.len(),
                "Git history written"
            );
            (aggregate, None)
        }
        Err(e) => {
            warn!(error = %e, "Git history build failed; writing fallback artifact");
            let fallback =
                HistoryAggregate::fallback(config.repo_url(), format!("Git history unavailable: {}", e));
            let err = fallback.save(&output).err();
            (fallback, err)
        }
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
