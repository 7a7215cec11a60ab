//! # post-history — per-post revision metadata from local git history
//!
//! Extracts last-updated dates, revision counts and commit lists for every
//! content file, persists them as one JSON artifact, and resolves them for
//! arbitrary content items at render time.
//!
//! ## Library usage
//!
//! The crate is primarily a CLI run once per site build, but the builder and
//! the resolution filters are exposed as a library for templating layers and
//! integration testing.
//!
//! ```no_run
//! use post_history::{last_updated_for_item, HistoryAggregate};
//! use serde_json::json;
//!
//! let history = HistoryAggregate::load("src/_data/gitHistory.json".as_ref())?;
//! let updated = last_updated_for_item(&json!({ "fileSlug": "hello" }), &history);
//! # Ok::<(), post_history::HistoryError>(())
//! ```

pub mod builder;
mod error;
pub mod front_matter;
pub mod git;
mod history;
pub mod repo_url;
pub mod resolve;
pub mod slug;

pub use builder::{build_history, write_history, BuildConfig, ContentLayout};
pub use error::HistoryError;
pub use git::parse_commit_log;
pub use history::{normalize_content_path, CommitRecord, HistoryAggregate, HistoryEntry};
pub use repo_url::{normalize_repo_url, resolve_repo_url};
pub use resolve::{
    history_for_item, last_updated_for_item, revision_count_for_item, sort_by_last_updated,
    HistoryResolver,
};
pub use slug::resolve_slug;

// ─── Property-based tests (proptest) ─────────────────────────────────
