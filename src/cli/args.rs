//! CLI argument structs for all subcommands.

use std::path::PathBuf;

use clap::Parser;

use post_history::builder::{DEFAULT_CONTENT_DIR, DEFAULT_EXTENSION, DEFAULT_MANIFEST, DEFAULT_OUTPUT};
use post_history::{BuildConfig, ContentLayout};

/// Content layout shared by every subcommand.
#[derive(Parser, Debug, Clone)]
pub struct LayoutArgs {
    /// Content directory, relative to the project root
    #[arg(long, default_value = DEFAULT_CONTENT_DIR)]
    pub content_dir: String,

    /// Content file extension (without the dot)
    #[arg(short, long, default_value = DEFAULT_EXTENSION)]
    pub ext: String,
}

impl LayoutArgs {
    pub fn layout(&self) -> ContentLayout {
        ContentLayout {
            content_dir: self.content_dir.clone(),
            extension: self.ext.trim_start_matches('.').to_string(),
        }
    }
}

#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Project root (git runs here; other paths are relative to it)
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,

    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Where to write the history JSON, relative to the root
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Package manifest declaring a `repository` field, relative to the root
    #[arg(long, default_value = DEFAULT_MANIFEST)]
    pub manifest: PathBuf,

    /// Canonical repository URL for commit links (overrides the manifest)
    #[arg(long, env = "REPO_URL")]
    pub repo_url: Option<String>,
}

impl BuildArgs {
    pub fn config(&self) -> BuildConfig {
        BuildConfig {
            root: self.root.clone(),
            layout: self.layout.layout(),
            output: self.output.clone(),
            manifest: self.manifest.clone(),
            repo_url_override: self.repo_url.clone(),
        }
    }
}

#[derive(Parser, Debug)]
pub struct LookupArgs {
    /// JSON file holding one content item (reads stdin when omitted or `-`)
    pub item: Option<PathBuf>,

    /// History JSON produced by `build`
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    pub history: PathBuf,

    #[command(flatten)]
    pub layout: LayoutArgs,
}

#[derive(Parser, Debug)]
pub struct SortArgs {
    /// JSON file holding an array of content items (reads stdin when omitted or `-`)
    pub items: Option<PathBuf>,

    /// History JSON produced by `build`
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    pub history: PathBuf,

    #[command(flatten)]
    pub layout: LayoutArgs,
}
