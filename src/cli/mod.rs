//! CLI layer: argument parsing, logging setup, and command dispatch.

pub mod args;

pub use args::*;

use std::io::Read;
use std::path::Path;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use post_history::{resolve_slug, write_history, HistoryAggregate, HistoryError, HistoryResolver};

// ─── CLI ─────────────────────────────────────────────────────────────

/// Per-post revision history from local git metadata
#[derive(Parser, Debug)]
#[command(name = "post-history", version, about, after_help = "\
Run 'post-history <COMMAND> --help' for detailed options.\n\
The build never fails on missing history: it writes a warning into the JSON instead.")]
pub(crate) struct Cli {
    /// Log level: error, warn, info, debug, trace (RUST_LOG overrides)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Extract git history for every content file and write the JSON artifact
    Build(BuildArgs),

    /// Resolve history, last-updated date and revision count for one item
    Lookup(LookupArgs),

    /// Order an array of items by last-updated date, newest first
    Sort(SortArgs),
}

// ─── Main entry point ───────────────────────────────────────────────

pub fn run() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result = match cli.command {
        Commands::Build(args) => cmd_build(args),
        Commands::Lookup(args) => cmd_lookup(args),
        Commands::Sort(args) => cmd_sort(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(level: &str) {
    let level = match level {
        "error" => tracing::Level::ERROR,
        "info" => tracing::Level::INFO,
        "debug" => tracing::Level::DEBUG,
        "trace" => tracing::Level::TRACE,
        _ => tracing::Level::WARN,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

// ─── Commands ───────────────────────────────────────────────────────

fn cmd_build(args: BuildArgs) -> Result<(), HistoryError> {
    let config = args.config();
    let output = config.output_path();
    let (aggregate, err) = write_history(&config);

    if let Some(e) = err {
        return Err(e);
    }

    match &aggregate.warning {
        Some(warning) => println!(
            "Wrote git history to {} with warning: {}",
            output.display(),
            warning
        ),
        None => println!(
            "Wrote git history for {} file(s) to {}",
            aggregate.by_file.len(),
            output.display()
        ),
    }
    Ok(())
}

fn cmd_lookup(args: LookupArgs) -> Result<(), HistoryError> {
    let aggregate = HistoryAggregate::load(&args.history)?;
    let item: Value = serde_json::from_str(&read_input(args.item.as_deref())?)?;
    let resolver = HistoryResolver::with_layout(&aggregate, args.layout.layout());

    let report = json!({
        "slug": resolve_slug(&item),
        "history": resolver.history_for(&item),
        "lastUpdated": resolver.last_updated_for(&item),
        "revisions": resolver.revision_count_for(&item),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_sort(args: SortArgs) -> Result<(), HistoryError> {
    let aggregate = HistoryAggregate::load(&args.history)?;
    let items: Vec<Value> = serde_json::from_str(&read_input(args.items.as_deref())?)?;
    let resolver = HistoryResolver::with_layout(&aggregate, args.layout.layout());

    let sorted = resolver.sort_by_last_updated(&items);
    println!("{}", serde_json::to_string_pretty(&sorted)?);
    Ok(())
}

/// Read a whole file, or stdin when the path is absent or `-`.
fn read_input(path: Option<&Path>) -> Result<String, HistoryError> {
    match path {
        Some(p) if p != Path::new("-") => Ok(std::fs::read_to_string(p)?),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
