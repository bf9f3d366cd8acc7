//! mediascan-ingest - scan a directory tree and catalog its media files
//!
//! Exit codes:
//! - 0: scan completed (including cancelled runs)
//! - 1: fatal error (configuration, missing category, storage)
//! - 2: root path missing, not a directory, or unreadable

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use mediascan_common::config::{ConfigResolver, TomlConfig};
use mediascan_ingest::services::{DirectoryScanner, IngestPipeline};
use mediascan_ingest::validators::NamePolicy;
use mediascan_ingest::{CompositeClassifier, IngestError};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for mediascan-ingest
#[derive(Parser, Debug)]
#[command(name = "mediascan-ingest")]
#[command(about = "Scan a directory tree and record its media files")]
#[command(version)]
struct Args {
    /// Directory to scan (prompted for when omitted)
    root: Option<PathBuf>,

    /// Database file path or sqlite URL
    #[arg(short, long)]
    database: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Follow symbolic links while scanning
    #[arg(long)]
    follow_links: bool,

    /// Accept names with several dots (extension after the last one)
    #[arg(long)]
    lenient_names: bool,

    /// Classify only; do not open the database
    #[arg(long)]
    dry_run: bool,

    /// Print the final summary as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Missing .env is fine
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            let code = e
                .downcast_ref::<IngestError>()
                .map(IngestError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let resolver = ConfigResolver::new(TomlConfig::load_or_default()?);
    init_tracing(&resolver.log_level(args.log_level.as_deref()));

    info!("Starting mediascan-ingest {}", env!("CARGO_PKG_VERSION"));

    let root = match args.root {
        Some(root) => root,
        None => prompt_for_root()?,
    };

    let policy = if args.lenient_names {
        NamePolicy::Lenient
    } else {
        NamePolicy::Strict
    };
    let scanner = DirectoryScanner::new(CompositeClassifier::with_policy(policy))
        .follow_links(args.follow_links);

    if args.dry_run {
        let report = scanner.scan_with_stats(&root).map_err(IngestError::from)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            for file in &report.files {
                println!("{}\t{}", file.kind, file.path.display());
            }
            println!(
                "Dry run: classified={} unclassified={}",
                report.stats.classified, report.stats.unclassified
            );
        }
        return Ok(());
    }

    let location = resolver.database(args.database.as_deref());
    let pool = mediascan_ingest::db::open_database(&location)
        .await
        .with_context(|| format!("Failed to open database {}", location))?;
    info!("Database connection established");

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    let repository = mediascan_ingest::db::MediaRepository::new(pool.clone());
    let pipeline = IngestPipeline::new(scanner, repository).with_cancellation(cancel);

    println!("Starting directory scan & database processing...");
    let result = pipeline.run(&root).await;
    pool.close().await;
    let summary = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Scan complete: {}", summary);
    }

    Ok(())
}

/// Install the tracing subscriber; RUST_LOG overrides the resolved level
fn init_tracing(level: &str) {
    let default_filter = format!("mediascan_ingest={level},mediascan_common={level}");
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Ask for the root directory on stdin
fn prompt_for_root() -> Result<PathBuf> {
    print!("Please input the directory path to scan for media files: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    let path = line.trim();
    if path.is_empty() {
        bail!("No directory path given");
    }

    Ok(PathBuf::from(path))
}

/// Cancel the run on Ctrl+C; already persisted files are kept
async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    if signal::ctrl_c().await.is_ok() {
        info!("Received Ctrl+C, stopping after the current file");
        cancel.cancel();
    }
}
