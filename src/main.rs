//! CLI entry point for qdown.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use qdown::{DownloadRequest, Downloader, FileIdentifier, NoProgress, ProgressBarSink};
use tracing::debug;

mod cli;

use cli::Args;

/// Exits 0 on success, help, or when the ID is missing or empty; any download
/// failure returns `Err`, which the runtime reports on stderr with exit code 1.
/// A whitespace-only ID is not treated as missing and fails as an empty ID.
#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (warn)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.default_log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let Some(input) = args.id.as_deref().filter(|id| !id.is_empty()) else {
        Args::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = args.downloader_config();
    let downloader = Downloader::from_config(&config).context("invalid configuration")?;

    let identifier = FileIdentifier::from_input_for_server(input, &config.server_url)?;
    let request = DownloadRequest::new(identifier, &config.server_url)
        .with_output_path(args.output.clone())
        .with_output_dir(args.output_dir.clone())
        .with_quiet(args.quiet);

    if args.quiet {
        downloader.run(&request, &mut NoProgress).await?;
    } else {
        downloader.run(&request, &mut ProgressBarSink::new()).await?;
    }

    Ok(())
}
