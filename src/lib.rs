//! qdown - download files from a QualitegDrive server.
//!
//! Give it a file ID or a share URL (`https://drive.qualiteg.com/file/<ID>`)
//! and it probes the file with HEAD, picks a filename, and streams the body
//! to disk.
//!
//! # Architecture
//!
//! - [`identifier`] - file ID extraction from share URLs
//! - [`download`] - the HEAD-then-GET protocol, transport, progress and errors
//! - [`config`] - server URL and timeout settings
//!
//! The [`download()`] function is the one-call entry point; [`Downloader`]
//! gives full control and error detail.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod download;
pub mod identifier;
mod user_agent;

use std::path::{Path, PathBuf};

use tracing::error;

// Re-export commonly used types
pub use config::{ConfigError, DEFAULT_SERVER_URL, DownloaderConfig};
pub use download::{
    DownloadError, DownloadOutcome, DownloadRequest, Downloader, NoProgress, ProgressBarSink,
    ProgressSink,
};
pub use identifier::{FileIdentifier, IdentifierResolver, extract_file_id};

/// Downloads `url_or_id` and returns the saved path, or `None` on failure.
///
/// `server_url` defaults to [`DEFAULT_SERVER_URL`]. Unless `quiet`, a
/// progress bar is drawn on stderr and the saved path is printed. Failures
/// are logged through `tracing`; use [`Downloader`] directly to inspect them.
pub async fn download(
    url_or_id: &str,
    output_path: Option<&str>,
    output_dir: Option<&Path>,
    server_url: Option<&str>,
    quiet: bool,
) -> Option<PathBuf> {
    let config =
        DownloaderConfig::default().with_server_url(server_url.unwrap_or(DEFAULT_SERVER_URL));
    match try_download(&config, url_or_id, output_path, output_dir, quiet).await {
        Ok(outcome) => Some(outcome.path),
        Err(e) => {
            error!(error = %e, input = url_or_id, "download failed");
            None
        }
    }
}

async fn try_download(
    config: &DownloaderConfig,
    url_or_id: &str,
    output_path: Option<&str>,
    output_dir: Option<&Path>,
    quiet: bool,
) -> Result<DownloadOutcome, DownloadError> {
    let downloader = Downloader::from_config(config)?;
    let identifier = FileIdentifier::from_input_for_server(url_or_id, &config.server_url)?;
    let request = DownloadRequest::new(identifier, &config.server_url)
        .with_output_path(output_path.map(str::to_string))
        .with_output_dir(output_dir.map(Path::to_path_buf))
        .with_quiet(quiet);

    if quiet {
        downloader.run(&request, &mut NoProgress).await
    } else {
        downloader.run(&request, &mut ProgressBarSink::new()).await
    }
}
