//! Single-file downloads from a drive server.
//!
//! # Features
//!
//! - HEAD probe before transfer (fail fast on missing files, learn size and name)
//! - Filename from `-O`, then `Content-Disposition`, then `download_<id>`
//! - Streaming GET straight to disk with byte-level progress
//! - Structured error types with full context
//!
//! # Example
//!
//! ```no_run
//! use qdown::download::{DownloadRequest, Downloader, NoProgress};
//! use qdown::{DownloaderConfig, FileIdentifier};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DownloaderConfig::default();
//! let downloader = Downloader::from_config(&config)?;
//! let request = DownloadRequest::new(FileIdentifier::parse("abc123")?, &config.server_url);
//! let outcome = downloader.run(&request, &mut NoProgress).await?;
//! println!("Downloaded: {}", outcome.path.display());
//! # Ok(())
//! # }
//! ```

mod disposition;
mod downloader;
mod error;
mod filename;
mod metadata;
mod progress;
mod transport;

pub use disposition::{DispositionFilename, parse_content_disposition};
pub use downloader::{DownloadOutcome, DownloadRequest, Downloader};
pub use error::DownloadError;
pub use filename::{default_filename, resolve_output_filename, resolve_output_path, safe_basename};
pub use metadata::RemoteFileMetadata;
pub use progress::{NoProgress, ProgressBarSink, ProgressSink};
pub use transport::{
    ByteStream, HeadResponse, HttpTransport, ReqwestTransport, StreamResponse, TransportError,
};
