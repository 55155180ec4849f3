//! The HEAD-then-GET download protocol.
//!
//! One [`Downloader::run`] call probes the file with HEAD, settles the output
//! filename, then streams a single GET body to disk. There are no retries and
//! a partially written file is never removed: callers that need atomic
//! results should download to a temporary name and rename on success.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};

use futures_util::{FutureExt, StreamExt};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};

use super::error::DownloadError;
use super::filename::{resolve_output_filename, resolve_output_path};
use super::metadata::RemoteFileMetadata;
use super::progress::ProgressSink;
use super::transport::{ByteStream, HttpTransport, ReqwestTransport};
use crate::config::{DownloaderConfig, normalize_server_url};
use crate::identifier::FileIdentifier;

/// Everything needed for one download. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    identifier: FileIdentifier,
    output_path: Option<String>,
    output_dir: Option<PathBuf>,
    server_url: String,
    quiet: bool,
}

impl DownloadRequest {
    /// Creates a request for `identifier` on `server_url`.
    #[must_use]
    pub fn new(identifier: FileIdentifier, server_url: &str) -> Self {
        Self {
            identifier,
            output_path: None,
            output_dir: None,
            server_url: normalize_server_url(server_url),
            quiet: false,
        }
    }

    /// Saves under this filename instead of the server-suggested one.
    #[must_use]
    pub fn with_output_path(mut self, output_path: Option<String>) -> Self {
        self.output_path = output_path;
        self
    }

    /// Saves into this directory, creating it if needed.
    #[must_use]
    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    /// Suppresses progress and the completion notice.
    #[must_use]
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// The file ID being downloaded.
    #[must_use]
    pub fn identifier(&self) -> &FileIdentifier {
        &self.identifier
    }

    /// The explicit output filename, if any.
    #[must_use]
    pub fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }

    /// The explicit output directory, if any.
    #[must_use]
    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    /// The server base URL, without trailing slash.
    #[must_use]
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Whether progress and the completion notice are suppressed.
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// `{server_url}/download/{identifier}`, used for both HEAD and GET.
    #[must_use]
    pub fn download_url(&self) -> String {
        format!("{}/download/{}", self.server_url, self.identifier)
    }
}

/// A completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// Where the file was written.
    pub path: PathBuf,
    /// Bytes written to `path`.
    pub bytes_written: u64,
    /// Size advertised by the HEAD response, when known.
    pub content_length: Option<u64>,
}

/// Runs downloads over an [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct Downloader<T = ReqwestTransport> {
    transport: T,
}

impl Downloader<ReqwestTransport> {
    /// Validates `config` and builds a `reqwest`-backed downloader.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Config`] for invalid settings, or
    /// [`DownloadError::Transport`] if the HTTP client cannot be built.
    pub fn from_config(config: &DownloaderConfig) -> Result<Self, DownloadError> {
        config.validate()?;
        Ok(Self::new(ReqwestTransport::new(config)?))
    }
}

impl<T: HttpTransport> Downloader<T> {
    /// Wraps an existing transport.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Returns the transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Downloads the requested file.
    ///
    /// Every failure, including a panic raised by the transport or the
    /// progress sink, comes back as a [`DownloadError`].
    ///
    /// # Errors
    ///
    /// - [`DownloadError::NotFound`] when HEAD returns 404
    /// - [`DownloadError::UnexpectedStatus`] for any other non-200 HEAD or GET
    /// - [`DownloadError::Transport`] for connection, DNS, timeout or stream errors
    /// - [`DownloadError::Io`] when the directory or file cannot be written
    /// - [`DownloadError::Other`] for anything else
    #[instrument(skip(self, request, progress), fields(id = %request.identifier(), url = %request.download_url()))]
    pub async fn run(
        &self,
        request: &DownloadRequest,
        progress: &mut dyn ProgressSink,
    ) -> Result<DownloadOutcome, DownloadError> {
        let result = match AssertUnwindSafe(self.run_protocol(request, progress))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(payload) => Err(DownloadError::other(panic_message(payload.as_ref()))),
        };

        if let Err(error) = &result {
            debug!(error = %error, "download failed");
        }
        result
    }

    async fn run_protocol(
        &self,
        request: &DownloadRequest,
        progress: &mut dyn ProgressSink,
    ) -> Result<DownloadOutcome, DownloadError> {
        prepare_output_dir(request.output_dir()).await?;

        let url = request.download_url();
        let head = self.transport.head(&url).await?;
        let metadata = RemoteFileMetadata::from_head(&head);
        match metadata.status_code {
            200 => {}
            404 => {
                return Err(DownloadError::not_found(
                    request.identifier().as_str(),
                    url,
                ));
            }
            status => return Err(DownloadError::unexpected_status(url, status)),
        }

        let filename = resolve_output_filename(
            request.output_path(),
            metadata.suggested_filename.as_deref(),
            request.identifier().as_str(),
        );
        let file_path = resolve_output_path(request.output_dir(), &filename);
        let total = metadata.total_size();
        debug!(
            filename = %filename,
            path = %file_path.display(),
            total,
            "resolved output path"
        );

        let response = self.transport.get_stream(&url).await?;
        if response.status != 200 {
            return Err(DownloadError::unexpected_status(url, response.status));
        }

        let file = File::create(&file_path)
            .await
            .map_err(|e| DownloadError::io(file_path.clone(), e))?;

        let report = !request.is_quiet() && total > 0;
        if report {
            progress.start(total, &format!("Downloading: {filename}"));
        }
        let streamed = stream_to_file(file, response.body, &file_path, &mut *progress, report).await;

        let bytes_written = match streamed {
            Ok(bytes) => bytes,
            Err(error) => {
                if report {
                    progress.abandon();
                }
                debug!(path = %file_path.display(), "leaving partial file in place");
                return Err(error);
            }
        };

        if report {
            progress.finish();
        }
        if !request.is_quiet() {
            progress.saved(&file_path);
        }

        info!(path = %file_path.display(), bytes = bytes_written, "download complete");

        Ok(DownloadOutcome {
            path: file_path,
            bytes_written,
            content_length: metadata.content_length,
        })
    }
}

/// Creates the explicit output directory; the current directory needs nothing.
async fn prepare_output_dir(output_dir: Option<&Path>) -> Result<(), DownloadError> {
    let Some(dir) = output_dir else {
        return Ok(());
    };
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| DownloadError::io(dir, e))
}

/// Streams the body into `file`: read chunk, write chunk, advance progress.
async fn stream_to_file(
    file: File,
    mut body: ByteStream,
    file_path: &Path,
    progress: &mut dyn ProgressSink,
    report: bool,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut bytes_written: u64 = 0;

    while let Some(chunk) = body.next().await {
        let chunk = chunk?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path, e))?;

        let len = chunk.len() as u64;
        bytes_written += len;
        if report {
            progress.advance(len);
        }
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path, e))?;

    Ok(bytes_written)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unexpected panic during download".to_string()
    }
}
