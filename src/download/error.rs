//! Error types for the download module.
//!
//! Every failure of a download is converted into one of these values before it
//! leaves [`Downloader::run`](super::Downloader::run).

use std::path::PathBuf;

use thiserror::Error;

use super::transport::TransportError;
use crate::config::ConfigError;

/// Errors that can occur while downloading a file.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The server answered the metadata probe with 404.
    #[error("file with ID '{identifier}' was not found at {url}")]
    NotFound {
        /// The requested file ID.
        identifier: String,
        /// The URL that was probed.
        url: String,
    },

    /// The server answered with a status other than 200 (or 404 for HEAD).
    #[error("unexpected HTTP {status} from {url}")]
    UnexpectedStatus {
        /// The URL that returned the status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Network-level failure (DNS, connection refused, timeout, broken stream).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// File system error (creating the output directory, creating or writing the file).
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Any other fault caught at the outer boundary of a download.
    #[error("download failed: {message}")]
    Other {
        /// Description of the fault.
        message: String,
    },

    /// The downloader settings were rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The identifier was empty after URL extraction.
    #[error("no file ID given")]
    EmptyIdentifier,
}

impl DownloadError {
    /// Creates a not-found error.
    pub fn not_found(identifier: impl Into<String>, url: impl Into<String>) -> Self {
        Self::NotFound {
            identifier: identifier.into(),
            url: url.into(),
        }
    }

    /// Creates an unexpected-status error.
    pub fn unexpected_status(url: impl Into<String>, status: u16) -> Self {
        Self::UnexpectedStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a generic failure.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Returns the HTTP status behind this error, if it came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// `From<std::io::Error>` is deliberately absent: IO errors need the path for context.
