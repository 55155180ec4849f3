//! HTTP transport used by the downloader.
//!
//! [`HttpTransport`] is the seam between the download protocol and the
//! network: the production implementation wraps a `reqwest` client, tests
//! substitute scripted transports.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use reqwest::Client;
use reqwest::header::HeaderMap;
use thiserror::Error;
use tracing::debug;

use crate::config::DownloaderConfig;
use crate::user_agent;

/// Body chunks of a streaming GET, in arrival order.
pub type ByteStream = BoxStream<'static, Result<Bytes, TransportError>>;

/// Network-level failures reported by a transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The connect or read timeout elapsed.
    #[error("request to {url} timed out")]
    Timeout {
        /// The URL being requested.
        url: String,
    },

    /// The request could not be completed (DNS, refused connection, reset stream, ...).
    #[error("request to {url} failed: {source}")]
    Request {
        /// The URL being requested.
        url: String,
        /// The underlying cause.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },
}

impl TransportError {
    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates a request error from any cause.
    pub fn request(
        url: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Request {
            url: url.into(),
            source: source.into(),
        }
    }

    /// Classifies a `reqwest` error, separating timeouts from other failures.
    pub fn from_reqwest(url: impl Into<String>, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::timeout(url)
        } else {
            Self::request(url, error)
        }
    }
}

/// Status and headers of a HEAD probe.
#[derive(Debug, Clone)]
pub struct HeadResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
}

/// Status of a GET plus its body as a chunk stream.
pub struct StreamResponse {
    /// HTTP status code.
    pub status: u16,
    /// Body chunks; only meaningful when `status` is 200.
    pub body: ByteStream,
}

impl std::fmt::Debug for StreamResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// The two requests the download protocol needs.
///
/// Implementations must not treat non-2xx statuses as errors; status handling
/// belongs to the caller.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a HEAD request.
    async fn head(&self, url: &str) -> Result<HeadResponse, TransportError>;

    /// Sends a GET request and returns without buffering the body.
    async fn get_stream(&self, url: &str) -> Result<StreamResponse, TransportError>;
}

/// [`HttpTransport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a client with the configured connect and read-idle timeouts.
    ///
    /// No overall request timeout is set, so large files are bounded only by
    /// the gap between reads. Redirects are not followed: a 3xx reaches the
    /// caller as a status like any other.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ClientBuild`] if the TLS backend or system
    /// configuration cannot be initialized.
    pub fn new(config: &DownloaderConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(user_agent::default_download_user_agent())
            .build()
            .map_err(|source| TransportError::ClientBuild { source })?;
        Ok(Self { client })
    }

    /// Returns a reference to the underlying reqwest client.
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn head(&self, url: &str) -> Result<HeadResponse, TransportError> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(url, e))?;
        let status = response.status().as_u16();
        debug!(status, "HEAD response");
        Ok(HeadResponse {
            status,
            headers: response.headers().clone(),
        })
    }

    async fn get_stream(&self, url: &str) -> Result<StreamResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(url, e))?;
        let status = response.status().as_u16();
        debug!(status, "GET response");

        let owned_url = url.to_string();
        let body = response
            .bytes_stream()
            .map(move |chunk| chunk.map_err(|e| TransportError::from_reqwest(owned_url.as_str(), e)))
            .boxed();
        Ok(StreamResponse { status, body })
    }
}
