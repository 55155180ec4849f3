//! Downloader configuration: server base URL and per-request timeouts.
//!
//! Values are passed explicitly into [`Downloader::from_config`](crate::Downloader::from_config);
//! nothing here is read from process-wide state.

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default drive server.
pub const DEFAULT_SERVER_URL: &str = "https://drive.qualiteg.com";

/// Default HTTP connect timeout (60 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 60;

/// Default HTTP read-idle timeout (10 seconds between body reads).
pub const READ_TIMEOUT_SECS: u64 = 10;

/// Accepted range for either timeout, in seconds.
const TIMEOUT_RANGE_SECS: std::ops::RangeInclusive<u64> = 1..=3600;

/// Errors raised while validating a [`DownloaderConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The server base URL is not an absolute http(s) URL with a host.
    #[error("invalid server URL: {url}")]
    InvalidServerUrl {
        /// The rejected value.
        url: String,
    },

    /// A timeout is outside 1..=3600 seconds.
    #[error("invalid value for `{field}`: {secs}s. Expected range: 1..=3600")]
    TimeoutOutOfRange {
        /// Which timeout was rejected.
        field: &'static str,
        /// The rejected value in seconds.
        secs: u64,
    },
}

/// Settings shared by every download made through one [`Downloader`](crate::Downloader).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloaderConfig {
    /// Server base URL, without trailing slash.
    pub server_url: String,
    /// Timeout for establishing a connection.
    pub connect_timeout: Duration,
    /// Timeout for each read from the socket.
    pub read_timeout: Duration,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(READ_TIMEOUT_SECS),
        }
    }
}

impl DownloaderConfig {
    /// Returns a copy pointing at `server_url` (trailing slashes trimmed).
    #[must_use]
    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
        self.server_url = normalize_server_url(&server_url.into());
        self
    }

    /// Returns a copy with both timeouts replaced.
    #[must_use]
    pub fn with_timeouts(mut self, connect_timeout: Duration, read_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self.read_timeout = read_timeout;
        self
    }

    /// Checks the server URL and timeout ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] describing the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = Url::parse(&self.server_url).map_err(|_| ConfigError::InvalidServerUrl {
            url: self.server_url.clone(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ConfigError::InvalidServerUrl {
                url: self.server_url.clone(),
            });
        }
        validate_timeout("connect_timeout", self.connect_timeout)?;
        validate_timeout("read_timeout", self.read_timeout)?;
        Ok(())
    }
}

/// Trims trailing slashes so `{server}/download/{id}` never doubles up.
#[must_use]
pub fn normalize_server_url(server_url: &str) -> String {
    server_url.trim().trim_end_matches('/').to_string()
}

fn validate_timeout(field: &'static str, value: Duration) -> Result<(), ConfigError> {
    let secs = value.as_secs();
    if TIMEOUT_RANGE_SECS.contains(&secs) {
        Ok(())
    } else {
        Err(ConfigError::TimeoutOutOfRange { field, secs })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DownloaderConfig::default();
        assert_eq!(config.server_url, "https://drive.qualiteg.com");
        assert_eq!(config.connect_timeout, Duration::from_secs(60));
        assert_eq!(config.read_timeout, Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_server_url_trims_trailing_slash() {
        let config = DownloaderConfig::default().with_server_url("http://localhost:8000//");
        assert_eq!(config.server_url, "http://localhost:8000");
    }

    #[test]
    fn test_validate_rejects_non_http_scheme() {
        let config = DownloaderConfig::default().with_server_url("ftp://example.com");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidServerUrl { .. }));
        assert!(err.to_string().contains("ftp://example.com"));
    }

    #[test]
    fn test_validate_rejects_garbage_url() {
        let config = DownloaderConfig::default().with_server_url("not a url");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidServerUrl { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = DownloaderConfig::default()
            .with_timeouts(Duration::from_secs(0), Duration::from_secs(10));
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::TimeoutOutOfRange {
                field: "connect_timeout",
                secs: 0
            }
        ));
    }

    #[test]
    fn test_validate_rejects_huge_read_timeout() {
        let config = DownloaderConfig::default()
            .with_timeouts(Duration::from_secs(60), Duration::from_secs(3601));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TimeoutOutOfRange {
                field: "read_timeout",
                ..
            })
        ));
    }
}
