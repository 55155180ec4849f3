//! File ID extraction from share URLs and bare identifiers.
//!
//! The drive service hands out two URL shapes for the same file:
//! `https://drive.qualiteg.com/file/<id>` (the share page) and
//! `https://drive.qualiteg.com/download/<id>` (the direct link). Anything
//! that matches neither is assumed to already be a bare ID.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::config::DEFAULT_SERVER_URL;
use crate::download::DownloadError;

/// Resolver for the default server, built once.
static DEFAULT_RESOLVER: LazyLock<IdentifierResolver> =
    LazyLock::new(|| IdentifierResolver::for_server(DEFAULT_SERVER_URL));

/// Extracts the file ID from a share URL of the default server.
///
/// Returns the input unchanged when it is not a recognized URL.
///
/// # Examples
///
/// ```
/// use qdown::extract_file_id;
///
/// let id = extract_file_id("https://drive.qualiteg.com/file/3kMM-X9S6-bMioFU0Fn8nHjAgQgWmG");
/// assert_eq!(id, "3kMM-X9S6-bMioFU0Fn8nHjAgQgWmG");
/// assert_eq!(extract_file_id("abc123"), "abc123");
/// ```
#[must_use]
pub fn extract_file_id(input: &str) -> String {
    DEFAULT_RESOLVER.extract(input)
}

/// Matches `/file/<id>` and `/download/<id>` URLs for one server base.
#[derive(Debug, Clone)]
pub struct IdentifierResolver {
    file_pattern: Option<Regex>,
    download_pattern: Option<Regex>,
}

impl IdentifierResolver {
    /// Builds a resolver that matches share URLs under `server_url`.
    ///
    /// The base is matched literally (scheme and host included); a trailing
    /// slash is ignored.
    #[must_use]
    pub fn for_server(server_url: &str) -> Self {
        let base = regex::escape(server_url.trim_end_matches('/'));
        let build = |kind: &str| Regex::new(&format!("{base}/{kind}/([A-Za-z0-9_-]+)")).ok();
        Self {
            file_pattern: build("file"),
            download_pattern: build("download"),
        }
    }

    /// Returns the ID captured from a share URL, or `input` unchanged.
    ///
    /// Never fails: an input that matches nothing is the bare-ID branch.
    #[must_use]
    pub fn extract(&self, input: &str) -> String {
        for pattern in [&self.file_pattern, &self.download_pattern]
            .into_iter()
            .flatten()
        {
            if let Some(id) = pattern.captures(input).and_then(|c| c.get(1)) {
                trace!(id = id.as_str(), "extracted file id from url");
                return id.as_str().to_string();
            }
        }
        input.to_string()
    }
}

/// An opaque, non-empty file ID understood by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileIdentifier(String);

impl FileIdentifier {
    /// Wraps `value` after checking it is not blank.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::EmptyIdentifier`] for empty or whitespace-only input.
    pub fn parse(value: impl Into<String>) -> Result<Self, DownloadError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DownloadError::EmptyIdentifier);
        }
        Ok(Self(value))
    }

    /// Resolves a URL or bare ID against the default server patterns.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::EmptyIdentifier`] when nothing usable remains.
    pub fn from_input(input: &str) -> Result<Self, DownloadError> {
        Self::parse(extract_file_id(input))
    }

    /// Resolves a URL or bare ID, trying share URLs of `server_url` first and
    /// then those of the default server.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::EmptyIdentifier`] when nothing usable remains.
    pub fn from_input_for_server(input: &str, server_url: &str) -> Result<Self, DownloadError> {
        let extracted = IdentifierResolver::for_server(server_url).extract(input);
        if extracted == input {
            Self::from_input(input)
        } else {
            Self::parse(extracted)
        }
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FileIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
