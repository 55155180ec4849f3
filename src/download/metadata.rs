//! Remote file metadata derived from a HEAD response.

use reqwest::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, HeaderMap};

use super::disposition::parse_content_disposition;
use super::transport::HeadResponse;

/// What the HEAD probe told us about the remote file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFileMetadata {
    /// Whether the server answered 200.
    pub exists: bool,
    /// The HEAD status code.
    pub status_code: u16,
    /// Advertised body size, when present and parsable.
    pub content_length: Option<u64>,
    /// Filename suggested by `Content-Disposition`, before basename reduction.
    pub suggested_filename: Option<String>,
}

impl RemoteFileMetadata {
    /// Builds metadata from a HEAD response.
    #[must_use]
    pub fn from_head(response: &HeadResponse) -> Self {
        Self {
            exists: response.status == 200,
            status_code: response.status,
            content_length: content_length(&response.headers),
            suggested_filename: suggested_filename(&response.headers),
        }
    }

    /// Size for progress reporting; 0 means unknown.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.content_length.unwrap_or(0)
    }
}

fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

fn suggested_filename(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(CONTENT_DISPOSITION)?;
    // Non-ASCII raw bytes are read as UTF-8 when possible.
    let text = value
        .to_str()
        .ok()
        .map(str::to_string)
        .or_else(|| String::from_utf8(value.as_bytes().to_vec()).ok())?;
    parse_content_disposition(&text).into_name()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    fn head(status: u16, headers: &[(&'static str, &str)]) -> HeadResponse {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        HeadResponse {
            status,
            headers: map,
        }
    }

    #[test]
    fn test_metadata_reads_length_and_filename() {
        let meta = RemoteFileMetadata::from_head(&head(
            200,
            &[
                ("content-length", "1024"),
                ("content-disposition", r#"attachment; filename="report.pdf""#),
            ],
        ));
        assert!(meta.exists);
        assert_eq!(meta.status_code, 200);
        assert_eq!(meta.content_length, Some(1024));
        assert_eq!(meta.total_size(), 1024);
        assert_eq!(meta.suggested_filename.as_deref(), Some("report.pdf"));
    }

    #[test]
    fn test_metadata_missing_headers() {
        let meta = RemoteFileMetadata::from_head(&head(200, &[]));
        assert_eq!(meta.content_length, None);
        assert_eq!(meta.total_size(), 0);
        assert_eq!(meta.suggested_filename, None);
    }

    #[test]
    fn test_metadata_unparsable_length_is_unknown() {
        let meta = RemoteFileMetadata::from_head(&head(200, &[("content-length", "lots")]));
        assert_eq!(meta.content_length, None);
        assert_eq!(meta.total_size(), 0);
    }

    #[test]
    fn test_metadata_not_found() {
        let meta = RemoteFileMetadata::from_head(&head(404, &[]));
        assert!(!meta.exists);
        assert_eq!(meta.status_code, 404);
    }

    #[test]
    fn test_metadata_raw_utf8_disposition() {
        let mut map = HeaderMap::new();
        map.insert(
            CONTENT_DISPOSITION,
            HeaderValue::from_bytes("attachment; filename=\"日本語.pdf\"".as_bytes()).unwrap(),
        );
        let meta = RemoteFileMetadata::from_head(&HeadResponse {
            status: 200,
            headers: map,
        });
        assert_eq!(meta.suggested_filename.as_deref(), Some("日本語.pdf"));
    }
}
