//! `Content-Disposition` filename parsing.
//!
//! Handles:
//! - `attachment; filename="example.pdf"`
//! - `attachment; filename=example.pdf`
//! - `attachment; filename*=UTF-8''%E3%83%86%E3%82%B9%E3%83%88.txt` (RFC 5987)
//!
//! The extended form wins when both are present.

/// Filename recovered from a `Content-Disposition` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispositionFilename {
    /// No usable filename parameter.
    None,
    /// A plain `filename=` value, quotes stripped.
    Plain(String),
    /// A percent-decoded `filename*=UTF-8''...` value.
    ExtendedUtf8(String),
}

impl DispositionFilename {
    /// Returns the filename, if any.
    #[must_use]
    pub fn into_name(self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Plain(name) | Self::ExtendedUtf8(name) => Some(name),
        }
    }
}

/// Outcome of looking at the `filename*` parameter.
enum Extended {
    Absent,
    Malformed,
    Decoded(String),
}

/// Parses a `Content-Disposition` header value.
///
/// A `filename*` parameter that is present but cannot be decoded yields
/// [`DispositionFilename::None`] rather than falling back to `filename=`.
#[must_use]
pub fn parse_content_disposition(header: &str) -> DispositionFilename {
    match parse_extended(header) {
        Extended::Decoded(name) => return DispositionFilename::ExtendedUtf8(name),
        Extended::Malformed => return DispositionFilename::None,
        Extended::Absent => {}
    }

    parse_plain(header).map_or(DispositionFilename::None, DispositionFilename::Plain)
}

fn parse_extended(header: &str) -> Extended {
    let Some(value) = find_param(header, "filename*") else {
        return Extended::Absent;
    };
    let value = value.strip_prefix('"').unwrap_or(value);

    // charset'language'encoded
    let mut parts = value.splitn(3, '\'');
    let (Some(charset), Some(_language), Some(encoded)) = (parts.next(), parts.next(), parts.next())
    else {
        return Extended::Malformed;
    };
    if !charset.trim().eq_ignore_ascii_case("utf-8") {
        return Extended::Malformed;
    }

    let end = encoded.find([';', '"']).unwrap_or(encoded.len());
    let encoded = encoded[..end].trim();
    match urlencoding::decode(encoded) {
        Ok(decoded) if !decoded.is_empty() => Extended::Decoded(decoded.into_owned()),
        _ => Extended::Malformed,
    }
}

fn parse_plain(header: &str) -> Option<String> {
    let value = find_param(header, "filename")?;
    let end = value.find(';').unwrap_or(value.len());
    let name = value[..end].trim().trim_matches('"').trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Returns the raw text following `name=` for the first parameter called
/// `name` (case-insensitive), up to the end of the header.
fn find_param<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    let lower = header.to_ascii_lowercase();
    let mut search_from = 0;
    while let Some(offset) = lower[search_from..].find(name) {
        let start = search_from + offset;
        let after_name = start + name.len();
        search_from = after_name;

        // Must start a parameter: beginning of header or after `;`/whitespace.
        let at_boundary = lower[..start]
            .chars()
            .next_back()
            .is_none_or(|c| c == ';' || c.is_whitespace());
        if !at_boundary {
            continue;
        }

        let rest = header[after_name..].trim_start();
        if let Some(value) = rest.strip_prefix('=') {
            return Some(value.trim_start());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_disposition_quoted() {
        let header = r#"attachment; filename="report.pdf""#;
        assert_eq!(
            parse_content_disposition(header),
            DispositionFilename::Plain("report.pdf".to_string())
        );
    }

    #[test]
    fn test_parse_content_disposition_unquoted() {
        let header = "attachment; filename=report.pdf";
        assert_eq!(
            parse_content_disposition(header),
            DispositionFilename::Plain("report.pdf".to_string())
        );
    }

    #[test]
    fn test_parse_content_disposition_stops_at_semicolon() {
        let header = r#"attachment; filename="report.pdf"; size=1234"#;
        assert_eq!(
            parse_content_disposition(header),
            DispositionFilename::Plain("report.pdf".to_string())
        );

        let header = "attachment; filename=report.pdf;size=1234";
        assert_eq!(
            parse_content_disposition(header),
            DispositionFilename::Plain("report.pdf".to_string())
        );
    }

    #[test]
    fn test_parse_content_disposition_extended_utf8() {
        let header = "attachment; filename*=UTF-8''%E3%83%86%E3%82%B9%E3%83%88.txt";
        assert_eq!(
            parse_content_disposition(header),
            DispositionFilename::ExtendedUtf8("テスト.txt".to_string())
        );
    }

    #[test]
    fn test_parse_content_disposition_extended_preferred_over_plain() {
        let header =
            r#"attachment; filename="fallback.txt"; filename*=UTF-8''%E3%83%86%E3%82%B9%E3%83%88.txt"#;
        assert_eq!(
            parse_content_disposition(header),
            DispositionFilename::ExtendedUtf8("テスト.txt".to_string())
        );
    }

    #[test]
    fn test_parse_content_disposition_extended_stops_at_quote_and_semicolon() {
        let header = "attachment; filename*=UTF-8''a%20b.txt\"; size=3";
        assert_eq!(
            parse_content_disposition(header),
            DispositionFilename::ExtendedUtf8("a b.txt".to_string())
        );

        let header = "attachment; filename*=utf-8''a%20b.txt; size=3";
        assert_eq!(
            parse_content_disposition(header),
            DispositionFilename::ExtendedUtf8("a b.txt".to_string())
        );
    }

    #[test]
    fn test_parse_content_disposition_extended_with_language_tag() {
        let header = "attachment; filename*=UTF-8'en'hello.txt";
        assert_eq!(
            parse_content_disposition(header),
            DispositionFilename::ExtendedUtf8("hello.txt".to_string())
        );
    }

    #[test]
    fn test_parse_content_disposition_malformed_extended_is_none() {
        // %FF alone is not valid UTF-8
        let header = r#"attachment; filename="ok.txt"; filename*=UTF-8''%FF.txt"#;
        assert_eq!(parse_content_disposition(header), DispositionFilename::None);

        let header = "attachment; filename*=no-quotes-here";
        assert_eq!(parse_content_disposition(header), DispositionFilename::None);

        let header = "attachment; filename*=ISO-8859-1''caf%E9.txt";
        assert_eq!(parse_content_disposition(header), DispositionFilename::None);
    }

    #[test]
    fn test_parse_content_disposition_missing() {
        assert_eq!(
            parse_content_disposition("attachment"),
            DispositionFilename::None
        );
        assert_eq!(
            parse_content_disposition("attachment; filename="),
            DispositionFilename::None
        );
        assert_eq!(
            parse_content_disposition(r#"attachment; filename="""#),
            DispositionFilename::None
        );
    }

    #[test]
    fn test_parse_content_disposition_ignores_lookalike_params() {
        let header = "attachment; myfilename=evil.sh";
        assert_eq!(parse_content_disposition(header), DispositionFilename::None);
    }

    #[test]
    fn test_parse_content_disposition_case_insensitive_param() {
        let header = "attachment; FileName=Report.PDF";
        assert_eq!(
            parse_content_disposition(header),
            DispositionFilename::Plain("Report.PDF".to_string())
        );
    }

    #[test]
    fn test_disposition_into_name() {
        assert_eq!(DispositionFilename::None.into_name(), None);
        assert_eq!(
            DispositionFilename::Plain("a".to_string()).into_name(),
            Some("a".to_string())
        );
        assert_eq!(
            DispositionFilename::ExtendedUtf8("b".to_string()).into_name(),
            Some("b".to_string())
        );
    }
}
