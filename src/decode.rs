//! Response decoding.
//!
//! Maps a raw response body onto the three outcomes the client reports:
//! a decoded value, "no result" (empty body or JSON `null`), or a
//! [`DomainrError::ParseError`].

use crate::parse_error;
use crate::types::*;
use serde::de::DeserializeOwned;

/// Longest body excerpt kept on a parse error
const SOURCE_TEXT_LIMIT: usize = 512;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode a response body
///
/// A leading UTF-8 byte order mark is skipped and whitespace-only bodies
/// count as empty. Unknown fields are ignored.
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> DomainrResult<Option<T>> {
    let body = body.strip_prefix(UTF8_BOM).unwrap_or(body);
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(None);
    }

    serde_json::from_slice::<Option<T>>(body).map_err(|e| {
        parse_error!(
            format!("Failed to decode response: {}", e),
            excerpt(body),
            e
        )
    })
}

/// Downgrade decode failures to "no result", keeping every other error
pub fn swallow_decode_error<T>(result: DomainrResult<Option<T>>) -> DomainrResult<Option<T>> {
    match result {
        Err(err) if err.is_decode() => {
            tracing::warn!(error = %err, "discarding undecodable response");
            Ok(None)
        }
        other => other,
    }
}

fn excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    match text.char_indices().nth(SOURCE_TEXT_LIMIT) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_is_no_result() {
        assert_eq!(decode_body::<SearchResult>(b"").unwrap(), None);
        assert_eq!(decode_body::<SearchResult>(b"  \r\n").unwrap(), None);
    }

    #[test]
    fn test_null_is_no_result() {
        assert_eq!(decode_body::<DomainInfo>(b"null").unwrap(), None);
    }

    #[test]
    fn test_decodes_search_result() {
        let body = br#"{"query":"example","results":[{"domain":"example.com","availability":"taken"}]}"#;
        let result = decode_body::<SearchResult>(body).unwrap().unwrap();
        assert_eq!(result.query, "example");
        assert_eq!(result.results.len(), 1);
        assert_eq!(result.results[0].domain, "example.com");
        assert_eq!(result.results[0].availability, Some(Availability::Taken));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let body = br#"{"query":"q","results":[],"extra":{"nested":true},"count":3}"#;
        let result = decode_body::<SearchResult>(body).unwrap().unwrap();
        assert_eq!(result.query, "q");
        assert!(result.results.is_empty());
    }

    #[test]
    fn test_leading_bom_is_skipped() {
        let body = b"\xEF\xBB\xBF{\"query\":\"bom\",\"results\":[]}";
        let result = decode_body::<SearchResult>(body).unwrap().unwrap();
        assert_eq!(result.query, "bom");

        assert_eq!(decode_body::<SearchResult>(b"\xEF\xBB\xBF").unwrap(), None);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = decode_body::<SearchResult>(b"{\"query\":").unwrap_err();
        assert!(err.is_decode());
        match err {
            DomainrError::ParseError { source_text, location, .. } => {
                assert_eq!(source_text.as_deref(), Some("{\"query\":"));
                assert!(location.is_some());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_wrong_shape_is_parse_error() {
        let err = decode_body::<SearchResult>(br#"{"results":"nope"}"#).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_excerpt_is_truncated() {
        let body = "x".repeat(SOURCE_TEXT_LIMIT * 2);
        let text = excerpt(body.as_bytes());
        assert_eq!(text.len(), SOURCE_TEXT_LIMIT + 3);
    }

    #[test]
    fn test_swallow_only_decode_errors() {
        let decode_err: DomainrResult<Option<u8>> = decode_body::<u8>(b"nope");
        assert_eq!(swallow_decode_error(decode_err).unwrap(), None);

        let transport_err: DomainrResult<Option<u8>> =
            Err(DomainrError::api_error("down", Some(502), None, None));
        assert!(swallow_decode_error(transport_err).unwrap_err().is_transport());
    }
}
