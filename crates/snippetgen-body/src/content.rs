//! Content type classification.

use mime::Mime;
use serde_json::Value;

/// How a body is interpreted.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BodyContent {
    /// Parsed JSON.
    Json(Value),
    /// Text, kept as a single string.
    Text(String),
    /// Opaque bytes.
    Binary,
}

/// Why a body could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MalformedJson {
    pub content_type: String,
    pub reason: String,
}

/// Classify `body` by its declared content type.
///
/// Without a content type, a body that parses as JSON is JSON, valid UTF-8
/// is text and anything else is binary.
pub(crate) fn classify(content_type: Option<&str>, body: &[u8]) -> Result<BodyContent, MalformedJson> {
    let Some(mime) = content_type.and_then(|ct| ct.parse::<Mime>().ok()) else {
        if let Ok(value) = serde_json::from_slice::<Value>(body) {
            return Ok(BodyContent::Json(value));
        }
        return Ok(text_or_binary(body));
    };

    if is_json(&mime) {
        return serde_json::from_slice::<Value>(body)
            .map(BodyContent::Json)
            .map_err(|e| MalformedJson {
                content_type: mime.essence_str().to_owned(),
                reason: e.to_string(),
            });
    }

    if mime.type_() == mime::TEXT
        || mime.essence_str() == mime::APPLICATION_WWW_FORM_URLENCODED.essence_str()
        || mime.subtype() == mime::XML
        || mime.suffix() == Some(mime::XML)
    {
        return Ok(text_or_binary(body));
    }

    Ok(BodyContent::Binary)
}

fn is_json(mime: &Mime) -> bool {
    mime.subtype() == mime::JSON || mime.suffix() == Some(mime::JSON)
}

fn text_or_binary(body: &[u8]) -> BodyContent {
    match std::str::from_utf8(body) {
        Ok(text) => BodyContent::Text(text.to_owned()),
        Err(_) => BodyContent::Binary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_parse_declared_json() {
        let content = classify(Some("application/json; charset=utf-8"), br#"{"a": 1}"#).unwrap();
        assert!(matches!(content, BodyContent::Json(Value::Object(_))));
        let content = classify(Some("application/merge-patch+json"), b"[]").unwrap();
        assert!(matches!(content, BodyContent::Json(Value::Array(_))));
    }

    #[test]
    fn test_should_fail_on_malformed_json() {
        let err = classify(Some("application/json"), b"{nope").unwrap_err();
        assert_eq!(err.content_type, "application/json");
        assert!(!err.reason.is_empty());
    }

    #[test]
    fn test_should_sniff_json_without_content_type() {
        let content = classify(None, br#"{"subject": "hi"}"#).unwrap();
        assert!(matches!(content, BodyContent::Json(_)));
        assert_eq!(
            classify(None, b"plain words").unwrap(),
            BodyContent::Text("plain words".to_owned())
        );
        assert_eq!(classify(None, &[0xff, 0xfe, 0x00]).unwrap(), BodyContent::Binary);
    }

    #[test]
    fn test_should_treat_octet_streams_and_images_as_binary() {
        assert_eq!(
            classify(Some("application/octet-stream"), b"{}").unwrap(),
            BodyContent::Binary
        );
        assert_eq!(classify(Some("image/png"), b"\x89PNG").unwrap(), BodyContent::Binary);
    }

    #[test]
    fn test_should_keep_text_bodies_as_text() {
        assert_eq!(
            classify(Some("text/plain"), b"hello").unwrap(),
            BodyContent::Text("hello".to_owned())
        );
    }
}
