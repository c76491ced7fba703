//! Header filtering.

use snippetgen_model::Header;

/// Headers that describe the transport rather than the call.
const FRAMING_HEADERS: &[&str] = &[
    "host",
    "content-length",
    "content-type",
    "transfer-encoding",
    "connection",
    "keep-alive",
    "te",
    "trailer",
    "upgrade",
    "proxy-connection",
    "expect",
];

/// Split recorded headers into the preserved list and the body content type.
pub(crate) fn partition_headers(headers: &[(String, String)]) -> (Vec<Header>, Option<String>) {
    let mut content_type = None;
    let mut kept = Vec::new();
    for (name, value) in headers {
        let name = name.trim();
        if name.eq_ignore_ascii_case("content-type") {
            content_type.get_or_insert_with(|| value.trim().to_owned());
            continue;
        }
        if FRAMING_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(name)) {
            continue;
        }
        kept.push(Header {
            name: name.to_owned(),
            value: value.clone(),
        });
    }
    (kept, content_type)
}
