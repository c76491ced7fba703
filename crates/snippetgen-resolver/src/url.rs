//! URL splitting and API version handling.

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

use snippetgen_core::{SnippetConfig, SnippetError, SnippetResult};

/// Tokens that look like an API version segment.
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(v\d+(\.\d+)*|beta|alpha|canary)$").expect("Invalid version regex")
});

/// Path and query of a request URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SplitUrl<'a> {
    pub path: &'a str,
    pub query: &'a str,
}

/// Split a URL into path and query, dropping scheme, authority and fragment.
pub(crate) fn split_url(url: &str) -> SplitUrl<'_> {
    let without_fragment = url.split_once('#').map_or(url, |(before, _)| before);
    let relative = match without_fragment.find("://") {
        Some(pos) => {
            let rest = &without_fragment[pos + 3..];
            rest.find(['/', '?']).map_or("", |i| &rest[i..])
        }
        None => without_fragment,
    };
    match relative.split_once('?') {
        Some((path, query)) => SplitUrl { path, query },
        None => SplitUrl {
            path: relative,
            query: "",
        },
    }
}

/// Decode a percent-encoded path.
pub(crate) fn decode_path(path: &str) -> String {
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}

/// Split the version segment off `path`.
///
/// Returns the API version and the remaining path, which always starts with `/`.
pub(crate) fn split_version(config: &SnippetConfig, path: &str) -> SnippetResult<(String, String)> {
    let trimmed = path.trim_start_matches('/');
    let (first, rest) = trimmed.split_once('/').unwrap_or((trimmed, ""));

    if let Some(version) = &config.api_version_override {
        let remaining = if VERSION_RE.is_match(first) || config.is_supported_version(first) {
            rest
        } else {
            trimmed
        };
        return Ok((version.clone(), format!("/{remaining}")));
    }

    match config
        .api_versions
        .iter()
        .find(|v| v.eq_ignore_ascii_case(first))
    {
        Some(version) => Ok((version.clone(), format!("/{rest}"))),
        None => Err(SnippetError::UnsupportedApiVersion {
            version: first.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_split_absolute_urls() {
        let split = split_url("https://graph.microsoft.com/v1.0/me/messages?$top=5#frag");
        assert_eq!(split.path, "/v1.0/me/messages");
        assert_eq!(split.query, "$top=5");
    }

    #[test]
    fn test_should_split_relative_urls() {
        let split = split_url("/beta/groups");
        assert_eq!(split.path, "/beta/groups");
        assert_eq!(split.query, "");
        assert_eq!(split_url("https://host?x=1").path, "");
    }

    #[test]
    fn test_should_strip_configured_version() {
        let config = SnippetConfig::default();
        let (version, rest) = split_version(&config, "/v1.0/me/messages").unwrap();
        assert_eq!(version, "v1.0");
        assert_eq!(rest, "/me/messages");
        let (version, rest) = split_version(&config, "/BETA/me").unwrap();
        assert_eq!(version, "beta");
        assert_eq!(rest, "/me");
    }

    #[test]
    fn test_should_reject_unconfigured_version() {
        let config = SnippetConfig::default();
        let err = split_version(&config, "/v2.0/me").unwrap_err();
        assert!(matches!(err, SnippetError::UnsupportedApiVersion { version } if version == "v2.0"));
        assert!(split_version(&config, "/me").is_err());
    }

    #[test]
    fn test_should_apply_version_override() {
        let config = SnippetConfig::builder()
            .api_version_override(Some("beta".to_owned()))
            .build();
        assert_eq!(
            split_version(&config, "/v2.0/me").unwrap(),
            ("beta".to_owned(), "/me".to_owned())
        );
        assert_eq!(
            split_version(&config, "/me/messages").unwrap(),
            ("beta".to_owned(), "/me/messages".to_owned())
        );
    }

    #[test]
    fn test_should_decode_paths() {
        assert_eq!(decode_path("/me/drive/root:/My%20Files:"), "/me/drive/root:/My Files:");
    }
}
