//! Configuration for the snippet pipeline.
//!
//! Values come from defaults, the typed builder, or environment variables.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Snippet generator configuration.
///
/// # Examples
///
/// ```
/// use snippetgen_core::SnippetConfig;
///
/// let config = SnippetConfig::default();
/// assert!(config.is_supported_version("v1.0"));
/// assert_eq!(config.client_variable, "graphClient");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct SnippetConfig {
    /// API version segments accepted in request URLs.
    #[builder(default = vec![String::from("v1.0"), String::from("beta")])]
    pub api_versions: Vec<String>,

    /// Version used instead of the URL's version segment, when set.
    #[builder(default)]
    pub api_version_override: Option<String>,

    /// Name of the client variable the snippet calls into, before casing.
    #[builder(default = String::from("graphClient"))]
    pub client_variable: String,

    /// Maximum nesting depth walked when building a body graph.
    #[builder(default = 32)]
    pub max_body_depth: usize,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for SnippetConfig {
    fn default() -> Self {
        Self {
            api_versions: vec![String::from("v1.0"), String::from("beta")],
            api_version_override: None,
            client_variable: String::from("graphClient"),
            max_body_depth: 32,
            log_level: String::from("info"),
        }
    }
}

impl SnippetConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `SNIPPET_API_VERSIONS` | `v1.0,beta` |
    /// | `SNIPPET_API_VERSION` | *(unset)* |
    /// | `SNIPPET_CLIENT_VARIABLE` | `graphClient` |
    /// | `SNIPPET_MAX_BODY_DEPTH` | `32` |
    /// | `LOG_LEVEL` | `info` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("SNIPPET_API_VERSIONS") {
            let versions = parse_list(&v);
            if !versions.is_empty() {
                config.api_versions = versions;
            }
        }
        if let Ok(v) = std::env::var("SNIPPET_API_VERSION") {
            if !v.trim().is_empty() {
                config.api_version_override = Some(v.trim().to_owned());
            }
        }
        if let Ok(v) = std::env::var("SNIPPET_CLIENT_VARIABLE") {
            config.client_variable = v;
        }
        if let Ok(v) = std::env::var("SNIPPET_MAX_BODY_DEPTH") {
            if let Ok(n) = v.parse::<usize>() {
                config.max_body_depth = n;
            }
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// Whether `version` is one of the configured API versions.
    #[must_use]
    pub fn is_supported_version(&self, version: &str) -> bool {
        self.api_versions
            .iter()
            .any(|v| v.eq_ignore_ascii_case(version))
    }
}

/// Split a comma-separated list, dropping empty items.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
