//! Request resolution: recorded HTTP request in, [`ResolvedRequest`] out.
//!
//! The [`RequestResolver`] turns a [`RecordedRequest`] into a
//! [`ResolvedRequest`] by:
//!
//! 1. Splitting the URL and the API version segment off the path
//! 2. Canonicalizing legacy path shapes through a fixed rewrite table
//! 3. Walking the path tree segment by segment
//! 4. Parsing the query string and filtering headers
//! 5. Choosing the schema the body is built against

mod body_schema;
mod headers;
mod query;
mod rewrite;
mod url;
mod walk;

use snippetgen_core::{SnippetConfig, SnippetError, SnippetResult};
use snippetgen_model::{PathIndex, RecordedRequest, ResolvedRequest};
use tracing::debug;

/// Resolves recorded requests against a [`PathIndex`].
#[derive(Debug, Clone, Default)]
pub struct RequestResolver {
    config: SnippetConfig,
}

impl RequestResolver {
    /// Create a resolver with the given configuration.
    #[must_use]
    pub fn new(config: SnippetConfig) -> Self {
        Self { config }
    }

    /// The API version `url` targets, after applying any override.
    ///
    /// # Errors
    ///
    /// Returns [`SnippetError::UnsupportedApiVersion`] when the version
    /// segment is not configured and no override is set.
    pub fn api_version(&self, url: &str) -> SnippetResult<String> {
        let split = url::split_url(url);
        let (version, _) = url::split_version(&self.config, split.path)?;
        Ok(version)
    }

    /// Resolve `request` against `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SnippetError::UnsupportedApiVersion`] for an unconfigured
    /// version segment and [`SnippetError::UnresolvedPath`] when no declared
    /// operation matches the path and method.
    pub fn resolve(
        &self,
        request: &RecordedRequest,
        index: &dyn PathIndex,
    ) -> SnippetResult<ResolvedRequest> {
        let split = url::split_url(&request.url);
        let (api_version, path) = url::split_version(&self.config, split.path)?;
        let path = rewrite::rewrite_legacy_path(&url::decode_path(&path));

        let walk = walk::walk_path(index, &path)?;
        let node = walk
            .last()
            .filter(|_| !walk.segments.is_empty())
            .ok_or_else(|| SnippetError::unresolved_path(&path, "path has no segments"))?;
        let operation = node.operation(&request.method).cloned().ok_or_else(|| {
            SnippetError::unresolved_path(
                &path,
                format!("no {} operation is declared", request.method),
            )
        })?;

        let body_schema = body_schema::select_body_schema(
            index,
            &request.method,
            &walk.segments,
            node,
            walk.parent(),
            &operation,
            &request.body,
        );
        let query = query::parse_query(split.query, Some(&operation));
        let (headers, content_type) = headers::partition_headers(&request.headers);

        debug!(
            method = %request.method,
            api_version = %api_version,
            path = %path,
            segments = walk.segments.len(),
            "resolved request"
        );

        Ok(ResolvedRequest {
            method: request.method.clone(),
            api_version,
            path,
            segments: walk.segments,
            operation: Some(operation),
            body_schema,
            query,
            headers,
            content_type,
            body: request.body.clone(),
            namespace: index.namespace().to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use http::Method;
    use snippetgen_model::fixtures::graph_index;
    use snippetgen_model::{BodySchema, PathSegment};

    use super::*;

    fn resolve(request: &RecordedRequest) -> SnippetResult<ResolvedRequest> {
        RequestResolver::default().resolve(request, &graph_index())
    }

    #[test]
    fn test_should_resolve_absolute_url() {
        let request = RecordedRequest::new(
            Method::GET,
            "https://graph.microsoft.com/v1.0/me/messages?$select=subject&$top=2",
        )
        .with_header("Authorization", "Bearer token")
        .with_header("Host", "graph.microsoft.com");
        let resolved = resolve(&request).unwrap();

        assert_eq!(resolved.api_version, "v1.0");
        assert_eq!(resolved.segments.len(), 2);
        assert_eq!(resolved.query.select, vec!["subject"]);
        assert_eq!(resolved.query.top, Some(2));
        assert_eq!(resolved.headers.len(), 1);
        assert_eq!(resolved.headers[0].name, "Authorization");
        assert_eq!(resolved.namespace, "microsoft.graph");
    }

    #[test]
    fn test_should_capture_content_type_and_body() {
        let request = RecordedRequest::new(Method::POST, "/v1.0/me/messages")
            .with_header("Content-Type", "application/json")
            .with_body(r#"{"subject": "hi"}"#);
        let resolved = resolve(&request).unwrap();
        assert_eq!(resolved.content_type.as_deref(), Some("application/json"));
        assert!(resolved.has_body());
        assert!(matches!(resolved.body_schema, BodySchema::Named(_)));
    }

    #[test]
    fn test_should_rewrite_legacy_paths_before_matching() {
        let request = RecordedRequest::new(
            Method::GET,
            "/v1.0/me/drive/root:/Documents/My%20File.txt:/content",
        );
        let resolved = resolve(&request).unwrap();
        assert_eq!(resolved.path, "/drives/{drive-id}/items/{driveItem-id}/content");
        assert!(matches!(
            resolved.segments.last(),
            Some(PathSegment::Literal { name, .. }) if name == "content"
        ));

        let request = RecordedRequest::new(Method::GET, "/v1.0/me/calendar/events");
        assert!(resolve(&request).is_ok());
    }

    #[test]
    fn test_should_reject_undeclared_methods() {
        let request = RecordedRequest::new(Method::DELETE, "/v1.0/me/messages");
        let err = resolve(&request).unwrap_err();
        assert!(matches!(err, SnippetError::UnresolvedPath { reason, .. } if reason.contains("DELETE")));
    }

    #[test]
    fn test_should_reject_empty_paths() {
        let request = RecordedRequest::new(Method::GET, "/v1.0/");
        assert!(matches!(
            resolve(&request).unwrap_err(),
            SnippetError::UnresolvedPath { .. }
        ));
    }

    #[test]
    fn test_should_reject_unsupported_versions() {
        let request = RecordedRequest::new(Method::GET, "/v3/me");
        assert!(matches!(
            resolve(&request).unwrap_err(),
            SnippetError::UnsupportedApiVersion { .. }
        ));
    }

    #[test]
    fn test_should_report_api_version_with_override() {
        let resolver = RequestResolver::new(
            SnippetConfig::builder()
                .api_version_override(Some("beta".to_owned()))
                .build(),
        );
        assert_eq!(resolver.api_version("/v1.0/me").unwrap(), "beta");
        let resolved = resolver
            .resolve(&RecordedRequest::new(Method::GET, "/me"), &graph_index())
            .unwrap();
        assert_eq!(resolved.api_version, "beta");
    }
}
