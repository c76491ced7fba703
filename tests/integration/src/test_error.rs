//! Failures surfaced to callers.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use http::Method;
    use snippetgen_core::{SnippetConfig, SnippetError};

    use crate::{counting_generator, json_request, request, snippet};

    #[test]
    fn test_should_reject_unknown_language() {
        let err = snippet(&request(Method::GET, "/v1.0/me"), "fortran").unwrap_err();
        assert_eq!(err.kind(), "UnsupportedLanguageError");
        assert!(matches!(err, SnippetError::UnsupportedLanguage { ref language } if language == "fortran"));
    }

    #[test]
    fn test_should_accept_language_aliases() {
        let get = request(Method::GET, "/v1.0/me");
        assert_eq!(
            snippet(&get, "C#").unwrap(),
            snippet(&get, "csharp").unwrap()
        );
        assert!(snippet(&get, "golang").is_ok());
    }

    #[test]
    fn test_should_reject_unconfigured_api_version() {
        let err = snippet(&request(Method::GET, "/v2.0/me"), "csharp").unwrap_err();
        assert_eq!(err.kind(), "UnsupportedApiVersionError");
    }

    #[test]
    fn test_should_reject_unknown_paths_and_methods() {
        let err = snippet(&request(Method::GET, "/v1.0/me/nonexistent"), "python").unwrap_err();
        assert_eq!(err.kind(), "UnresolvedPathError");
        let err = snippet(&request(Method::PUT, "/v1.0/me/messages"), "python").unwrap_err();
        assert_eq!(err.kind(), "UnresolvedPathError");
    }

    #[test]
    fn test_should_reject_malformed_json() {
        let post = json_request(Method::POST, "/v1.0/me/messages", r#"{"subject": "#);
        let err = snippet(&post, "go").unwrap_err();
        assert_eq!(err.kind(), "MalformedBodyError");
    }

    #[test]
    fn test_should_reject_shape_mismatches() {
        let post = json_request(Method::POST, "/v1.0/me/messages", r#"{"body": "plain"}"#);
        let err = snippet(&post, "csharp").unwrap_err();
        assert_eq!(err.kind(), "SchemaMismatchError");
    }

    #[test]
    fn test_should_degrade_unknown_derived_type_to_declared_type() {
        let post = json_request(
            Method::POST,
            "/v1.0/me/messages/AAMk/attachments",
            r##"{"@odata.type": "#microsoft.graph.hologramAttachment", "name": "x"}"##,
        );
        let csharp = snippet(&post, "csharp").unwrap();
        assert!(csharp.contains("var requestBody = new Attachment\n{\n\tName = \"x\",\n};"));
    }

    #[test]
    fn test_should_render_beta_requests_against_beta_sdk() {
        let csharp = snippet(&request(Method::GET, "/beta/me"), "csharp").unwrap();
        assert!(csharp.contains("using Microsoft.Graph.Beta;"));
        assert!(csharp.contains("var result = await graphClient.Me.GetAsync();"));
    }

    #[test]
    fn test_should_report_index_load_failures() {
        let config = SnippetConfig {
            api_versions: vec!["v1.0".to_owned(), "v2.0".to_owned()],
            ..SnippetConfig::default()
        };
        let generator = counting_generator(config, Arc::default());
        let err = generator
            .snippet_for(&request(Method::GET, "/v2.0/me"), "csharp")
            .unwrap_err();
        assert!(matches!(err, SnippetError::IndexLoad { ref version, ref reason } if version == "v2.0" && reason.contains("no fixture index")));
        assert!(generator.snippet_for(&request(Method::GET, "/v1.0/me"), "csharp").is_ok());
    }
}
