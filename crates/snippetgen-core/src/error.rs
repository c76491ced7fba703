//! Error types surfaced by the snippet pipeline.

/// Error taxonomy for snippet generation.
///
/// Every variant is returned to the caller as-is. Nothing in the pipeline
/// performs I/O, so nothing is retried internally.
#[derive(Debug, thiserror::Error)]
pub enum SnippetError {
    /// No operation in the path index matches the request path and method.
    #[error("unresolved path {path}: {reason}")]
    UnresolvedPath {
        /// The request path that failed to resolve.
        path: String,
        /// Why matching stopped.
        reason: String,
    },

    /// The version segment is not configured and no override was supplied.
    #[error("unsupported API version: {version:?}")]
    UnsupportedApiVersion {
        /// The version token found in the request URL.
        version: String,
    },

    /// No language profile is registered under the requested identifier.
    #[error("unsupported language: {language}")]
    UnsupportedLanguage {
        /// The language identifier that was requested.
        language: String,
    },

    /// The body declares a JSON content type but does not parse as JSON.
    #[error("malformed {content_type} body: {reason}")]
    MalformedBody {
        /// The declared content type.
        content_type: String,
        /// The parser error.
        reason: String,
    },

    /// The JSON shape is incompatible with the declared schema type.
    #[error("schema mismatch at {property}: expected {expected}, found {found}")]
    SchemaMismatch {
        /// JSON path of the offending member.
        property: String,
        /// Schema type that was declared.
        expected: String,
        /// JSON kind that was found.
        found: String,
    },

    /// The path index for an API version could not be loaded.
    #[error("failed to load path index for {version}: {reason}")]
    IndexLoad {
        /// The API version whose index failed to load.
        version: String,
        /// The loader error.
        reason: String,
    },

    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SnippetError {
    /// Create an [`SnippetError::UnresolvedPath`] error.
    #[must_use]
    pub fn unresolved_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnresolvedPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an [`SnippetError::SchemaMismatch`] error.
    #[must_use]
    pub fn schema_mismatch(
        property: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::SchemaMismatch {
            property: property.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Short, stable name of the error kind, used in structured logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnresolvedPath { .. } => "UnresolvedPathError",
            Self::UnsupportedApiVersion { .. } => "UnsupportedApiVersionError",
            Self::UnsupportedLanguage { .. } => "UnsupportedLanguageError",
            Self::MalformedBody { .. } => "MalformedBodyError",
            Self::SchemaMismatch { .. } => "SchemaMismatchError",
            Self::IndexLoad { .. } => "IndexLoadError",
            Self::Internal(_) => "InternalError",
        }
    }
}

/// Convenience result type for snippet operations.
pub type SnippetResult<T> = Result<T, SnippetError>;
