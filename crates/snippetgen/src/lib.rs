//! Request-to-snippet generation.
//!
//! [`SnippetGenerator`] wires the pipeline together: it loads one
//! [`PathIndex`] per API version through an [`IndexLoader`] (at most once,
//! shared across threads), resolves recorded requests, builds their body
//! graphs and renders them with the requested language profile.
//!
//! ```no_run
//! use snippetgen::{SnippetGenerator, StaticIndexLoader};
//! use snippetgen_core::SnippetConfig;
//! use snippetgen_model::RecordedRequest;
//!
//! let loader = StaticIndexLoader::new().with_dir("indexes");
//! let generator = SnippetGenerator::new(SnippetConfig::from_env(), loader);
//! let request = RecordedRequest::new(http::Method::GET, "/v1.0/me/messages");
//! let snippet = generator.snippet_for(&request, "csharp")?;
//! println!("{snippet}");
//! # Ok::<_, snippetgen_core::SnippetError>(())
//! ```

mod loader;
mod telemetry;

use std::fmt;
use std::sync::Arc;

use snippetgen_body::BodyGraphBuilder;
use snippetgen_core::{IndexCache, SnippetConfig, SnippetError, SnippetResult};
use snippetgen_model::{PathIndex, RecordedRequest, ResolvedRequest};
use snippetgen_render::{SnippetRenderer, find_language};
use snippetgen_resolver::RequestResolver;
use tracing::{debug, warn};

pub use loader::{IndexLoader, StaticIndexLoader};
pub use telemetry::init_tracing;

/// Snippet generation facade.
pub struct SnippetGenerator {
    config: SnippetConfig,
    loader: Box<dyn IndexLoader>,
    indexes: IndexCache<dyn PathIndex>,
    resolver: RequestResolver,
    bodies: BodyGraphBuilder,
    renderer: SnippetRenderer,
}

impl fmt::Debug for SnippetGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnippetGenerator")
            .field("config", &self.config)
            .field("indexes", &self.indexes)
            .finish_non_exhaustive()
    }
}

impl SnippetGenerator {
    /// Create a generator loading indexes through `loader`.
    #[must_use]
    pub fn new(config: SnippetConfig, loader: impl IndexLoader + 'static) -> Self {
        Self {
            resolver: RequestResolver::new(config.clone()),
            bodies: BodyGraphBuilder::new(config.clone()),
            renderer: SnippetRenderer::new(config.clone()),
            config,
            loader: Box::new(loader),
            indexes: IndexCache::new(),
        }
    }

    /// The generator's configuration.
    #[must_use]
    pub fn config(&self) -> &SnippetConfig {
        &self.config
    }

    /// Identifiers of the supported languages.
    #[must_use]
    pub fn supported_languages(&self) -> Vec<&'static str> {
        snippetgen_render::supported_languages()
    }

    /// The path index of `api_version`, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`SnippetError::IndexLoad`] when the loader fails. The failure
    /// is not cached.
    pub fn index(&self, api_version: &str) -> SnippetResult<Arc<dyn PathIndex>> {
        self.indexes.get_or_try_load(api_version, || {
            self.loader.load(api_version).map_err(|e| {
                warn!(api_version, error = %e, "path index load failed");
                SnippetError::IndexLoad {
                    version: api_version.to_owned(),
                    reason: format!("{e:#}"),
                }
            })
        })
    }

    /// Resolve `request` against the index of the version it targets.
    pub fn resolve(&self, request: &RecordedRequest) -> SnippetResult<ResolvedRequest> {
        let api_version = self.resolver.api_version(&request.url)?;
        let index = self.index(&api_version)?;
        self.resolver.resolve(request, index.as_ref())
    }

    /// Render a resolved request as a `language` snippet.
    pub fn generate_snippet(
        &self,
        request: &ResolvedRequest,
        language: &str,
    ) -> SnippetResult<String> {
        find_language(language)?;
        let index = self.index(&request.api_version)?;
        let graph = self.bodies.build(request, index.as_ref())?;
        self.renderer.render(request, &graph, language)
    }

    /// Resolve and render `request` in one step.
    ///
    /// The language is checked first, so an unsupported language never
    /// touches the index.
    pub fn snippet_for(&self, request: &RecordedRequest, language: &str) -> SnippetResult<String> {
        find_language(language)?;
        let resolved = self.resolve(request)?;
        let snippet = self.generate_snippet(&resolved, language)?;
        debug!(
            language,
            method = %request.method,
            url = %request.url,
            "generated snippet"
        );
        Ok(snippet)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use http::Method;
    use snippetgen_model::fixtures::graph_index;

    use super::*;

    fn fixture_loader(loads: Arc<AtomicUsize>) -> impl IndexLoader {
        move |version: &str| -> anyhow::Result<Arc<dyn PathIndex>> {
            loads.fetch_add(1, Ordering::SeqCst);
            anyhow::ensure!(version == "v1.0", "no index for {version}");
            Ok(Arc::new(graph_index()))
        }
    }

    #[test]
    fn test_should_generate_snippet_end_to_end() {
        let generator = SnippetGenerator::new(SnippetConfig::default(), fixture_loader(Arc::default()));
        let request = RecordedRequest::new(Method::GET, "/v1.0/me/messages");
        let snippet = generator.snippet_for(&request, "csharp").unwrap();
        assert!(snippet.contains("await graphClient.Me.Messages.GetAsync();"));
    }

    #[test]
    fn test_should_load_each_index_once() {
        let loads = Arc::new(AtomicUsize::new(0));
        let generator = SnippetGenerator::new(SnippetConfig::default(), fixture_loader(Arc::clone(&loads)));
        for language in generator.supported_languages() {
            generator
                .snippet_for(&RecordedRequest::new(Method::GET, "/v1.0/me"), language)
                .unwrap();
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_should_report_index_load_failures_without_caching() {
        let loads = Arc::new(AtomicUsize::new(0));
        let generator = SnippetGenerator::new(SnippetConfig::default(), fixture_loader(Arc::clone(&loads)));
        let request = RecordedRequest::new(Method::GET, "/beta/me");
        for _ in 0..2 {
            let err = generator.snippet_for(&request, "go").unwrap_err();
            assert!(matches!(err, SnippetError::IndexLoad { ref version, .. } if version == "beta"));
        }
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_should_reject_unknown_language_before_loading() {
        let loads = Arc::new(AtomicUsize::new(0));
        let generator = SnippetGenerator::new(SnippetConfig::default(), fixture_loader(Arc::clone(&loads)));
        let err = generator
            .snippet_for(&RecordedRequest::new(Method::GET, "/v1.0/me"), "cobol")
            .unwrap_err();
        assert!(matches!(err, SnippetError::UnsupportedLanguage { .. }));
        assert_eq!(loads.load(Ordering::SeqCst), 0);
    }
}
