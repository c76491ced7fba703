//! Snippet rendering for snippetgen.
//!
//! A single generic walker turns a [`ResolvedRequest`] and its [`BodyGraph`]
//! into source text. Languages are [`LanguageProfile`] records; adding one
//! means writing a profile and a [`LanguageSyntax`], never touching the
//! walker. Imports are computed by the [`imports::ImportResolver`] from the
//! same names the walker emits.

mod engine;
pub mod imports;
pub mod languages;
pub mod literal;
pub mod naming;
pub mod profile;

use snippetgen_core::{SnippetConfig, SnippetResult};
use snippetgen_model::{BodyGraph, ResolvedRequest};
use tracing::debug;

pub use imports::{Import, ImportGroup, ImportResolver};
pub use languages::{LANGUAGES, find_language, supported_languages};
pub use profile::{
    ConstructionStyle, LanguageProfile, LanguageSyntax, RenderContext, ReservedEscape, SdkLayout,
};

/// Renders resolved requests into snippets.
#[derive(Debug, Clone, Default)]
pub struct SnippetRenderer {
    config: SnippetConfig,
}

impl SnippetRenderer {
    /// Create a renderer with the given configuration.
    #[must_use]
    pub fn new(config: SnippetConfig) -> Self {
        Self { config }
    }

    /// Render `request` as a `language` snippet.
    ///
    /// # Errors
    ///
    /// Returns [`snippetgen_core::SnippetError::UnsupportedLanguage`] for
    /// unknown languages.
    pub fn render(
        &self,
        request: &ResolvedRequest,
        graph: &BodyGraph,
        language: &str,
    ) -> SnippetResult<String> {
        let profile = find_language(language)?;
        debug!(
            language = profile.id,
            method = %request.method,
            path = %request.path,
            "rendering snippet"
        );
        engine::render(profile, request, graph, &self.config)
    }
}
