//! Path index loading.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use snippetgen_model::{PathIndex, StaticPathIndex};
use tracing::info;

/// Supplies the path index of an API version.
///
/// Loaders are called at most once per version by
/// [`crate::SnippetGenerator`]; a failed load is retried on the next request.
pub trait IndexLoader: Send + Sync {
    /// Load the index for `api_version`.
    fn load(&self, api_version: &str) -> Result<Arc<dyn PathIndex>>;
}

impl<F> IndexLoader for F
where
    F: Fn(&str) -> Result<Arc<dyn PathIndex>> + Send + Sync,
{
    fn load(&self, api_version: &str) -> Result<Arc<dyn PathIndex>> {
        self(api_version)
    }
}

/// Loads [`StaticPathIndex`] documents, from memory or from
/// `{dir}/{version}.json`.
#[derive(Debug, Clone, Default)]
pub struct StaticIndexLoader {
    documents: HashMap<String, String>,
    dir: Option<PathBuf>,
}

impl StaticIndexLoader {
    /// A loader with no documents.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `json` for `api_version`.
    #[must_use]
    pub fn with_document(mut self, api_version: impl Into<String>, json: impl Into<String>) -> Self {
        self.documents.insert(api_version.into(), json.into());
        self
    }

    /// Read versions without an in-memory document from `dir`.
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }
}

impl IndexLoader for StaticIndexLoader {
    fn load(&self, api_version: &str) -> Result<Arc<dyn PathIndex>> {
        let json = match (self.documents.get(api_version), &self.dir) {
            (Some(json), _) => json.clone(),
            (None, Some(dir)) => {
                let path = dir.join(format!("{api_version}.json"));
                std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?
            }
            (None, None) => anyhow::bail!("no index document for {api_version}"),
        };
        let index = StaticPathIndex::from_json(&json)
            .with_context(|| format!("invalid index document for {api_version}"))?;
        info!(api_version, types = index.type_count(), "loaded path index");
        Ok(Arc::new(index))
    }
}
