//! End-to-end tests for snippetgen.
//!
//! Every test drives a [`SnippetGenerator`] backed by the bundled fixture
//! index, from a recorded request to finished snippet text.
//!
//! ```text
//! cargo test -p snippetgen-integration
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use http::Method;
use snippetgen::SnippetGenerator;
use snippetgen_core::{SnippetConfig, SnippetResult};
use snippetgen_model::fixtures::graph_index;
use snippetgen_model::{PathIndex, RecordedRequest};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// A generator serving the fixture index for `v1.0` and `beta`, counting
/// loads in `loads`.
#[must_use]
pub fn counting_generator(config: SnippetConfig, loads: Arc<AtomicUsize>) -> SnippetGenerator {
    init_tracing();
    SnippetGenerator::new(
        config,
        move |version: &str| -> anyhow::Result<Arc<dyn PathIndex>> {
            loads.fetch_add(1, Ordering::SeqCst);
            tracing::debug!(version, "loading fixture index");
            anyhow::ensure!(
                matches!(version, "v1.0" | "beta"),
                "no fixture index for {version}"
            );
            Ok(Arc::new(graph_index()))
        },
    )
}

/// A generator with the default configuration.
#[must_use]
pub fn generator() -> SnippetGenerator {
    counting_generator(SnippetConfig::default(), Arc::default())
}

/// A bodiless request.
#[must_use]
pub fn request(method: Method, url: &str) -> RecordedRequest {
    RecordedRequest::new(method, url)
}

/// A request with a JSON body.
#[must_use]
pub fn json_request(method: Method, url: &str, body: &str) -> RecordedRequest {
    RecordedRequest::new(method, url)
        .with_header("Content-Type", "application/json")
        .with_body(body.to_owned())
}

/// Render `request` as a `language` snippet with the default generator.
pub fn snippet(request: &RecordedRequest, language: &str) -> SnippetResult<String> {
    generator().snippet_for(request, language)
}

mod test_body;
mod test_concurrency;
mod test_error;
mod test_navigation;
mod test_query;
