//! Tracing setup for binaries embedding the generator.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Install a global `fmt` subscriber.
///
/// Uses `RUST_LOG` if set, otherwise `log_level` (usually
/// [`snippetgen_core::SnippetConfig::log_level`]).
pub fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_install_subscriber_only_once() {
        let _ = init_tracing("debug");
        assert!(init_tracing("info").is_err());
    }
}
