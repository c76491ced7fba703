//! Core configuration, error taxonomy and shared state for snippetgen.
//!
//! This crate provides the building blocks shared by every stage of the
//! snippet pipeline: the [`SnippetConfig`] settings, the [`SnippetError`]
//! taxonomy surfaced to callers, the exactly-once [`IndexCache`] used to hold
//! per-version path indexes, and the casing helpers in [`naming`].

mod cache;
mod config;
mod error;
pub mod naming;

pub use cache::IndexCache;
pub use config::SnippetConfig;
pub use error::{SnippetError, SnippetResult};
