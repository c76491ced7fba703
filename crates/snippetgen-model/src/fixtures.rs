//! A small Graph-shaped index for tests.

use crate::index::StaticPathIndex;

const GRAPH_INDEX: &str = include_str!("../fixtures/graph-index.json");

/// Load the bundled fixture index.
///
/// # Panics
///
/// Panics if the bundled document is malformed.
#[must_use]
pub fn graph_index() -> StaticPathIndex {
    StaticPathIndex::from_json(GRAPH_INDEX).expect("bundled fixture index is valid JSON")
}
