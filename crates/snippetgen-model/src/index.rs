//! The path index contract and an in-memory implementation.
//!
//! [`PathIndex`] is the lookup service the resolver and body builder consume:
//! a navigable tree of path templates plus a type lookup. [`StaticPathIndex`]
//! builds both from a compact JSON document.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use http::Method;
use serde::Deserialize;

use crate::path::{NodeKind, OperationDescriptor, PathNode};
use crate::schema::{PropertyDescriptor, SchemaType, TypeDescriptor};

/// Upper bound on inheritance chains walked when looking up properties.
const MAX_INHERITANCE_DEPTH: usize = 64;

/// Result of matching a path template against the index.
#[derive(Debug, Clone)]
pub struct PathMatch<'a> {
    /// Matched nodes, root excluded, in path order.
    pub nodes: Vec<&'a PathNode>,
    /// Operation declared for the requested method, if any.
    pub operation: Option<&'a OperationDescriptor>,
}

impl PathMatch<'_> {
    /// Declared request body type.
    #[must_use]
    pub fn request_schema(&self) -> Option<&SchemaType> {
        self.operation.and_then(|op| op.request.as_ref())
    }

    /// Declared response type.
    #[must_use]
    pub fn response_schema(&self) -> Option<&SchemaType> {
        self.operation.and_then(|op| op.response.as_ref())
    }
}

/// Lookup service over an API's paths and schema types.
pub trait PathIndex: Send + Sync + fmt::Debug {
    /// Root of the path tree. Its own segment is empty.
    fn root(&self) -> &PathNode;

    /// Describe a type by qualified name, case-insensitively.
    fn describe_type(&self, name: &str) -> Option<&TypeDescriptor>;

    /// Root schema namespace, e.g. `microsoft.graph`.
    fn namespace(&self) -> &str;

    /// Walk a path template segment by segment.
    ///
    /// Segments match literally, then ignoring case, then against a `{key}`
    /// placeholder. Returns `None` when any segment has no match.
    fn resolve(&self, method: &Method, path: &str) -> Option<PathMatch<'_>> {
        let mut node = self.root();
        let mut nodes = Vec::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let parent = node;
            node = parent
                .child(segment)
                .or_else(|| parent.child_ignore_case(segment))
                .or_else(|| parent.parameter_child())?;
            nodes.push(node);
        }
        Some(PathMatch {
            nodes,
            operation: node.operation(method),
        })
    }

    /// Find a type by short or qualified name.
    ///
    /// Short names are tried in `near_namespace`, then each parent namespace,
    /// then the root namespace.
    fn find_type(&self, name: &str, near_namespace: Option<&str>) -> Option<&TypeDescriptor> {
        let name = name.trim_start_matches('#');
        if let Some(ty) = self.describe_type(name) {
            return Some(ty);
        }
        let short = snippetgen_core::naming::short_type_name(name);
        let mut namespace = near_namespace;
        while let Some(ns) = namespace {
            if let Some(ty) = self.describe_type(&format!("{ns}.{short}")) {
                return Some(ty);
            }
            namespace = snippetgen_core::naming::type_namespace(ns);
        }
        self.describe_type(&format!("{}.{short}", self.namespace()))
    }

    /// Find a property on `ty` or any of its base types.
    fn find_property<'a>(
        &'a self,
        ty: &'a TypeDescriptor,
        name: &str,
    ) -> Option<&'a PropertyDescriptor> {
        let mut current = Some(ty);
        for _ in 0..MAX_INHERITANCE_DEPTH {
            let t = current?;
            if let Some(prop) = t.own_property(name) {
                return Some(prop);
            }
            current = t
                .base_type
                .as_deref()
                .and_then(|base| self.find_type(base, Some(t.namespace())));
        }
        None
    }

    /// Whether `derived` is `base` or inherits from it.
    fn is_derived_from(&self, derived: &TypeDescriptor, base: &str) -> bool {
        let mut current = Some(derived);
        for _ in 0..MAX_INHERITANCE_DEPTH {
            let Some(t) = current else {
                return false;
            };
            if t.name.eq_ignore_ascii_case(base) {
                return true;
            }
            current = t
                .base_type
                .as_deref()
                .and_then(|b| self.find_type(b, Some(t.namespace())));
        }
        false
    }
}

/// A path entry in an index document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathEntry {
    /// Path template, e.g. `/me/messages/{message-id}`.
    pub path: String,
    /// Kind of the last segment; inferred when absent.
    #[serde(default)]
    pub kind: Option<NodeKind>,
    /// Action or function parameters.
    #[serde(default)]
    pub parameters: Vec<PropertyDescriptor>,
    /// Alternate keys accepted by the collection.
    #[serde(default)]
    pub alternate_keys: Vec<String>,
    /// Operations keyed by HTTP method.
    #[serde(default)]
    pub operations: BTreeMap<String, OperationDescriptor>,
}

/// A serialized path index.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDocument {
    /// Root schema namespace.
    pub namespace: String,
    /// Named types.
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
    /// Path templates.
    #[serde(default)]
    pub paths: Vec<PathEntry>,
}

/// In-memory [`PathIndex`] built from an [`IndexDocument`].
#[derive(Debug, Clone)]
pub struct StaticPathIndex {
    namespace: String,
    root: PathNode,
    types: HashMap<String, TypeDescriptor>,
}

impl StaticPathIndex {
    /// Parse an index document from JSON.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the document does not deserialize.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let document: IndexDocument = serde_json::from_str(json)?;
        Ok(Self::from_document(document))
    }

    /// Build the path tree and type table from a document.
    #[must_use]
    pub fn from_document(document: IndexDocument) -> Self {
        let mut root = PathNode::new("");
        for entry in document.paths {
            let mut node = &mut root;
            for segment in entry.path.split('/').filter(|s| !s.is_empty()) {
                node = node.child_mut_or_insert(segment);
            }
            if let Some(kind) = entry.kind {
                node.kind = kind;
            }
            node.parameters.extend(entry.parameters);
            node.alternate_keys.extend(entry.alternate_keys);
            for (method, operation) in entry.operations {
                node.operations.insert(method.to_ascii_lowercase(), operation);
            }
        }

        let types = document
            .types
            .into_iter()
            .map(|ty| (ty.name.to_ascii_lowercase(), ty))
            .collect::<HashMap<_, _>>();

        tracing::debug!(
            namespace = %document.namespace,
            types = types.len(),
            "built static path index"
        );

        Self {
            namespace: document.namespace,
            root,
            types,
        }
    }

    /// Number of named types.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}

impl PathIndex for StaticPathIndex {
    fn root(&self) -> &PathNode {
        &self.root
    }

    fn describe_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(&name.trim_start_matches('#').to_ascii_lowercase())
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }
}
