//! Path tree nodes and operation descriptors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::{PropertyDescriptor, SchemaType};

/// What a path template segment represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    /// A navigation or collection name.
    #[default]
    Literal,
    /// A `{key}` placeholder.
    Parameter,
    /// A bound action, invoked with a body.
    Action,
    /// A bound function, invoked with URL arguments.
    Function,
}

/// An operation declared for one HTTP method on a path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDescriptor {
    /// Operation identifier, if the description names one.
    #[serde(default)]
    pub operation_id: Option<String>,
    /// Declared request body type.
    #[serde(default)]
    pub request: Option<SchemaType>,
    /// Declared response type.
    #[serde(default)]
    pub response: Option<SchemaType>,
    /// Declared (non-system) query parameters.
    #[serde(default)]
    pub query_parameters: Vec<PropertyDescriptor>,
}

impl OperationDescriptor {
    /// Look up a declared query parameter, case-insensitively.
    #[must_use]
    pub fn query_parameter(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.query_parameters
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

/// One node in the path tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathNode {
    /// Template segment, e.g. `messages` or `{message-id}`.
    pub segment: String,
    /// What the segment represents.
    pub kind: NodeKind,
    /// Action body parameters or function arguments, in declared order.
    pub parameters: Vec<PropertyDescriptor>,
    /// Alternate key names a collection accepts, e.g. `userPrincipalName`.
    pub alternate_keys: Vec<String>,
    /// Operations keyed by lowercase HTTP method.
    pub operations: BTreeMap<String, OperationDescriptor>,
    /// Child nodes in declaration order.
    pub children: Vec<PathNode>,
}

impl PathNode {
    /// Create a node for a template segment, inferring parameter placeholders.
    #[must_use]
    pub fn new(segment: impl Into<String>) -> Self {
        let segment = segment.into();
        let kind = if segment.starts_with('{') && segment.ends_with('}') {
            NodeKind::Parameter
        } else {
            NodeKind::Literal
        };
        Self {
            segment,
            kind,
            ..Self::default()
        }
    }

    /// Placeholder name without braces, for parameter nodes.
    #[must_use]
    pub fn parameter_name(&self) -> Option<&str> {
        if self.kind == NodeKind::Parameter {
            self.segment
                .strip_prefix('{')
                .and_then(|s| s.strip_suffix('}'))
        } else {
            None
        }
    }

    /// Whether this node is a `{key}` placeholder.
    #[must_use]
    pub fn is_parameter(&self) -> bool {
        self.kind == NodeKind::Parameter
    }

    /// Child whose segment equals `segment` exactly.
    #[must_use]
    pub fn child(&self, segment: &str) -> Option<&PathNode> {
        self.children
            .iter()
            .find(|c| !c.is_parameter() && c.segment == segment)
    }

    /// Child whose segment equals `segment` ignoring ASCII case.
    #[must_use]
    pub fn child_ignore_case(&self, segment: &str) -> Option<&PathNode> {
        self.children
            .iter()
            .find(|c| !c.is_parameter() && c.segment.eq_ignore_ascii_case(segment))
    }

    /// The `{key}` placeholder child, if any.
    #[must_use]
    pub fn parameter_child(&self) -> Option<&PathNode> {
        self.children.iter().find(|c| c.is_parameter())
    }

    /// Operation declared for `method`.
    #[must_use]
    pub fn operation(&self, method: &http::Method) -> Option<&OperationDescriptor> {
        self.operations
            .get(method.as_str().to_ascii_lowercase().as_str())
    }

    /// Whether this collection declares `key` as an alternate key.
    #[must_use]
    pub fn has_alternate_key(&self, key: &str) -> bool {
        self.alternate_keys
            .iter()
            .any(|k| k.eq_ignore_ascii_case(key))
    }

    /// Mutable child with segment `segment`, created when missing.
    pub(crate) fn child_mut_or_insert(&mut self, segment: &str) -> &mut PathNode {
        let position = self.children.iter().position(|c| c.segment == segment);
        match position {
            Some(i) => &mut self.children[i],
            None => {
                self.children.push(PathNode::new(segment));
                let last = self.children.len() - 1;
                &mut self.children[last]
            }
        }
    }
}
