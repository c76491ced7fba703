//! Language-neutral property graph built from a request body.

use bytes::Bytes;

/// Name of the implicit map holding members outside the static schema.
pub const ADDITIONAL_DATA: &str = "additionalData";

/// Name of the child carrying an `@odata.id` value.
pub const ODATA_ID: &str = "odataId";

/// Where a type's generated class lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeOrigin {
    /// A schema model type.
    Model,
    /// A type synthesized next to a request builder, e.g. an action body.
    RequestBuilder,
}

/// A type referenced by the graph.
///
/// For [`TypeOrigin::Model`] the namespace is the schema namespace
/// (`microsoft.graph`). For [`TypeOrigin::RequestBuilder`] it is the
/// dot-separated request builder path (`teams.item.sendActivityNotification`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName {
    /// Namespace or builder path.
    pub namespace: String,
    /// Unqualified name as declared, e.g. `message`.
    pub name: String,
    /// Where the type lives.
    pub origin: TypeOrigin,
}

impl TypeName {
    /// A schema model type.
    #[must_use]
    pub fn model(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            origin: TypeOrigin::Model,
        }
    }

    /// A model type from a qualified name such as `microsoft.graph.message`.
    #[must_use]
    pub fn from_qualified(qualified: &str) -> Self {
        let qualified = qualified.trim_start_matches('#');
        match qualified.rsplit_once('.') {
            Some((ns, name)) => Self::model(ns, name),
            None => Self::model("", qualified),
        }
    }

    /// A type synthesized under a request builder path.
    #[must_use]
    pub fn request_builder(builder_path: &[String], name: impl Into<String>) -> Self {
        Self {
            namespace: builder_path.join("."),
            name: name.into(),
            origin: TypeOrigin::RequestBuilder,
        }
    }

    /// Builder path segments, for request builder types.
    #[must_use]
    pub fn builder_path(&self) -> Vec<&str> {
        self.namespace.split('.').filter(|s| !s.is_empty()).collect()
    }
}

/// Bit width of a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberWidth {
    /// 32 bits or fewer.
    W32,
    /// 64 bits.
    W64,
}

/// Integer or floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    /// Integer.
    Int,
    /// Floating point.
    Float,
}

/// Flavour of a temporal literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalKind {
    /// Calendar date.
    Date,
    /// Date and time with offset.
    DateTime,
    /// Time of day.
    TimeOfDay,
    /// ISO 8601 duration.
    Duration,
}

/// Binary payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryData {
    /// Raw bytes from a non-JSON body.
    Raw(Bytes),
    /// Base64 text from a JSON string.
    Base64(String),
}

/// Static type of a value, used for typed empty collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    /// Text.
    String,
    /// Boolean.
    Boolean,
    /// Number.
    Number(NumberWidth, NumberKind),
    /// Guid.
    Guid,
    /// Temporal value.
    Temporal(TemporalKind),
    /// Binary.
    Binary,
    /// Enum type.
    Enum(TypeName),
    /// Object type.
    Object(TypeName),
    /// Anything.
    Untyped,
}

/// A named child of an object or map.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Name as spelled in JSON.
    pub name: String,
    /// Value.
    pub node: PropertyNode,
}

impl Property {
    /// Create a property.
    #[must_use]
    pub fn new(name: impl Into<String>, node: PropertyNode) -> Self {
        Self {
            name: name.into(),
            node,
        }
    }

    /// Whether this child is the implicit additional-data map.
    #[must_use]
    pub fn is_additional_data(&self) -> bool {
        self.name == ADDITIONAL_DATA && matches!(self.node, PropertyNode::Map { .. })
    }
}

/// A node of the request body graph.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyNode {
    /// Text.
    String(String),
    /// Number, kept as written.
    Number {
        /// Literal text.
        raw: String,
        /// Bit width.
        width: NumberWidth,
        /// Integer or float.
        kind: NumberKind,
    },
    /// Boolean.
    Boolean(bool),
    /// Guid text.
    Guid(String),
    /// Temporal text for the renderer to parse.
    DateTime {
        /// Literal text.
        raw: String,
        /// Flavour.
        kind: TemporalKind,
    },
    /// Binary payload.
    Binary(BinaryData),
    /// Enum members.
    Enum {
        /// Enum type.
        type_name: TypeName,
        /// Selected members in declaration order.
        members: Vec<String>,
        /// Whether members combine as flags.
        flags: bool,
    },
    /// JSON null.
    Null,
    /// Typed object construction.
    Object {
        /// Constructed type.
        declared_type: TypeName,
        /// Children in source order; additional data last.
        children: Vec<Property>,
    },
    /// Ordered collection.
    Array {
        /// Declared element type.
        item_type: ValueType,
        /// Elements in source order.
        children: Vec<PropertyNode>,
    },
    /// Free-form key/value data.
    Map {
        /// Entries in source order.
        children: Vec<Property>,
    },
}

impl PropertyNode {
    /// Short kind name, for logs and errors.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Number { .. } => "number",
            Self::Boolean(_) => "boolean",
            Self::Guid(_) => "guid",
            Self::DateTime { .. } => "datetime",
            Self::Binary(_) => "binary",
            Self::Enum { .. } => "enum",
            Self::Null => "null",
            Self::Object { .. } => "object",
            Self::Array { .. } => "array",
            Self::Map { .. } => "map",
        }
    }

    /// Whether this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        !matches!(
            self,
            Self::Object { .. } | Self::Array { .. } | Self::Map { .. }
        )
    }

    /// Every type referenced by this node and its descendants, depth first.
    #[must_use]
    pub fn type_names(&self) -> Vec<&TypeName> {
        let mut names = Vec::new();
        self.collect_type_names(&mut names);
        names
    }

    fn collect_type_names<'a>(&'a self, out: &mut Vec<&'a TypeName>) {
        match self {
            Self::Enum { type_name, .. } => out.push(type_name),
            Self::Object {
                declared_type,
                children,
            } => {
                out.push(declared_type);
                for child in children {
                    child.node.collect_type_names(out);
                }
            }
            Self::Array {
                item_type,
                children,
            } => {
                match item_type {
                    ValueType::Enum(name) | ValueType::Object(name) => out.push(name),
                    _ => {}
                }
                for child in children {
                    child.collect_type_names(out);
                }
            }
            Self::Map { children } => {
                for child in children {
                    child.node.collect_type_names(out);
                }
            }
            Self::String(_)
            | Self::Number { .. }
            | Self::Boolean(_)
            | Self::Guid(_)
            | Self::DateTime { .. }
            | Self::Binary(_)
            | Self::Null => {}
        }
    }

    /// Whether any node in the tree satisfies `predicate`.
    pub fn any(&self, predicate: &impl Fn(&PropertyNode) -> bool) -> bool {
        if predicate(self) {
            return true;
        }
        match self {
            Self::Object { children, .. } | Self::Map { children } => {
                children.iter().any(|c| c.node.any(predicate))
            }
            Self::Array { children, .. } => children.iter().any(|c| c.any(predicate)),
            _ => false,
        }
    }
}

/// Output of the body graph builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyGraph {
    /// Root node; `None` when the request has no body.
    pub root: Option<PropertyNode>,
    /// Top-level body type.
    pub type_name: Option<TypeName>,
}

impl BodyGraph {
    /// Every type referenced by the graph.
    #[must_use]
    pub fn type_names(&self) -> Vec<&TypeName> {
        self.root
            .as_ref()
            .map(PropertyNode::type_names)
            .unwrap_or_default()
    }
}
