//! Schema type descriptors.
//!
//! Type references use the OData spelling found in API descriptions:
//! `Edm.Int64`, `microsoft.graph.recipient` and
//! `Collection(microsoft.graph.recipient)`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Primitive (EDM) types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `Edm.String`.
    String,
    /// `Edm.Boolean`.
    Boolean,
    /// `Edm.Byte` / `Edm.SByte`.
    Byte,
    /// `Edm.Int16`.
    Int16,
    /// `Edm.Int32`.
    Int32,
    /// `Edm.Int64`.
    Int64,
    /// `Edm.Single`.
    Single,
    /// `Edm.Double`.
    Double,
    /// `Edm.Decimal`.
    Decimal,
    /// `Edm.Guid`.
    Guid,
    /// `Edm.Date`.
    Date,
    /// `Edm.DateTimeOffset`.
    DateTimeOffset,
    /// `Edm.TimeOfDay`.
    TimeOfDay,
    /// `Edm.Duration`.
    Duration,
    /// `Edm.Binary`, base64 text in JSON.
    Binary,
    /// `Edm.Stream`.
    Stream,
    /// `Edm.Untyped`, free-form JSON.
    Untyped,
}

impl Primitive {
    /// Parse the part after `Edm.`.
    #[must_use]
    pub fn from_edm(name: &str) -> Option<Self> {
        let primitive = match name {
            "String" => Self::String,
            "Boolean" => Self::Boolean,
            "Byte" | "SByte" => Self::Byte,
            "Int16" => Self::Int16,
            "Int32" => Self::Int32,
            "Int64" => Self::Int64,
            "Single" => Self::Single,
            "Double" => Self::Double,
            "Decimal" => Self::Decimal,
            "Guid" => Self::Guid,
            "Date" => Self::Date,
            "DateTimeOffset" => Self::DateTimeOffset,
            "TimeOfDay" => Self::TimeOfDay,
            "Duration" => Self::Duration,
            "Binary" => Self::Binary,
            "Stream" => Self::Stream,
            "Untyped" => Self::Untyped,
            _ => return None,
        };
        Some(primitive)
    }

    /// The `Edm.` name of this primitive.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Boolean => "Boolean",
            Self::Byte => "Byte",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::Single => "Single",
            Self::Double => "Double",
            Self::Decimal => "Decimal",
            Self::Guid => "Guid",
            Self::Date => "Date",
            Self::DateTimeOffset => "DateTimeOffset",
            Self::TimeOfDay => "TimeOfDay",
            Self::Duration => "Duration",
            Self::Binary => "Binary",
            Self::Stream => "Stream",
            Self::Untyped => "Untyped",
        }
    }
}

/// A reference to a schema type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SchemaType {
    /// An EDM primitive.
    Primitive(Primitive),
    /// A named entity, complex or enum type, fully qualified.
    Named(String),
    /// A collection of another type.
    Collection(Box<SchemaType>),
}

impl SchemaType {
    /// Whether this is a collection type.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }

    /// The element type of a collection, or the type itself.
    #[must_use]
    pub fn element(&self) -> &SchemaType {
        match self {
            Self::Collection(inner) => inner.element(),
            other => other,
        }
    }

    /// The qualified name when this is (a collection of) a named type.
    #[must_use]
    pub fn named(&self) -> Option<&str> {
        match self.element() {
            Self::Named(name) => Some(name),
            _ => None,
        }
    }

    /// The primitive when this is (a collection of) a primitive.
    #[must_use]
    pub fn primitive(&self) -> Option<Primitive> {
        match self.element() {
            Self::Primitive(p) => Some(*p),
            _ => None,
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "Edm.{}", p.as_str()),
            Self::Named(name) => f.write_str(name),
            Self::Collection(inner) => write!(f, "Collection({inner})"),
        }
    }
}

/// Error returned when a schema type reference cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid schema type reference: {0:?}")]
pub struct ParseSchemaTypeError(String);

impl FromStr for SchemaType {
    type Err = ParseSchemaTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(inner) = s
            .strip_prefix("Collection(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return Ok(Self::Collection(Box::new(inner.parse()?)));
        }
        if let Some(edm) = s.strip_prefix("Edm.") {
            return Primitive::from_edm(edm)
                .map(Self::Primitive)
                .ok_or_else(|| ParseSchemaTypeError(s.to_owned()));
        }
        let name = s.trim_start_matches('#');
        let valid = !name.is_empty()
            && name.split('.').all(|part| {
                !part.is_empty() && part.chars().all(|c| c.is_alphanumeric() || c == '_')
            });
        if valid {
            Ok(Self::Named(name.to_owned()))
        } else {
            Err(ParseSchemaTypeError(s.to_owned()))
        }
    }
}

impl TryFrom<String> for SchemaType {
    type Error = ParseSchemaTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SchemaType> for String {
    fn from(value: SchemaType) -> Self {
        value.to_string()
    }
}

/// Kind of a named schema type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeKind {
    /// An entity type with a key.
    #[default]
    Entity,
    /// A complex (value) type.
    Complex,
    /// An enumeration.
    Enum,
}

/// A declared property or operation parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    /// Property name as spelled in JSON.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
}

impl PropertyDescriptor {
    /// Create a descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, schema_type: SchemaType) -> Self {
        Self {
            name: name.into(),
            schema_type,
        }
    }
}

/// A named schema type: entity, complex or enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    /// Fully qualified name, e.g. `microsoft.graph.message`.
    pub name: String,
    /// Kind of type.
    #[serde(default)]
    pub kind: TypeKind,
    /// Qualified base type name, if any.
    #[serde(default)]
    pub base_type: Option<String>,
    /// Declared properties, excluding inherited ones.
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
    /// Enum members in declaration order.
    #[serde(default)]
    pub members: Vec<String>,
    /// Whether enum members combine as flags.
    #[serde(default)]
    pub flags: bool,
}

impl TypeDescriptor {
    /// Namespace part of the qualified name.
    #[must_use]
    pub fn namespace(&self) -> &str {
        snippetgen_core::naming::type_namespace(&self.name).unwrap_or_default()
    }

    /// Short name, e.g. `message`.
    #[must_use]
    pub fn short_name(&self) -> &str {
        snippetgen_core::naming::short_type_name(&self.name)
    }

    /// Whether this is an enum type.
    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }

    /// Look up a property declared directly on this type.
    #[must_use]
    pub fn own_property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }
}
