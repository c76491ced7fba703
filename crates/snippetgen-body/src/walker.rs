//! Schema-driven walk from JSON to [`PropertyNode`].

use std::fmt::Display;

use serde_json::{Map, Number, Value};
use snippetgen_core::{SnippetError, SnippetResult};
use snippetgen_model::{
    ADDITIONAL_DATA, BinaryData, NumberKind, NumberWidth, ODATA_ID, PathIndex, Primitive,
    Property, PropertyDescriptor, PropertyNode, SchemaType, TemporalKind, TypeDescriptor, TypeName,
    ValueType,
};
use tracing::warn;

use crate::annotations::{Annotated, Member, separate};

/// Walks JSON values against schema types.
pub(crate) struct Walker<'a> {
    pub index: &'a dyn PathIndex,
    pub max_depth: usize,
    pub content_type: String,
}

/// Declared type lookup for the members of one object.
type Lookup<'l> = dyn Fn(&str) -> Option<SchemaType> + 'l;

impl Walker<'_> {
    /// Walk `value` as an instance of `schema`.
    pub fn typed(
        &self,
        value: Value,
        schema: &SchemaType,
        near_namespace: Option<&str>,
        path: &str,
        depth: usize,
    ) -> SnippetResult<PropertyNode> {
        self.check_depth(depth)?;
        if value.is_null() {
            return Ok(PropertyNode::Null);
        }
        match schema {
            SchemaType::Collection(inner) => {
                let Value::Array(items) = value else {
                    return Err(mismatch(path, schema, &value));
                };
                let children = items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| {
                        self.typed(item, inner, near_namespace, &format!("{path}[{i}]"), depth + 1)
                    })
                    .collect::<SnippetResult<Vec<_>>>()?;
                Ok(PropertyNode::Array {
                    item_type: self.value_type(inner, near_namespace),
                    children,
                })
            }
            SchemaType::Primitive(primitive) => self.primitive(value, *primitive, path, depth),
            SchemaType::Named(name) => match self.index.find_type(name, near_namespace) {
                Some(ty) if ty.is_enum() => match value {
                    Value::String(raw) => Ok(enum_node(&raw, ty)),
                    other => Err(mismatch(path, schema, &other)),
                },
                Some(ty) => match value {
                    Value::Object(map) => self.object(separate(map), ty, path, depth),
                    other => Err(mismatch(path, schema, &other)),
                },
                None => {
                    warn!(schema_type = %name, path, "unknown schema type; inferring value");
                    match value {
                        Value::Object(map) => {
                            let children = self.assemble(
                                separate(map).members,
                                &|_| Some(SchemaType::Primitive(Primitive::Untyped)),
                                near_namespace,
                                path,
                                depth,
                            )?;
                            Ok(PropertyNode::Object {
                                declared_type: TypeName::from_qualified(name),
                                children,
                            })
                        }
                        other => self.infer(other, path, depth),
                    }
                }
            },
        }
    }

    /// Build an object of `declared`, honouring an `@odata.type` override.
    pub fn object(
        &self,
        annotated: Annotated,
        declared: &TypeDescriptor,
        path: &str,
        depth: usize,
    ) -> SnippetResult<PropertyNode> {
        let ty = match annotated.odata_type.as_deref() {
            Some(derived) => match self.index.find_type(derived, Some(declared.namespace())) {
                Some(found) => {
                    if !self.index.is_derived_from(found, &declared.name) {
                        warn!(
                            derived = %found.name,
                            declared = %declared.name,
                            path,
                            "@odata.type does not derive from the declared type"
                        );
                    }
                    found
                }
                None => {
                    warn!(
                        derived,
                        declared = %declared.name,
                        path,
                        "unknown @odata.type; using declared type"
                    );
                    declared
                }
            },
            None => declared,
        };

        let lookup = |name: &str| {
            self.index
                .find_property(ty, name)
                .map(|p| p.schema_type.clone())
        };
        let children = self.assemble(annotated.members, &lookup, Some(ty.namespace()), path, depth)?;
        Ok(PropertyNode::Object {
            declared_type: TypeName::from_qualified(&ty.name),
            children,
        })
    }

    /// Build a synthesized object whose members are `parameters`.
    pub fn parameters(
        &self,
        map: Map<String, Value>,
        declared_type: TypeName,
        parameters: &[PropertyDescriptor],
        path: &str,
        depth: usize,
    ) -> SnippetResult<PropertyNode> {
        let lookup = |name: &str| {
            parameters
                .iter()
                .find(|p| p.name == name)
                .or_else(|| parameters.iter().find(|p| p.name.eq_ignore_ascii_case(name)))
                .map(|p| p.schema_type.clone())
        };
        let children = self.assemble(separate(map).members, &lookup, None, path, depth)?;
        Ok(PropertyNode::Object {
            declared_type,
            children,
        })
    }

    /// Build an object with no declared members: every member is inferred
    /// as a field.
    pub fn untyped_object(
        &self,
        map: Map<String, Value>,
        declared_type: TypeName,
        path: &str,
        depth: usize,
    ) -> SnippetResult<PropertyNode> {
        let children = self.assemble(
            separate(map).members,
            &|_| Some(SchemaType::Primitive(Primitive::Untyped)),
            None,
            path,
            depth,
        )?;
        Ok(PropertyNode::Object {
            declared_type,
            children,
        })
    }

    /// Build a reference body: the odata id plus additional data.
    pub fn reference(
        &self,
        map: Map<String, Value>,
        declared_type: TypeName,
        path: &str,
    ) -> SnippetResult<PropertyNode> {
        let children = self.assemble(separate(map).members, &|_| None, None, path, 0)?;
        Ok(PropertyNode::Object {
            declared_type,
            children,
        })
    }

    /// Turn pre-passed members into children, additional data last.
    fn assemble(
        &self,
        members: Vec<Member>,
        lookup: &Lookup<'_>,
        near_namespace: Option<&str>,
        path: &str,
        depth: usize,
    ) -> SnippetResult<Vec<Property>> {
        let mut children = Vec::new();
        let mut additional = Vec::new();
        for member in members {
            match member {
                Member::ODataId(id) => {
                    children.push(Property::new(ODATA_ID, PropertyNode::String(id)));
                }
                Member::Bind(name, value) => {
                    let node = self.infer(value, &child_path(path, &name), depth + 1)?;
                    additional.push(Property::new(name, node));
                }
                Member::Property(name, value) => {
                    let child = child_path(path, &name);
                    if let Some(schema) = lookup(&name) {
                        let node = self.typed(value, &schema, near_namespace, &child, depth + 1)?;
                        children.push(Property::new(name, node));
                    } else {
                        let node = self.infer(value, &child, depth + 1)?;
                        additional.push(Property::new(name, node));
                    }
                }
            }
        }
        if !additional.is_empty() {
            children.push(Property::new(
                ADDITIONAL_DATA,
                PropertyNode::Map {
                    children: additional,
                },
            ));
        }
        Ok(children)
    }

    /// Infer a node from JSON alone.
    pub fn infer(&self, value: Value, path: &str, depth: usize) -> SnippetResult<PropertyNode> {
        self.check_depth(depth)?;
        match value {
            Value::Null => Ok(PropertyNode::Null),
            Value::Bool(b) => Ok(PropertyNode::Boolean(b)),
            Value::Number(n) => Ok(infer_number(&n)),
            Value::String(s) => Ok(PropertyNode::String(s)),
            Value::Array(items) => {
                let children = items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| self.infer(item, &format!("{path}[{i}]"), depth + 1))
                    .collect::<SnippetResult<Vec<_>>>()?;
                Ok(PropertyNode::Array {
                    item_type: common_value_type(&children),
                    children,
                })
            }
            Value::Object(map) => {
                let annotated = separate(map);
                let derived = annotated
                    .odata_type
                    .as_deref()
                    .and_then(|name| self.index.find_type(name, None))
                    .filter(|ty| !ty.is_enum());
                if let Some(ty) = derived {
                    return self.object(annotated, ty, path, depth);
                }
                let children = annotated
                    .members
                    .into_iter()
                    .map(|member| match member {
                        Member::ODataId(id) => Ok(Property::new(ODATA_ID, PropertyNode::String(id))),
                        Member::Property(name, value) | Member::Bind(name, value) => {
                            let node = self.infer(value, &child_path(path, &name), depth + 1)?;
                            Ok(Property::new(name, node))
                        }
                    })
                    .collect::<SnippetResult<Vec<_>>>()?;
                Ok(PropertyNode::Map { children })
            }
        }
    }

    fn primitive(
        &self,
        value: Value,
        primitive: Primitive,
        path: &str,
        depth: usize,
    ) -> SnippetResult<PropertyNode> {
        let expected = || format!("Edm.{}", primitive.as_str());
        match primitive {
            Primitive::Untyped => self.infer(value, path, depth),
            Primitive::String => match value {
                Value::String(s) => Ok(PropertyNode::String(s)),
                Value::Number(n) => Ok(PropertyNode::String(n.to_string())),
                Value::Bool(b) => Ok(PropertyNode::String(b.to_string())),
                other => Err(mismatch(path, expected(), &other)),
            },
            Primitive::Boolean => match value {
                Value::Bool(b) => Ok(PropertyNode::Boolean(b)),
                Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(PropertyNode::Boolean(true)),
                Value::String(s) if s.eq_ignore_ascii_case("false") => {
                    Ok(PropertyNode::Boolean(false))
                }
                other => Err(mismatch(path, expected(), &other)),
            },
            Primitive::Byte | Primitive::Int16 | Primitive::Int32 => {
                number(value, NumberWidth::W32, NumberKind::Int, path, &expected())
            }
            Primitive::Int64 => number(value, NumberWidth::W64, NumberKind::Int, path, &expected()),
            Primitive::Single => number(value, NumberWidth::W32, NumberKind::Float, path, &expected()),
            Primitive::Double | Primitive::Decimal => {
                number(value, NumberWidth::W64, NumberKind::Float, path, &expected())
            }
            Primitive::Guid => match value {
                Value::String(s) => Ok(guid(s, path)),
                other => Err(mismatch(path, expected(), &other)),
            },
            Primitive::Date => temporal(value, TemporalKind::Date, path, &expected()),
            Primitive::DateTimeOffset => temporal(value, TemporalKind::DateTime, path, &expected()),
            Primitive::TimeOfDay => temporal(value, TemporalKind::TimeOfDay, path, &expected()),
            Primitive::Duration => temporal(value, TemporalKind::Duration, path, &expected()),
            Primitive::Binary | Primitive::Stream => match value {
                Value::String(s) => Ok(PropertyNode::Binary(BinaryData::Base64(s))),
                other => Err(mismatch(path, expected(), &other)),
            },
        }
    }

    /// Static type of values of `schema`.
    pub fn value_type(&self, schema: &SchemaType, near_namespace: Option<&str>) -> ValueType {
        match schema {
            SchemaType::Collection(_) => ValueType::Untyped,
            SchemaType::Primitive(p) => primitive_value_type(*p),
            SchemaType::Named(name) => match self.index.find_type(name, near_namespace) {
                Some(ty) if ty.is_enum() => ValueType::Enum(TypeName::from_qualified(&ty.name)),
                Some(ty) => ValueType::Object(TypeName::from_qualified(&ty.name)),
                None => ValueType::Object(TypeName::from_qualified(name)),
            },
        }
    }

    fn check_depth(&self, depth: usize) -> SnippetResult<()> {
        if depth > self.max_depth {
            return Err(SnippetError::MalformedBody {
                content_type: self.content_type.clone(),
                reason: format!("nesting exceeds the maximum depth of {}", self.max_depth),
            });
        }
        Ok(())
    }
}

fn child_path(path: &str, name: &str) -> String {
    format!("{path}.{name}")
}

/// Name of a JSON value's kind, for mismatch errors.
fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(path: &str, expected: impl Display, found: &Value) -> SnippetError {
    SnippetError::schema_mismatch(path, expected.to_string(), json_kind(found))
}

fn number(
    value: Value,
    width: NumberWidth,
    kind: NumberKind,
    path: &str,
    expected: &str,
) -> SnippetResult<PropertyNode> {
    let raw = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.trim().parse::<f64>().is_ok() => s.trim().to_owned(),
        other => return Err(mismatch(path, expected, &other)),
    };
    let kind = if kind == NumberKind::Int && raw.parse::<i64>().is_err() {
        warn!(path, value = %raw, "non-integer value for an integer property");
        NumberKind::Float
    } else {
        kind
    };
    Ok(PropertyNode::Number { raw, width, kind })
}

fn temporal(
    value: Value,
    kind: TemporalKind,
    path: &str,
    expected: &str,
) -> SnippetResult<PropertyNode> {
    match value {
        Value::String(raw) => Ok(PropertyNode::DateTime { raw, kind }),
        other => Err(mismatch(path, expected, &other)),
    }
}

fn guid(raw: String, path: &str) -> PropertyNode {
    if uuid::Uuid::parse_str(&raw).is_ok() {
        PropertyNode::Guid(raw)
    } else {
        warn!(path, value = %raw, "invalid guid; keeping it as text");
        PropertyNode::String(raw)
    }
}

fn infer_number(n: &Number) -> PropertyNode {
    let (width, kind) = if let Some(i) = n.as_i64() {
        let width = if i32::try_from(i).is_ok() {
            NumberWidth::W32
        } else {
            NumberWidth::W64
        };
        (width, NumberKind::Int)
    } else if n.is_u64() {
        (NumberWidth::W64, NumberKind::Int)
    } else {
        (NumberWidth::W64, NumberKind::Float)
    };
    PropertyNode::Number {
        raw: n.to_string(),
        width,
        kind,
    }
}

/// Select the members of an enum value.
///
/// Tokens split on space, comma or pipe and match case-insensitively. Flag
/// enums keep every match in declaration order; single-valued enums keep the
/// first recognized token. With no match the first declared member is used.
fn enum_node(raw: &str, ty: &TypeDescriptor) -> PropertyNode {
    let tokens: Vec<&str> = raw
        .split([' ', ',', '|'])
        .filter(|t| !t.is_empty())
        .collect();
    let mut members: Vec<String> = if ty.flags {
        ty.members
            .iter()
            .filter(|m| tokens.iter().any(|t| t.eq_ignore_ascii_case(m)))
            .cloned()
            .collect()
    } else {
        tokens
            .iter()
            .find_map(|t| ty.members.iter().find(|m| m.eq_ignore_ascii_case(t)))
            .cloned()
            .into_iter()
            .collect()
    };
    if members.is_empty() {
        warn!(enum_type = %ty.name, value = raw, "no enum member recognized; using the first declared member");
        members.extend(ty.members.first().cloned());
    }
    PropertyNode::Enum {
        type_name: TypeName::from_qualified(&ty.name),
        members,
        flags: ty.flags,
    }
}

fn primitive_value_type(primitive: Primitive) -> ValueType {
    match primitive {
        Primitive::String => ValueType::String,
        Primitive::Boolean => ValueType::Boolean,
        Primitive::Byte | Primitive::Int16 | Primitive::Int32 => {
            ValueType::Number(NumberWidth::W32, NumberKind::Int)
        }
        Primitive::Int64 => ValueType::Number(NumberWidth::W64, NumberKind::Int),
        Primitive::Single => ValueType::Number(NumberWidth::W32, NumberKind::Float),
        Primitive::Double | Primitive::Decimal => {
            ValueType::Number(NumberWidth::W64, NumberKind::Float)
        }
        Primitive::Guid => ValueType::Guid,
        Primitive::Date => ValueType::Temporal(TemporalKind::Date),
        Primitive::DateTimeOffset => ValueType::Temporal(TemporalKind::DateTime),
        Primitive::TimeOfDay => ValueType::Temporal(TemporalKind::TimeOfDay),
        Primitive::Duration => ValueType::Temporal(TemporalKind::Duration),
        Primitive::Binary | Primitive::Stream => ValueType::Binary,
        Primitive::Untyped => ValueType::Untyped,
    }
}

/// Static type of an inferred node, `Untyped` for containers and null.
fn node_value_type(node: &PropertyNode) -> ValueType {
    match node {
        PropertyNode::String(_) => ValueType::String,
        PropertyNode::Boolean(_) => ValueType::Boolean,
        PropertyNode::Number { width, kind, .. } => ValueType::Number(*width, *kind),
        PropertyNode::Guid(_) => ValueType::Guid,
        PropertyNode::DateTime { kind, .. } => ValueType::Temporal(*kind),
        PropertyNode::Binary(_) => ValueType::Binary,
        PropertyNode::Enum { type_name, .. } => ValueType::Enum(type_name.clone()),
        PropertyNode::Object { declared_type, .. } => ValueType::Object(declared_type.clone()),
        PropertyNode::Null | PropertyNode::Array { .. } | PropertyNode::Map { .. } => {
            ValueType::Untyped
        }
    }
}

fn common_value_type(children: &[PropertyNode]) -> ValueType {
    let mut types = children.iter().map(node_value_type);
    let Some(first) = types.next() else {
        return ValueType::Untyped;
    };
    if types.all(|t| t == first) {
        first
    } else {
        ValueType::Untyped
    }
}
