//! Choosing the schema a request body is built against.

use http::Method;
use serde_json::Value;
use snippetgen_core::naming::{is_plural, singularize};
use snippetgen_model::{
    BodySchema, NodeKind, OperationDescriptor, PathIndex, PathNode, PathSegment, Primitive,
    PropertyDescriptor, SchemaType, TypeKind,
};
use tracing::{debug, warn};

/// Select the body schema for a matched request.
pub(crate) fn select_body_schema(
    index: &dyn PathIndex,
    method: &Method,
    segments: &[PathSegment],
    node: &PathNode,
    parent: Option<&PathNode>,
    operation: &OperationDescriptor,
    body: &[u8],
) -> BodySchema {
    if matches!(segments.last(), Some(PathSegment::Reference)) {
        return if *method == Method::POST {
            BodySchema::Reference { update: false }
        } else if *method == Method::PUT {
            BodySchema::Reference { update: true }
        } else {
            BodySchema::None
        };
    }

    if let Some(request) = &operation.request {
        return BodySchema::Named(request.clone());
    }

    if node.kind == NodeKind::Action {
        return action_body_schema(index, node, parent, body);
    }

    BodySchema::None
}

/// Action bodies are the action's parameters.
///
/// A plural-named action whose only parameter is a collection or entity but
/// received a scalar is matched against sibling actions that declare a
/// primitive parameter of the same name. Without such a sibling the
/// parameter falls back to an untyped value.
fn action_body_schema(
    index: &dyn PathIndex,
    action: &PathNode,
    parent: Option<&PathNode>,
    body: &[u8],
) -> BodySchema {
    let operation = action.segment.clone();
    let [param] = action.parameters.as_slice() else {
        return BodySchema::Parameters {
            operation,
            parameters: action.parameters.clone(),
        };
    };

    let scalar = scalar_argument(body, &param.name);
    let structured = param.schema_type.is_collection() || is_structured(index, &param.schema_type);
    let Some(scalar) = scalar.filter(|_| structured && is_plural(&action.segment)) else {
        return BodySchema::Parameters {
            operation,
            parameters: action.parameters.clone(),
        };
    };

    let wrapper = parent.and_then(|parent| {
        parent.children.iter().find(|sibling| {
            sibling.kind == NodeKind::Action
                && sibling.segment != action.segment
                && sibling
                    .parameters
                    .iter()
                    .any(|p| names_match(&p.name, &param.name) && accepts(&p.schema_type, &scalar))
        })
    });

    if let Some(wrapper) = wrapper {
        debug!(
            action = %action.segment,
            wrapper = %wrapper.segment,
            "typed scalar action body from wrapper action"
        );
        let parameters = wrapper
            .parameters
            .iter()
            .map(|p| {
                if names_match(&p.name, &param.name) {
                    PropertyDescriptor::new(param.name.clone(), p.schema_type.clone())
                } else {
                    p.clone()
                }
            })
            .collect();
        return BodySchema::Parameters {
            operation,
            parameters,
        };
    }

    warn!(
        action = %action.segment,
        parameter = %param.name,
        "no wrapper action matches scalar body; treating parameter as untyped"
    );
    BodySchema::Parameters {
        operation,
        parameters: vec![PropertyDescriptor::new(
            param.name.clone(),
            SchemaType::Primitive(Primitive::Untyped),
        )],
    }
}

fn names_match(candidate: &str, wanted: &str) -> bool {
    candidate.eq_ignore_ascii_case(wanted) || candidate.eq_ignore_ascii_case(&singularize(wanted))
}

fn is_structured(index: &dyn PathIndex, schema_type: &SchemaType) -> bool {
    schema_type
        .named()
        .and_then(|name| index.find_type(name, None))
        .is_some_and(|ty| ty.kind != TypeKind::Enum)
}

/// The JSON scalar sent for `name`, if the body is an object carrying one.
fn scalar_argument(body: &[u8], name: &str) -> Option<Value> {
    let Ok(Value::Object(members)) = serde_json::from_slice::<Value>(body) else {
        return None;
    };
    members
        .into_iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
        .filter(|value| !value.is_object() && !value.is_array() && !value.is_null())
}

/// Whether a primitive parameter type accepts a JSON scalar.
fn accepts(schema_type: &SchemaType, scalar: &Value) -> bool {
    let Some(primitive) = schema_type.primitive().filter(|_| !schema_type.is_collection()) else {
        return false;
    };
    match scalar {
        Value::Bool(_) => primitive == Primitive::Boolean,
        Value::Number(n) if n.is_f64() => matches!(
            primitive,
            Primitive::Double | Primitive::Single | Primitive::Decimal
        ),
        Value::Number(_) => matches!(
            primitive,
            Primitive::Byte
                | Primitive::Int16
                | Primitive::Int32
                | Primitive::Int64
                | Primitive::Double
                | Primitive::Single
                | Primitive::Decimal
        ),
        Value::String(_) => !matches!(
            primitive,
            Primitive::Boolean | Primitive::Untyped | Primitive::Stream
        ),
        _ => false,
    }
}
