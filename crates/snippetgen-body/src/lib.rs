//! Request body to typed property graph.
//!
//! [`BodyGraphBuilder`] classifies the body by content type and walks JSON
//! payloads against the schema the resolver selected, producing a
//! [`BodyGraph`] that renderers consume without looking at JSON again.

mod annotations;
mod content;
mod walker;

use serde_json::Value;
use snippetgen_core::naming::to_pascal_case;
use snippetgen_core::{SnippetConfig, SnippetError, SnippetResult};
use snippetgen_model::{
    BinaryData, BodyGraph, BodySchema, PathIndex, Primitive, PropertyNode, ResolvedRequest,
    SchemaType, TypeName,
};
use tracing::debug;

use crate::content::{BodyContent, classify};
use crate::walker::Walker;

const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Builds [`BodyGraph`]s from resolved requests.
#[derive(Debug, Clone, Default)]
pub struct BodyGraphBuilder {
    config: SnippetConfig,
}

impl BodyGraphBuilder {
    /// Create a builder with the given configuration.
    #[must_use]
    pub fn new(config: SnippetConfig) -> Self {
        Self { config }
    }

    /// Build the property graph of `request`'s body.
    ///
    /// An empty body yields an empty graph.
    ///
    /// # Errors
    ///
    /// Returns [`SnippetError::MalformedBody`] for unparsable or over-deep
    /// JSON and [`SnippetError::SchemaMismatch`] when the JSON shape
    /// contradicts the declared schema.
    pub fn build(
        &self,
        request: &ResolvedRequest,
        index: &dyn PathIndex,
    ) -> SnippetResult<BodyGraph> {
        if request.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(BodyGraph::default());
        }

        let content = classify(request.content_type.as_deref(), &request.body).map_err(|e| {
            SnippetError::MalformedBody {
                content_type: e.content_type,
                reason: e.reason,
            }
        })?;

        let root = match content {
            BodyContent::Binary => PropertyNode::Binary(BinaryData::Raw(request.body.clone())),
            BodyContent::Text(text) => PropertyNode::String(text),
            BodyContent::Json(_) if is_stream_upload(&request.body_schema) => {
                PropertyNode::Binary(BinaryData::Raw(request.body.clone()))
            }
            BodyContent::Json(value) => {
                let walker = Walker {
                    index,
                    max_depth: self.config.max_body_depth,
                    content_type: request
                        .content_type
                        .clone()
                        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_owned()),
                };
                json_root(&walker, request, value)?
            }
        };

        let type_name = match &root {
            PropertyNode::Object { declared_type, .. } => Some(declared_type.clone()),
            _ => None,
        };
        debug!(
            root = root.kind_name(),
            type_name = ?type_name.as_ref().map(|t| t.name.as_str()),
            "built body graph"
        );
        Ok(BodyGraph {
            root: Some(root),
            type_name,
        })
    }
}

/// `Edm.Stream` request bodies are uploads whatever their bytes look like.
fn is_stream_upload(schema: &BodySchema) -> bool {
    matches!(
        schema,
        BodySchema::Named(SchemaType::Primitive(Primitive::Stream))
    )
}

fn json_root(
    walker: &Walker<'_>,
    request: &ResolvedRequest,
    value: Value,
) -> SnippetResult<PropertyNode> {
    match (&request.body_schema, value) {
        (BodySchema::Named(schema), value) => walker.typed(value, schema, None, "$", 0),
        (BodySchema::Parameters { operation, parameters }, Value::Object(map)) => {
            let declared = TypeName::request_builder(
                &request.builder_path(),
                request_body_name(operation, request),
            );
            walker.parameters(map, declared, parameters, "$", 0)
        }
        (BodySchema::Reference { update }, Value::Object(map)) => {
            let name = if *update {
                "referenceUpdate"
            } else {
                "referenceCreate"
            };
            walker.reference(map, TypeName::model(&request.namespace, name), "$")
        }
        (BodySchema::None, Value::Object(map)) => {
            let builder_path = request.builder_path();
            let operation = request
                .operation_name()
                .or_else(|| builder_path.last().map(String::as_str))
                .unwrap_or("request")
                .to_owned();
            let declared =
                TypeName::request_builder(&builder_path, request_body_name(&operation, request));
            walker.untyped_object(map, declared, "$", 0)
        }
        (BodySchema::None, value) => walker.infer(value, "$", 0),
        (_, value) => Err(SnippetError::schema_mismatch(
            "$",
            "object",
            json_kind(&value),
        )),
    }
}

/// `{operation}{Verb}RequestBody`, e.g. `sendActivityNotificationPostRequestBody`.
fn request_body_name(operation: &str, request: &ResolvedRequest) -> String {
    let verb = to_pascal_case(&request.method.as_str().to_ascii_lowercase());
    format!("{operation}{verb}RequestBody")
}

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
