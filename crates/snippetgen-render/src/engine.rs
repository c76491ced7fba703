//! The generic snippet walker.
//!
//! One walk serves every language: the [`LanguageProfile`] decides casing
//! and construction style, its [`crate::profile::LanguageSyntax`] supplies
//! every token.

use std::fmt::Write;

use http::Method;
use snippetgen_core::naming::{singularize, to_pascal_case};
use snippetgen_core::{SnippetConfig, SnippetError, SnippetResult};
use snippetgen_model::request::{cast_builder_name, function_builder_name};
use snippetgen_model::{
    BodyGraph, PathSegment, Property, PropertyNode, QueryOptions, ResolvedRequest, ScalarValue,
    TemporalKind, TypeName, ValueType,
};
use tracing::debug;

use crate::imports::ImportResolver;
use crate::literal::{base64_text, canonical_guid};
use crate::naming::{LocalNames, navigation_name, property_name};
use crate::profile::{
    CallParts, ConstructionStyle, Features, LanguageProfile, QueryEntry, RenderContext,
};

const BODY_VARIABLE: &str = "requestBody";
const DOCS_URL: &str = "https://learn.microsoft.com/en-us/graph/sdks/create-client?from=snippets";

/// Render `request` with body `graph` as a `profile` snippet.
pub(crate) fn render(
    profile: &'static LanguageProfile,
    request: &ResolvedRequest,
    graph: &BodyGraph,
    config: &SnippetConfig,
) -> SnippetResult<String> {
    let ctx = RenderContext::new(profile, request);
    let client = profile.local_casing.apply(&config.client_variable);
    let mut locals = LocalNames::new(profile);
    locals.reserve(&client);

    let mut walker = Walker {
        ctx,
        locals,
        body: Vec::new(),
        prelude: Vec::new(),
    };

    let body_var = graph.root.as_ref().map(|root| walker.body(root));
    let chain = walker.navigation();

    let query = query_entries(&request.query);
    let configuration = profile.syntax.configuration(
        &walker.ctx,
        &mut walker.locals,
        &query,
        &request.headers,
    );

    let call = profile.syntax.call_statement(
        &walker.ctx,
        &CallParts {
            client: &client,
            chain: &chain,
            method: &request.method,
            body: body_var.as_deref(),
            configuration: configuration.as_ref().and_then(|c| c.argument.as_deref()),
            has_result: has_result(request),
            awaited: profile.is_async,
        },
    );

    let mut sections = Vec::new();
    if !walker.body.is_empty() {
        sections.push(walker.body.join("\n"));
    }
    if let Some(configuration) = &configuration {
        if !configuration.declarations.is_empty() {
            sections.push(configuration.declarations.join("\n"));
        }
    }
    let mut call_section = walker.prelude.clone();
    call_section.push(call);
    sections.push(call_section.join("\n"));
    let code = sections.join("\n\n");

    let features = features(graph, !query.is_empty(), !request.headers.is_empty());
    let imports = ImportResolver::new(ctx).resolve(graph, &features, &code);

    let mut out = String::new();
    writeln!(
        out,
        "{} To initialize your {client}, see {DOCS_URL}&tabs={}",
        profile.comment, profile.docs_tab
    ).map_err(|e| SnippetError::Internal(e.into()))?;
    writeln!(out).map_err(|e| SnippetError::Internal(e.into()))?;
    if !imports.is_empty() {
        writeln!(out, "{}", profile.syntax.format_imports(&imports)).map_err(|e| SnippetError::Internal(e.into()))?;
        writeln!(out).map_err(|e| SnippetError::Internal(e.into()))?;
    }
    writeln!(out, "{code}").map_err(|e| SnippetError::Internal(e.into()))?;

    debug!(
        language = profile.id,
        imports = imports.len(),
        bytes = out.len(),
        "rendered snippet"
    );
    Ok(out)
}

struct Walker<'a> {
    ctx: RenderContext<'a>,
    locals: LocalNames,
    /// Body declarations, in emission order.
    body: Vec<String>,
    /// Argument locals declared ahead of the call.
    prelude: Vec<String>,
}

impl Walker<'_> {
    /// Declare the request body and return its variable.
    fn body(&mut self, root: &PropertyNode) -> String {
        let syntax = self.ctx.profile.syntax;
        match root {
            PropertyNode::String(text) => {
                let bytes = syntax.text_bytes(&syntax.string_literal(text));
                let var = self.locals.allocate(BODY_VARIABLE);
                self.body.push(syntax.stream_declaration(&var, &bytes));
                var
            }
            PropertyNode::Binary(data) => {
                let bytes = syntax.binary_literal(&base64_text(data));
                if syntax.binds_local(root) {
                    return self.bind(root, BODY_VARIABLE, bytes);
                }
                let var = self.locals.allocate(BODY_VARIABLE);
                self.body.push(syntax.stream_declaration(&var, &bytes));
                var
            }
            PropertyNode::Object {
                declared_type,
                children,
            } if self.ctx.profile.construction == ConstructionStyle::Statement => {
                self.hoist_object(declared_type, children, BODY_VARIABLE)
            }
            node if syntax.binds_local(node) => self.expression(node, BODY_VARIABLE, 0),
            node => {
                let expr = self.expression(node, BODY_VARIABLE, 0);
                let var = self.locals.allocate(BODY_VARIABLE);
                self.body.push(syntax.body_declaration(&var, &expr));
                var
            }
        }
    }

    fn expression(&mut self, node: &PropertyNode, hint: &str, indent: usize) -> String {
        let profile = self.ctx.profile;
        let syntax = profile.syntax;
        match node {
            PropertyNode::String(text) => syntax.string_literal(text),
            PropertyNode::Number { raw, width, kind } => syntax.number_literal(raw, *width, *kind),
            PropertyNode::Boolean(value) => syntax.boolean_literal(*value),
            PropertyNode::Guid(raw) => syntax.guid_literal(&canonical_guid(raw)),
            PropertyNode::DateTime { raw, kind } => {
                self.bind(node, hint, syntax.temporal_literal(raw, *kind))
            }
            PropertyNode::Binary(data) => self.bind(node, hint, syntax.binary_literal(&base64_text(data))),
            PropertyNode::Enum {
                type_name, members, ..
            } => syntax.enum_literal(&self.ctx, type_name, members),
            PropertyNode::Null => syntax.null_literal().to_owned(),
            PropertyNode::Object {
                declared_type,
                children,
            } => match profile.construction {
                ConstructionStyle::Statement => {
                    let var = self.hoist_object(declared_type, children, &declared_type.name);
                    self.body.push(String::new());
                    var
                }
                ConstructionStyle::Expression => {
                    let type_ref = syntax.type_reference(&self.ctx, declared_type);
                    let fields: Vec<(String, String)> = children
                        .iter()
                        .map(|p| {
                            (
                                property_name(profile, &p.name),
                                self.expression(&p.node, &p.name, indent + 1),
                            )
                        })
                        .collect();
                    syntax.object_expression(&type_ref, &fields, indent)
                }
            },
            PropertyNode::Array {
                item_type,
                children,
            } => {
                let element = syntax.element_type(&self.ctx, item_type);
                let item_hint = item_hint(item_type, hint);
                let items: Vec<String> = children
                    .iter()
                    .map(|c| self.expression(c, &item_hint, indent + 1))
                    .collect();
                syntax.collection_expression(&element, &items, indent)
            }
            PropertyNode::Map { children } => {
                let entries: Vec<(String, String)> = children
                    .iter()
                    .map(|p| (p.name.clone(), self.expression(&p.node, &p.name, indent + 1)))
                    .collect();
                syntax.map_expression(&entries, indent)
            }
        }
    }

    /// Hoist `expr` into a local when the language cannot use it inline.
    fn bind(&mut self, node: &PropertyNode, hint: &str, expr: String) -> String {
        let syntax = self.ctx.profile.syntax;
        if !syntax.binds_local(node) {
            return expr;
        }
        let local = self.locals.allocate(hint);
        self.body.push(syntax.local_declaration(&local, node, &expr));
        local
    }

    /// Declare an object local and populate it with setter statements.
    fn hoist_object(&mut self, declared_type: &TypeName, children: &[Property], hint: &str) -> String {
        let profile = self.ctx.profile;
        let syntax = profile.syntax;
        let var = self.locals.allocate(hint);
        let type_ref = syntax.type_reference(&self.ctx, declared_type);
        self.body.push(syntax.object_declaration(&var, &type_ref));

        for property in children {
            let field = property_name(profile, &property.name);
            let value = match &property.node {
                PropertyNode::Null => syntax.null_literal().to_owned(),
                PropertyNode::Object {
                    declared_type,
                    children,
                } => {
                    let nested = self.hoist_object(declared_type, children, &property.name);
                    self.body.push(String::new());
                    nested
                }
                node if syntax.binds_local(node) => self.expression(node, &property.name, 0),
                node => {
                    let expr = self.expression(node, &property.name, 0);
                    let local = self.locals.allocate(&property.name);
                    self.body.push(syntax.local_declaration(&local, node, &expr));
                    local
                }
            };
            self.body
                .push(syntax.field_assignment(&var, &field, &value, &property.node));
        }
        var
    }

    /// Request builder chain for the resolved segments.
    fn navigation(&mut self) -> String {
        let profile = self.ctx.profile;
        let syntax = profile.syntax;
        let request = self.ctx.request;
        let mut chain = String::new();
        for segment in &request.segments {
            match segment {
                PathSegment::Literal { name, cast } => {
                    chain.push_str(&syntax.accessor(&navigation_name(profile, name)));
                    self.cast(&mut chain, cast.as_deref());
                }
                PathSegment::PathParameter(key_param) => {
                    chain.push_str(&syntax.keyed(key_param));
                }
                PathSegment::IndexedCollection {
                    collection,
                    key_param,
                    cast,
                } => {
                    chain.push_str(&syntax.accessor(&navigation_name(profile, collection)));
                    chain.push_str(&syntax.keyed(key_param));
                    self.cast(&mut chain, cast.as_deref());
                }
                PathSegment::AlternateKey {
                    collection,
                    key,
                    value,
                } => {
                    let name = format!("{collection}With{}", to_pascal_case(key));
                    let arg = self.argument(key, &ScalarValue::String(value.clone()));
                    chain.push_str(&syntax.call(&navigation_name(profile, &name), &[arg]));
                }
                PathSegment::Action { name, bound_params }
                | PathSegment::Function { name, bound_params } => {
                    if bound_params.is_empty() {
                        chain.push_str(&syntax.accessor(&navigation_name(profile, name)));
                    } else {
                        let builder = function_builder_name(name, bound_params);
                        let args: Vec<String> = bound_params
                            .iter()
                            .map(|p| self.argument(&p.name, &p.value))
                            .collect();
                        chain.push_str(&syntax.call(&navigation_name(profile, &builder), &args));
                    }
                }
                PathSegment::Reference => {
                    chain.push_str(&syntax.accessor(&navigation_name(profile, "ref")));
                }
                PathSegment::Value => {
                    chain.push_str(&syntax.accessor(&navigation_name(profile, "content")));
                }
                PathSegment::Count => {
                    chain.push_str(&syntax.accessor(&navigation_name(profile, "count")));
                }
            }
        }
        chain
    }

    fn cast(&self, chain: &mut String, cast: Option<&str>) {
        if let Some(cast) = cast {
            let name = cast_builder_name(cast);
            chain.push_str(
                &self
                    .ctx
                    .profile
                    .syntax
                    .accessor(&navigation_name(self.ctx.profile, &name)),
            );
        }
    }

    /// A call argument; pointer languages pass the address of a local.
    fn argument(&mut self, name: &str, value: &ScalarValue) -> String {
        let syntax = self.ctx.profile.syntax;
        let literal = match value {
            ScalarValue::String(s) => syntax.string_literal(s),
            ScalarValue::Integer(n) => syntax.integer_literal(*n),
            ScalarValue::Boolean(b) => syntax.boolean_literal(*b),
            ScalarValue::List(items) => syntax.string_list(items),
        };
        if !self.ctx.profile.pointer_arguments {
            return literal;
        }
        let local = self.locals.allocate(name);
        self.prelude.push(syntax.body_declaration(&local, &literal));
        format!("&{local}")
    }
}

/// Local hint for collection elements: the element type, else the
/// singular of the property.
fn item_hint(item_type: &ValueType, hint: &str) -> String {
    match item_type {
        ValueType::Object(type_name) => type_name.name.clone(),
        _ => singularize(hint),
    }
}

/// System options in canonical order, then custom parameters.
fn query_entries(query: &QueryOptions) -> Vec<QueryEntry> {
    query
        .system_options()
        .into_iter()
        .map(|(name, value)| QueryEntry {
            name: name.to_owned(),
            value,
        })
        .chain(query.parameters.iter().map(|p| QueryEntry {
            name: p.name.trim_start_matches('$').to_owned(),
            value: p.value.clone(),
        }))
        .collect()
}

fn has_result(request: &ResolvedRequest) -> bool {
    request.method == Method::GET
        || request
            .operation
            .as_ref()
            .is_some_and(|op| op.response.is_some())
}

fn features(graph: &BodyGraph, query: bool, headers: bool) -> Features {
    let mut features = Features {
        query,
        headers,
        ..Features::default()
    };
    let Some(root) = &graph.root else {
        return features;
    };
    let temporal = |wanted: TemporalKind| {
        root.any(&|n: &PropertyNode| match n {
            PropertyNode::DateTime { kind, .. } => *kind == wanted,
            PropertyNode::Array {
                item_type: ValueType::Temporal(kind),
                ..
            } => *kind == wanted,
            _ => false,
        })
    };
    features.guid = root.any(&|n: &PropertyNode| {
        matches!(
            n,
            PropertyNode::Guid(_)
                | PropertyNode::Array {
                    item_type: ValueType::Guid,
                    ..
                }
        )
    });
    features.date_time = temporal(TemporalKind::DateTime);
    features.date = temporal(TemporalKind::Date);
    features.time_of_day = temporal(TemporalKind::TimeOfDay);
    features.duration = temporal(TemporalKind::Duration);
    match root {
        PropertyNode::String(_) => features.text_stream = true,
        PropertyNode::Binary(_) => features.binary_stream = true,
        _ => features.binary = root.any(&|n: &PropertyNode| matches!(n, PropertyNode::Binary(_))),
    }
    features
}

#[cfg(test)]
mod tests {
    use snippetgen_model::{NumberKind, NumberWidth};

    use super::*;

    #[test]
    fn test_should_order_query_entries() {
        let query = QueryOptions {
            select: vec!["subject".to_owned()],
            top: Some(2),
            filter: Some("a eq 1".to_owned()),
            parameters: vec![snippetgen_model::QueryParameter {
                name: "startDateTime".to_owned(),
                value: ScalarValue::String("2024-01-01".to_owned()),
            }],
            ..QueryOptions::default()
        };
        let names: Vec<_> = query_entries(&query).into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["select", "filter", "top", "startDateTime"]);
    }

    #[test]
    fn test_should_collect_features() {
        let graph = BodyGraph {
            root: Some(PropertyNode::Map {
                children: vec![
                    Property::new(
                        "when",
                        PropertyNode::DateTime {
                            raw: "2024-01-01".to_owned(),
                            kind: TemporalKind::Date,
                        },
                    ),
                    Property::new(
                        "ids",
                        PropertyNode::Array {
                            item_type: ValueType::Guid,
                            children: Vec::new(),
                        },
                    ),
                    Property::new(
                        "n",
                        PropertyNode::Number {
                            raw: "1".to_owned(),
                            width: NumberWidth::W32,
                            kind: NumberKind::Int,
                        },
                    ),
                ],
            }),
            type_name: None,
        };
        let features = features(&graph, false, true);
        assert!(features.date);
        assert!(features.guid);
        assert!(!features.date_time);
        assert!(!features.binary);
        assert!(features.configuration());

        let text = BodyGraph {
            root: Some(PropertyNode::String("hi".to_owned())),
            type_name: None,
        };
        assert!(super::features(&text, false, false).text_stream);
        assert!(!super::features(&BodyGraph::default(), false, false).configuration());
    }

    #[test]
    fn test_should_bind_fallible_values_nested_in_collections() {
        let index = snippetgen_model::fixtures::graph_index();
        let request = snippetgen_resolver::RequestResolver::default()
            .resolve(
                &snippetgen_model::RecordedRequest::new(Method::POST, "/v1.0/me/messages"),
                &index,
            )
            .unwrap();
        let slot = |raw: &str| PropertyNode::DateTime {
            raw: raw.to_owned(),
            kind: TemporalKind::DateTime,
        };
        let graph = BodyGraph {
            root: Some(PropertyNode::Map {
                children: vec![
                    Property::new(
                        "slots",
                        PropertyNode::Array {
                            item_type: ValueType::Temporal(TemporalKind::DateTime),
                            children: vec![slot("2024-01-01T08:00:00Z"), slot("2024-01-02T08:00:00Z")],
                        },
                    ),
                    Property::new("attachment", PropertyNode::Binary(snippetgen_model::BinaryData::Raw(bytes::Bytes::from_static(&[1, 2])))),
                ],
            }),
            type_name: None,
        };
        let config = SnippetConfig::default();

        let go = crate::languages::find_language("go").unwrap();
        let snippet = render(go, &request, &graph, &config).unwrap();
        assert!(snippet.contains("slot, _ := time.Parse(time.RFC3339, "));
        assert!(snippet.contains("slot1, _ := time.Parse(time.RFC3339, "));
        assert!(snippet.contains("\t\tslot,\n\t\tslot1,\n"));
        assert!(snippet.contains("attachment, _ := base64.StdEncoding.DecodeString(\"AQI=\")"));
        assert!(snippet.contains("\"attachment\" : attachment,"));
        assert!(snippet.contains("\"encoding/base64\""));

        let csharp = crate::languages::find_language("csharp").unwrap();
        let snippet = render(csharp, &request, &graph, &config).unwrap();
        assert!(snippet.contains("Convert.FromBase64String(\"AQI=\")"));
    }

    #[test]
    fn test_should_await_only_async_languages() {
        let index = snippetgen_model::fixtures::graph_index();
        let request = snippetgen_resolver::RequestResolver::default()
            .resolve(&snippetgen_model::RecordedRequest::new(Method::GET, "/v1.0/me"), &index)
            .unwrap();
        let config = SnippetConfig::default();
        for profile in crate::languages::LANGUAGES {
            let snippet = render(profile, &request, &BodyGraph::default(), &config).unwrap();
            assert_eq!(snippet.contains("await "), profile.is_async, "{}", profile.id);
        }
    }

    #[test]
    fn test_should_name_collection_items() {
        let recipient = TypeName::model("microsoft.graph", "recipient");
        assert_eq!(item_hint(&ValueType::Object(recipient), "toRecipients"), "recipient");
        assert_eq!(item_hint(&ValueType::String, "categories"), "category");
    }
}
