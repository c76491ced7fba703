//! Segment-by-segment matching of a request path against the path tree.

use snippetgen_core::{SnippetError, SnippetResult};
use snippetgen_model::{
    BoundParameter, NodeKind, PathIndex, PathNode, PathSegment, Primitive, PropertyDescriptor,
    ScalarValue, SchemaType,
};
use tracing::debug;

/// Tokens remapped because they collide with a generated supertype name.
const DISAMBIGUATIONS: &[(&str, &str)] = &[("directory", "directoryObject")];

/// Outcome of walking a path.
#[derive(Debug)]
pub(crate) struct PathWalk<'a> {
    /// Resolved segments.
    pub segments: Vec<PathSegment>,
    /// Visited nodes; the root first.
    pub nodes: Vec<&'a PathNode>,
}

impl<'a> PathWalk<'a> {
    /// Node the walk ended on.
    pub fn last(&self) -> Option<&'a PathNode> {
        self.nodes.last().copied()
    }

    /// Parent of the node the walk ended on.
    pub fn parent(&self) -> Option<&'a PathNode> {
        self.nodes.len().checked_sub(2).map(|i| self.nodes[i])
    }
}

/// A raw `name=value` (or bare value) argument from a parenthesized segment.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawArgument {
    name: Option<String>,
    value: ScalarValue,
}

/// Walk `path` (version-less, decoded) through the index.
pub(crate) fn walk_path<'a>(index: &'a dyn PathIndex, path: &str) -> SnippetResult<PathWalk<'a>> {
    let mut node = index.root();
    let mut walk = PathWalk {
        segments: Vec::new(),
        nodes: vec![node],
    };

    for token in tokenize(path) {
        let unresolved = |reason: String| SnippetError::unresolved_path(path, reason);

        if let Some(segment) = special_segment(&token) {
            node = node
                .child(&token)
                .ok_or_else(|| unresolved(format!("{token} is not available here")))?;
            walk.segments.push(segment);
            walk.nodes.push(node);
            continue;
        }

        if let Some((name, args)) = parse_call(&token) {
            let (child, emitted) = match_child(node, name)
                .ok_or_else(|| unresolved(format!("no segment named {name}")))?;
            let (segment, next) = call_segment(child, emitted, args)
                .map_err(unresolved)?;
            walk.segments.push(segment);
            node = next;
            walk.nodes.push(node);
            continue;
        }

        if let Some((child, emitted)) = match_child(node, &token) {
            walk.segments.push(match child.kind {
                NodeKind::Action => PathSegment::Action {
                    name: emitted,
                    bound_params: Vec::new(),
                },
                NodeKind::Function => PathSegment::Function {
                    name: emitted,
                    bound_params: Vec::new(),
                },
                NodeKind::Literal | NodeKind::Parameter => PathSegment::Literal {
                    name: emitted,
                    cast: None,
                },
            });
            node = child;
            walk.nodes.push(node);
            continue;
        }

        if token.contains('.') && index.describe_type(&token).is_some() {
            apply_cast(&mut walk.segments, &token).map_err(unresolved)?;
            // A cast keeps the current node unless the tree spells it out.
            if let Some(child) = node.child_ignore_case(&token) {
                node = child;
                walk.nodes.push(node);
            }
            continue;
        }

        if let Some(param) = node.parameter_child() {
            let key_param = param.parameter_name().unwrap_or_default().to_owned();
            fold_key(&mut walk.segments, key_param);
            node = param;
            walk.nodes.push(node);
            continue;
        }

        return Err(unresolved(format!(
            "no segment matches {token} under {}",
            display_segment(node)
        )));
    }

    debug!(path, segments = walk.segments.len(), "walked request path");
    Ok(walk)
}

fn display_segment(node: &PathNode) -> &str {
    if node.segment.is_empty() {
        "/"
    } else {
        &node.segment
    }
}

/// `$ref`, `$value` and `$count`.
fn special_segment(token: &str) -> Option<PathSegment> {
    match token {
        "$ref" => Some(PathSegment::Reference),
        "$value" => Some(PathSegment::Value),
        "$count" => Some(PathSegment::Count),
        _ => None,
    }
}

/// Find the child matching `token`: exact, then ignoring case, then through
/// the disambiguation table. Returns the child and the name to emit.
fn match_child<'a>(node: &'a PathNode, token: &str) -> Option<(&'a PathNode, String)> {
    let remapped = DISAMBIGUATIONS
        .iter()
        .find(|(from, _)| from.eq_ignore_ascii_case(token))
        .map(|(_, to)| *to);
    let child = node
        .child(token)
        .or_else(|| node.child_ignore_case(token))
        .or_else(|| remapped.and_then(|alt| node.child_ignore_case(alt)))?;
    let emitted = remapped.map_or_else(|| child.segment.clone(), str::to_owned);
    Some((child, emitted))
}

/// Resolve a parenthesized segment: function call, keyed or alternate-key access.
fn call_segment<'a>(
    child: &'a PathNode,
    emitted: String,
    args: Vec<RawArgument>,
) -> Result<(PathSegment, &'a PathNode), String> {
    match child.kind {
        NodeKind::Function => Ok((
            PathSegment::Function {
                name: emitted,
                bound_params: order_arguments(&child.parameters, args),
            },
            child,
        )),
        NodeKind::Action => Ok((
            PathSegment::Action {
                name: emitted,
                bound_params: order_arguments(&child.parameters, args),
            },
            child,
        )),
        NodeKind::Literal | NodeKind::Parameter => {
            let item = child.parameter_child();
            match args.as_slice() {
                [] => Ok((
                    PathSegment::Literal {
                        name: emitted,
                        cast: None,
                    },
                    child,
                )),
                [RawArgument { name: None, .. }] => {
                    let item = item.ok_or_else(|| format!("{emitted} is not keyed"))?;
                    Ok((
                        PathSegment::IndexedCollection {
                            collection: emitted,
                            key_param: item.parameter_name().unwrap_or_default().to_owned(),
                            cast: None,
                        },
                        item,
                    ))
                }
                [
                    RawArgument {
                        name: Some(key),
                        value,
                    },
                ] if child.has_alternate_key(key) => {
                    let key = child
                        .alternate_keys
                        .iter()
                        .find(|k| k.eq_ignore_ascii_case(key))
                        .cloned()
                        .unwrap_or_else(|| key.clone());
                    Ok((
                        PathSegment::AlternateKey {
                            collection: emitted,
                            key,
                            value: value.to_string(),
                        },
                        item.unwrap_or(child),
                    ))
                }
                _ => Err(format!("{emitted} does not accept these keys")),
            }
        }
    }
}

/// Attach a type cast to the preceding segment.
fn apply_cast(segments: &mut [PathSegment], cast_type: &str) -> Result<(), String> {
    match segments.last_mut() {
        Some(
            PathSegment::Literal { cast, .. } | PathSegment::IndexedCollection { cast, .. },
        ) => {
            *cast = Some(cast_type.to_owned());
            Ok(())
        }
        _ => Err(format!("type cast {cast_type} has nothing to narrow")),
    }
}

/// Fold a key placeholder into the preceding collection segment.
fn fold_key(segments: &mut Vec<PathSegment>, key_param: String) {
    if let Some(PathSegment::Literal { name, cast: None }) = segments.last() {
        let collection = name.clone();
        segments.pop();
        segments.push(PathSegment::IndexedCollection {
            collection,
            key_param,
            cast: None,
        });
    } else {
        segments.push(PathSegment::PathParameter(key_param));
    }
}

/// Reorder arguments to the declared parameter order.
///
/// Undeclared arguments follow in URL order; positional arguments take the
/// name of the declared parameter at the same position.
fn order_arguments(declared: &[PropertyDescriptor], args: Vec<RawArgument>) -> Vec<BoundParameter> {
    let mut remaining: Vec<(String, ScalarValue)> = args
        .into_iter()
        .enumerate()
        .map(|(i, arg)| {
            let name = arg.name.unwrap_or_else(|| {
                declared
                    .get(i)
                    .map_or_else(|| format!("arg{i}"), |p| p.name.clone())
            });
            (name, arg.value)
        })
        .collect();

    let mut ordered = Vec::with_capacity(remaining.len());
    for param in declared {
        if let Some(pos) = remaining
            .iter()
            .position(|(name, _)| name.eq_ignore_ascii_case(&param.name))
        {
            let (_, value) = remaining.remove(pos);
            ordered.push(BoundParameter {
                name: param.name.clone(),
                value: coerce(value, &param.schema_type),
            });
        }
    }
    ordered.extend(
        remaining
            .into_iter()
            .map(|(name, value)| BoundParameter { name, value }),
    );
    ordered
}

/// Retype a parsed literal using the declared schema type.
pub(crate) fn coerce(value: ScalarValue, schema_type: &SchemaType) -> ScalarValue {
    if schema_type.is_collection() {
        return match value {
            ScalarValue::List(items) => ScalarValue::List(items),
            other => ScalarValue::List(
                other
                    .to_string()
                    .split(',')
                    .map(|s| s.trim().to_owned())
                    .filter(|s| !s.is_empty())
                    .collect(),
            ),
        };
    }
    match (schema_type.primitive(), value) {
        (Some(Primitive::Boolean), ScalarValue::String(s)) => match s.to_ascii_lowercase().as_str() {
            "true" => ScalarValue::Boolean(true),
            "false" => ScalarValue::Boolean(false),
            _ => ScalarValue::String(s),
        },
        (
            Some(Primitive::Int16 | Primitive::Int32 | Primitive::Int64 | Primitive::Byte),
            ScalarValue::String(s),
        ) => s
            .parse::<i64>()
            .map_or(ScalarValue::String(s), ScalarValue::Integer),
        (Some(p), ScalarValue::Integer(n)) if is_textual(p) => ScalarValue::String(n.to_string()),
        (Some(p), ScalarValue::Boolean(b)) if is_textual(p) => ScalarValue::String(b.to_string()),
        (_, other) => other,
    }
}

fn is_textual(primitive: Primitive) -> bool {
    matches!(
        primitive,
        Primitive::String
            | Primitive::Guid
            | Primitive::Date
            | Primitive::DateTimeOffset
            | Primitive::TimeOfDay
            | Primitive::Duration
    )
}

/// Parse an untyped literal: quoted text, booleans, integers, else text.
pub(crate) fn parse_literal(raw: &str) -> ScalarValue {
    let raw = raw.trim();
    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        return ScalarValue::String(raw[1..raw.len() - 1].replace("''", "'"));
    }
    infer_scalar(raw)
}

/// Heuristic typing: `true`/`false` → boolean, digits → integer, else text.
pub(crate) fn infer_scalar(raw: &str) -> ScalarValue {
    match raw {
        "true" => ScalarValue::Boolean(true),
        "false" => ScalarValue::Boolean(false),
        _ => {
            let digits = raw.strip_prefix('-').unwrap_or(raw);
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                if let Ok(n) = raw.parse::<i64>() {
                    return ScalarValue::Integer(n);
                }
            }
            ScalarValue::String(raw.to_owned())
        }
    }
}

/// Split a path on `/` outside parentheses and quotes, dropping empty tokens.
fn tokenize(path: &str) -> Vec<String> {
    split_top_level(path, '/')
        .into_iter()
        .filter(|t| !t.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Split on `separator` at parenthesis depth 0 and outside single quotes.
pub(crate) fn split_top_level(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        match c {
            '\'' => in_quote = !in_quote,
            '(' if !in_quote => depth += 1,
            ')' if !in_quote => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 && !in_quote => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

/// Split `name(args)` into the name and its parsed arguments.
fn parse_call(token: &str) -> Option<(&str, Vec<RawArgument>)> {
    let open = token.find('(')?;
    if !token.ends_with(')') || open == 0 {
        return None;
    }
    let name = &token[..open];
    let inner = &token[open + 1..token.len() - 1];
    let args = split_top_level(inner, ',')
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|arg| match split_top_level(arg, '=').as_slice() {
            [key, value] => RawArgument {
                name: Some(key.trim().to_owned()),
                value: parse_literal(value),
            },
            _ => RawArgument {
                name: None,
                value: parse_literal(arg),
            },
        })
        .collect();
    Some((name, args))
}

#[cfg(test)]
mod tests {
    use snippetgen_model::fixtures::graph_index;

    use super::*;

    fn segments(path: &str) -> Vec<PathSegment> {
        let index = graph_index();
        walk_path(&index, path).unwrap().segments
    }

    fn literal(name: &str) -> PathSegment {
        PathSegment::Literal {
            name: name.to_owned(),
            cast: None,
        }
    }

    #[test]
    fn test_should_walk_literal_segments() {
        assert_eq!(segments("/me/messages"), vec![literal("me"), literal("messages")]);
    }

    #[test]
    fn test_should_fold_keys_into_indexed_collections() {
        assert_eq!(
            segments("/me/messages/AAMkAGI2/"),
            vec![
                literal("me"),
                PathSegment::IndexedCollection {
                    collection: "messages".to_owned(),
                    key_param: "message-id".to_owned(),
                    cast: None,
                },
            ]
        );
    }

    #[test]
    fn test_should_match_case_insensitively_and_keep_schema_spelling() {
        assert_eq!(segments("/ME/Messages"), vec![literal("me"), literal("messages")]);
    }

    #[test]
    fn test_should_remap_disambiguated_tokens() {
        let segs = segments("/directory/administrativeUnits/123/scopedRoleMembers");
        assert_eq!(segs[0], literal("directoryObject"));
        assert!(matches!(
            &segs[1],
            PathSegment::IndexedCollection { collection, key_param, .. }
                if collection == "administrativeUnits" && key_param == "administrativeUnit-id"
        ));
        assert_eq!(segs[2], literal("scopedRoleMembers"));
    }

    #[test]
    fn test_should_parse_special_segments() {
        let segs = segments("/groups/abc/acceptedSenders/$ref");
        assert_eq!(segs.last(), Some(&PathSegment::Reference));
        assert_eq!(segments("/me/messages/$count").last(), Some(&PathSegment::Count));
        assert_eq!(segments("/me/messages/1/$value").last(), Some(&PathSegment::Value));
    }

    #[test]
    fn test_should_reorder_function_arguments() {
        let segs = segments("/me/reminderView(EndDateTime='2024-01-02',StartDateTime='2024-01-01')");
        let PathSegment::Function { name, bound_params } = segs.last().unwrap() else {
            panic!("expected function segment");
        };
        assert_eq!(name, "reminderView");
        let names: Vec<_> = bound_params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["StartDateTime", "EndDateTime"]);
        assert_eq!(bound_params[0].value, ScalarValue::String("2024-01-01".to_owned()));
    }

    #[test]
    fn test_should_keep_undeclared_arguments_after_declared_ones() {
        let declared = vec![PropertyDescriptor::new(
            "period",
            "Edm.String".parse().unwrap(),
        )];
        let args = vec![
            RawArgument {
                name: Some("extra".to_owned()),
                value: ScalarValue::Integer(1),
            },
            RawArgument {
                name: Some("PERIOD".to_owned()),
                value: ScalarValue::Integer(7),
            },
        ];
        let ordered = order_arguments(&declared, args);
        assert_eq!(ordered[0].name, "period");
        assert_eq!(ordered[0].value, ScalarValue::String("7".to_owned()));
        assert_eq!(ordered[1].name, "extra");
    }

    #[test]
    fn test_should_select_alternate_keys() {
        let segs = segments("/users(userPrincipalName='ada@contoso.com')");
        assert_eq!(
            segs,
            vec![PathSegment::AlternateKey {
                collection: "users".to_owned(),
                key: "userPrincipalName".to_owned(),
                value: "ada@contoso.com".to_owned(),
            }]
        );
    }

    #[test]
    fn test_should_treat_bare_key_calls_as_indexed_access() {
        let segs = segments("/users('ada')/messages");
        assert!(matches!(
            &segs[0],
            PathSegment::IndexedCollection { collection, key_param, .. }
                if collection == "users" && key_param == "user-id"
        ));
        assert_eq!(segs[1], literal("messages"));
    }

    #[test]
    fn test_should_collapse_type_casts() {
        let segs = segments("/groups/abc/members/microsoft.graph.user");
        assert_eq!(
            segs.last(),
            Some(&PathSegment::Literal {
                name: "members".to_owned(),
                cast: Some("microsoft.graph.user".to_owned()),
            })
        );
    }

    #[test]
    fn test_should_recognize_parameterless_functions() {
        let segs = segments("/users/delta()");
        assert!(matches!(segs.last(), Some(PathSegment::Function { name, bound_params }) if name == "delta" && bound_params.is_empty()));
        let segs = segments("/users/delta");
        assert!(matches!(segs.last(), Some(PathSegment::Function { .. })));
    }

    #[test]
    fn test_should_fail_on_unknown_segments() {
        let index = graph_index();
        let err = walk_path(&index, "/me/nothingHere").unwrap_err();
        assert!(matches!(err, SnippetError::UnresolvedPath { .. }));
        assert!(walk_path(&index, "/me/$ref").is_err());
        assert!(walk_path(&index, "/microsoft.graph.user").is_err());
    }

    #[test]
    fn test_should_split_top_level_only() {
        assert_eq!(
            split_top_level("members($select=id,displayName),owners", ','),
            vec!["members($select=id,displayName)", "owners"]
        );
        assert_eq!(split_top_level("search(q='a/b')/x", '/'), vec!["search(q='a/b')", "x"]);
    }

    #[test]
    fn test_should_parse_literals() {
        assert_eq!(parse_literal("'it''s'"), ScalarValue::String("it's".to_owned()));
        assert_eq!(parse_literal("42"), ScalarValue::Integer(42));
        assert_eq!(parse_literal("-3"), ScalarValue::Integer(-3));
        assert_eq!(parse_literal("true"), ScalarValue::Boolean(true));
        assert_eq!(parse_literal("abc"), ScalarValue::String("abc".to_owned()));
        assert_eq!(
            coerce(ScalarValue::String("5".to_owned()), &"Edm.Int32".parse().unwrap()),
            ScalarValue::Integer(5)
        );
    }
}
