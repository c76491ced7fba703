//! Recorded and resolved request types.

use std::fmt;

use bytes::Bytes;
use http::Method;

use snippetgen_core::naming::{short_type_name, to_pascal_case};

use crate::path::OperationDescriptor;
use crate::schema::{PropertyDescriptor, SchemaType};

/// A captured HTTP request, before resolution.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: Method,
    /// Request URL, absolute or origin-relative (`/v1.0/me`).
    pub url: String,
    /// Headers in original order.
    pub headers: Vec<(String, String)>,
    /// Raw body.
    pub body: Bytes,
}

impl RecordedRequest {
    /// Create a bodiless request.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// Append a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Value of the first header named `name`, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl From<http::Request<Bytes>> for RecordedRequest {
    fn from(req: http::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        let headers = parts
            .headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_owned(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        Self {
            method: parts.method,
            url: parts.uri.to_string(),
            headers,
            body,
        }
    }
}

/// A typed scalar parsed from a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarValue {
    /// Text.
    String(String),
    /// Integer.
    Integer(i64),
    /// Boolean.
    Boolean(bool),
    /// Ordered list of text items.
    List(Vec<String>),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::List(items) => f.write_str(&items.join(",")),
        }
    }
}

/// A named argument bound in a path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundParameter {
    /// Parameter name.
    pub name: String,
    /// Parsed value.
    pub value: ScalarValue,
}

/// One resolved path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Navigation or collection name, optionally narrowed by a type cast.
    Literal {
        /// Segment name.
        name: String,
        /// Qualified cast type collapsed into this segment.
        cast: Option<String>,
    },
    /// A key placeholder not preceded by a collection.
    PathParameter(String),
    /// A collection addressed by key.
    IndexedCollection {
        /// Collection name.
        collection: String,
        /// Key placeholder name, e.g. `message-id`.
        key_param: String,
        /// Qualified cast type collapsed into this segment.
        cast: Option<String>,
    },
    /// A collection addressed by an alternate key, `users(userPrincipalName='x')`.
    AlternateKey {
        /// Collection name.
        collection: String,
        /// Alternate key property.
        key: String,
        /// Key value.
        value: String,
    },
    /// A bound action.
    Action {
        /// Action name.
        name: String,
        /// Bound parameters, in declared order.
        bound_params: Vec<BoundParameter>,
    },
    /// A bound function.
    Function {
        /// Function name.
        name: String,
        /// Arguments, in declared order.
        bound_params: Vec<BoundParameter>,
    },
    /// `$ref`.
    Reference,
    /// `$value`.
    Value,
    /// `$count`.
    Count,
}

impl PathSegment {
    /// Request builder package name(s) this segment contributes.
    ///
    /// Keyed collections contribute their collection name followed by `item`.
    #[must_use]
    pub fn builder_names(&self) -> Vec<String> {
        match self {
            Self::Literal { name, cast } => with_cast(vec![name.clone()], cast.as_deref()),
            Self::PathParameter(_) => vec!["item".to_owned()],
            Self::IndexedCollection {
                collection, cast, ..
            } => with_cast(vec![collection.clone(), "item".to_owned()], cast.as_deref()),
            Self::AlternateKey {
                collection, key, ..
            } => vec![format!("{collection}With{}", to_pascal_case(key))],
            Self::Action { name, .. } => vec![name.clone()],
            Self::Function { name, bound_params } => vec![function_builder_name(name, bound_params)],
            Self::Reference => vec!["ref".to_owned()],
            Self::Value => vec!["content".to_owned()],
            Self::Count => vec!["count".to_owned()],
        }
    }

    /// Name of an action or function segment.
    #[must_use]
    pub fn operation_name(&self) -> Option<&str> {
        match self {
            Self::Action { name, .. } | Self::Function { name, .. } => Some(name),
            _ => None,
        }
    }
}

fn with_cast(mut names: Vec<String>, cast: Option<&str>) -> Vec<String> {
    if let Some(cast) = cast {
        names.push(cast_builder_name(cast));
    }
    names
}

/// Builder name for a type-cast segment, e.g. `graphUser`.
#[must_use]
pub fn cast_builder_name(cast: &str) -> String {
    format!("graph{}", to_pascal_case(short_type_name(cast)))
}

/// Builder name for a function with arguments, e.g. `reminderViewWithStartDateTimeWithEndDateTime`.
#[must_use]
pub fn function_builder_name(name: &str, params: &[BoundParameter]) -> String {
    params.iter().fold(name.to_owned(), |mut acc, p| {
        acc.push_str("With");
        acc.push_str(&to_pascal_case(&p.name));
        acc
    })
}

/// Request builder package path for a segment list.
#[must_use]
pub fn request_builder_path(segments: &[PathSegment]) -> Vec<String> {
    segments.iter().flat_map(PathSegment::builder_names).collect()
}

/// A named query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParameter {
    /// Name as given in the URL.
    pub name: String,
    /// Typed value.
    pub value: ScalarValue,
}

/// Parsed query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// `$select` items.
    pub select: Vec<String>,
    /// `$expand` items, nested options kept verbatim.
    pub expand: Vec<String>,
    /// `$orderby` items.
    pub orderby: Vec<String>,
    /// `$filter` expression.
    pub filter: Option<String>,
    /// `$search` expression.
    pub search: Option<String>,
    /// `$top`.
    pub top: Option<i64>,
    /// `$skip`.
    pub skip: Option<i64>,
    /// `$count`.
    pub count: Option<bool>,
    /// Other parameters in URL order.
    pub parameters: Vec<QueryParameter>,
}

impl QueryOptions {
    /// Whether no option is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.select.is_empty()
            && self.expand.is_empty()
            && self.orderby.is_empty()
            && self.filter.is_none()
            && self.search.is_none()
            && self.top.is_none()
            && self.skip.is_none()
            && self.count.is_none()
            && self.parameters.is_empty()
    }

    /// System options in canonical order, as `(name, value)` pairs.
    #[must_use]
    pub fn system_options(&self) -> Vec<(&'static str, ScalarValue)> {
        let mut options = Vec::new();
        if !self.select.is_empty() {
            options.push(("select", ScalarValue::List(self.select.clone())));
        }
        if !self.expand.is_empty() {
            options.push(("expand", ScalarValue::List(self.expand.clone())));
        }
        if let Some(filter) = &self.filter {
            options.push(("filter", ScalarValue::String(filter.clone())));
        }
        if !self.orderby.is_empty() {
            options.push(("orderby", ScalarValue::List(self.orderby.clone())));
        }
        if let Some(search) = &self.search {
            options.push(("search", ScalarValue::String(search.clone())));
        }
        if let Some(top) = self.top {
            options.push(("top", ScalarValue::Integer(top)));
        }
        if let Some(skip) = self.skip {
            options.push(("skip", ScalarValue::Integer(skip)));
        }
        if let Some(count) = self.count {
            options.push(("count", ScalarValue::Boolean(count)));
        }
        options
    }
}

/// A preserved request header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Original header name.
    pub name: String,
    /// Raw value.
    pub value: String,
}

/// Where the request body's schema comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BodySchema {
    /// No schema; the body, if any, is inferred.
    #[default]
    None,
    /// The operation declares a named request type.
    Named(SchemaType),
    /// An action's parameters form the body.
    Parameters {
        /// Operation name the synthesized body type is named after.
        operation: String,
        /// Parameters in declared order.
        parameters: Vec<PropertyDescriptor>,
    },
    /// A `$ref` body carrying `@odata.id`.
    Reference {
        /// `PUT` replaces the reference instead of adding one.
        update: bool,
    },
}

/// A request matched against the path index.
///
/// Built once by the resolver; consumers only read it.
#[derive(Debug, Clone)]
pub struct ResolvedRequest {
    /// HTTP method.
    pub method: Method,
    /// API version the request targets.
    pub api_version: String,
    /// Decoded request path after version stripping and rewrites.
    pub path: String,
    /// Resolved segments in path order.
    pub segments: Vec<PathSegment>,
    /// Matched operation.
    pub operation: Option<OperationDescriptor>,
    /// Body schema selection.
    pub body_schema: BodySchema,
    /// Parsed query string.
    pub query: QueryOptions,
    /// Preserved headers in original order.
    pub headers: Vec<Header>,
    /// Body content type.
    pub content_type: Option<String>,
    /// Raw body.
    pub body: Bytes,
    /// Root schema namespace of the index used for resolution.
    pub namespace: String,
}

impl ResolvedRequest {
    /// Request builder package path of this request.
    #[must_use]
    pub fn builder_path(&self) -> Vec<String> {
        request_builder_path(&self.segments)
    }

    /// Name of the terminal action or function, if the path ends in one.
    #[must_use]
    pub fn operation_name(&self) -> Option<&str> {
        self.segments.last().and_then(PathSegment::operation_name)
    }

    /// Whether a body was sent.
    #[must_use]
    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_build_recorded_request_fluently() {
        let req = RecordedRequest::new(Method::POST, "/v1.0/me/sendMail")
            .with_header("Content-Type", "application/json")
            .with_body(r#"{"saveToSentItems": true}"#);
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert!(!req.body.is_empty());
    }

    #[test]
    fn test_should_convert_http_request() {
        let req = http::Request::builder()
            .method(Method::GET)
            .uri("https://graph.microsoft.com/v1.0/me?$select=id")
            .header("Authorization", "Bearer x")
            .body(Bytes::new())
            .unwrap();
        let recorded = RecordedRequest::from(req);
        assert_eq!(recorded.method, Method::GET);
        assert!(recorded.url.ends_with("/v1.0/me?$select=id"));
        assert_eq!(recorded.header("authorization"), Some("Bearer x"));
    }

    #[test]
    fn test_should_derive_builder_path() {
        let segments = vec![
            PathSegment::Literal {
                name: "groups".to_owned(),
                cast: None,
            },
            PathSegment::IndexedCollection {
                collection: "members".to_owned(),
                key_param: "directoryObject-id".to_owned(),
                cast: Some("microsoft.graph.user".to_owned()),
            },
            PathSegment::Function {
                name: "reminderView".to_owned(),
                bound_params: vec![
                    BoundParameter {
                        name: "StartDateTime".to_owned(),
                        value: ScalarValue::String("a".to_owned()),
                    },
                    BoundParameter {
                        name: "EndDateTime".to_owned(),
                        value: ScalarValue::String("b".to_owned()),
                    },
                ],
            },
            PathSegment::Reference,
        ];
        assert_eq!(
            request_builder_path(&segments),
            vec![
                "groups",
                "members",
                "item",
                "graphUser",
                "reminderViewWithStartDateTimeWithEndDateTime",
                "ref"
            ]
        );
    }

    #[test]
    fn test_should_list_system_options_in_canonical_order() {
        let query = QueryOptions {
            top: Some(5),
            select: vec!["id".to_owned()],
            count: Some(true),
            ..QueryOptions::default()
        };
        let names: Vec<_> = query.system_options().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["select", "top", "count"]);
        assert!(!query.is_empty());
        assert!(QueryOptions::default().is_empty());
    }
}
