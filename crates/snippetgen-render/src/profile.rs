//! The per-language rendering contract.
//!
//! A [`LanguageProfile`] is a `static` record: identifiers, casing rules,
//! reserved words, SDK layout and a [`LanguageSyntax`] strategy object. The
//! generic walker in [`crate::engine`] drives every language through it.

use std::fmt;

use http::Method;
use snippetgen_core::naming::Casing;
use snippetgen_model::{
    Header, NumberKind, NumberWidth, PropertyNode, ResolvedRequest, ScalarValue, TemporalKind,
    TypeName, ValueType,
};

use crate::imports::Import;
use crate::naming::LocalNames;

/// How object values are constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructionStyle {
    /// One nested initializer expression.
    Expression,
    /// A local per object, populated by setter statements.
    Statement,
}

/// How an identifier colliding with a reserved word is escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedEscape {
    /// Prepend the given text, e.g. `@event`.
    Prefix(&'static str),
    /// Append the given text, e.g. `from_`.
    Suffix(&'static str),
}

/// Package roots per API version.
#[derive(Debug, Clone, Copy)]
pub struct SdkLayout {
    /// Root package of the stable SDK.
    pub stable: &'static str,
    /// Root package of the beta SDK.
    pub beta: &'static str,
    /// Whether `/me` builders live under `users/item`.
    pub me_as_user_item: bool,
}

impl SdkLayout {
    /// Root package for `api_version`.
    #[must_use]
    pub fn root(&self, api_version: &str) -> &'static str {
        if api_version.eq_ignore_ascii_case("beta") {
            self.beta
        } else {
            self.stable
        }
    }
}

/// A regex-driven import rule used when imports cannot be derived from the
/// resolved request.
#[derive(Debug, Clone, Copy)]
pub struct ScanRule {
    /// Pattern with at most one capture group.
    pub pattern: &'static str,
    /// Group the produced import belongs to.
    pub group: crate::imports::ImportGroup,
    /// Import text; `{root}`, `{name}`, `{snake}` and `{package}` (the
    /// capture without a leading `graph`) are substituted.
    pub template: &'static str,
    /// Captures ending in any of these are skipped.
    pub exclude_suffixes: &'static [&'static str],
}

/// A supported target language.
pub struct LanguageProfile {
    /// Primary identifier, e.g. `csharp`.
    pub id: &'static str,
    /// Other accepted identifiers.
    pub aliases: &'static [&'static str],
    /// Casing of property and field names.
    pub property_casing: Casing,
    /// Casing of request builder accessors.
    pub navigation_casing: Casing,
    /// Casing of local variables.
    pub local_casing: Casing,
    /// Reserved words, compared case-insensitively when
    /// `reserved_case_insensitive` is set.
    pub reserved_words: &'static [&'static str],
    /// Whether reserved words match regardless of case.
    pub reserved_case_insensitive: bool,
    /// Escape for reserved identifiers.
    pub escape: ReservedEscape,
    /// Whether calls are awaited.
    pub is_async: bool,
    /// Object construction style.
    pub construction: ConstructionStyle,
    /// Whether scalar call arguments are passed by pointer to a local.
    pub pointer_arguments: bool,
    /// Line comment prefix.
    pub comment: &'static str,
    /// Tab name on the SDK documentation site.
    pub docs_tab: &'static str,
    /// SDK package roots.
    pub layout: SdkLayout,
    /// Fallback import rules.
    pub scan_rules: &'static [ScanRule],
    /// Syntax strategy.
    pub syntax: &'static dyn LanguageSyntax,
}

impl fmt::Debug for LanguageProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageProfile")
            .field("id", &self.id)
            .field("aliases", &self.aliases)
            .field("construction", &self.construction)
            .finish_non_exhaustive()
    }
}

impl LanguageProfile {
    /// Whether `id` names this language.
    #[must_use]
    pub fn matches(&self, id: &str) -> bool {
        self.id.eq_ignore_ascii_case(id) || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(id))
    }
}

/// Inputs shared by one rendering pass.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Target language.
    pub profile: &'static LanguageProfile,
    /// Request being rendered.
    pub request: &'a ResolvedRequest,
    /// SDK root package for the request's API version.
    pub sdk_root: &'static str,
}

impl<'a> RenderContext<'a> {
    /// Context for rendering `request` in `profile`.
    #[must_use]
    pub fn new(profile: &'static LanguageProfile, request: &'a ResolvedRequest) -> Self {
        Self {
            profile,
            request,
            sdk_root: profile.layout.root(&request.api_version),
        }
    }
}

/// A query option ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryEntry {
    /// Option name without a `$` prefix, e.g. `select` or `startDateTime`.
    pub name: String,
    /// Typed value.
    pub value: ScalarValue,
}

/// Rendered request configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    /// Statements declared before the call.
    pub declarations: Vec<String>,
    /// Argument passed to the verb call.
    pub argument: Option<String>,
}

/// Parts of the final verb call.
#[derive(Debug, Clone)]
pub struct CallParts<'a> {
    /// Client variable.
    pub client: &'a str,
    /// Rendered navigation chain, starting with `.`.
    pub chain: &'a str,
    /// HTTP method.
    pub method: &'a Method,
    /// Body variable, when a body is sent.
    pub body: Option<&'a str>,
    /// Configuration argument.
    pub configuration: Option<&'a str>,
    /// Whether the call's result is captured.
    pub has_result: bool,
    /// Whether the call is awaited.
    pub awaited: bool,
}

/// Facts about a snippet that decide language support imports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Features {
    /// A guid literal or guid collection.
    pub guid: bool,
    /// A date-time literal.
    pub date_time: bool,
    /// A calendar date literal.
    pub date: bool,
    /// A time-of-day literal.
    pub time_of_day: bool,
    /// A duration literal.
    pub duration: bool,
    /// A binary literal inside the body.
    pub binary: bool,
    /// A text body sent as a stream.
    pub text_stream: bool,
    /// A binary body sent as a stream.
    pub binary_stream: bool,
    /// Query options are configured.
    pub query: bool,
    /// Request headers are configured.
    pub headers: bool,
}

impl Features {
    /// Whether a request configuration is rendered.
    #[must_use]
    pub fn configuration(&self) -> bool {
        self.query || self.headers
    }
}

/// Syntax strategy of one language.
///
/// The walker only decides *what* to emit; every token of target syntax
/// comes from here. Statement-style hooks have expression-style defaults so
/// languages only implement the hooks their construction style uses.
pub trait LanguageSyntax: Send + Sync {
    /// Text literal.
    fn string_literal(&self, value: &str) -> String {
        crate::literal::quote(value)
    }

    /// Integer literal used in paths and query options.
    fn integer_literal(&self, value: i64) -> String {
        value.to_string()
    }

    /// Number literal of a body value.
    fn number_literal(&self, raw: &str, width: NumberWidth, kind: NumberKind) -> String;

    /// Boolean literal.
    fn boolean_literal(&self, value: bool) -> String;

    /// Null literal.
    fn null_literal(&self) -> &'static str;

    /// Guid literal.
    fn guid_literal(&self, raw: &str) -> String;

    /// Temporal literal.
    fn temporal_literal(&self, raw: &str, kind: TemporalKind) -> String;

    /// Byte array literal from base64 text.
    fn binary_literal(&self, base64: &str) -> String;

    /// Enum literal; several members combine with the language's OR.
    fn enum_literal(
        &self,
        ctx: &RenderContext<'_>,
        type_name: &TypeName,
        members: &[String],
    ) -> String;

    /// List of text items, used for query options.
    fn string_list(&self, items: &[String]) -> String;

    /// How construction refers to `type_name`: a class name or a constructor
    /// call.
    fn type_reference(&self, ctx: &RenderContext<'_>, type_name: &TypeName) -> String;

    /// Element type of a typed collection.
    fn element_type(&self, ctx: &RenderContext<'_>, item: &ValueType) -> String;

    /// Import making `type_name` available.
    fn type_import(&self, ctx: &RenderContext<'_>, type_name: &TypeName) -> Import;

    /// Object initializer expression. Fields are `(cased name, expression)`.
    fn object_expression(
        &self,
        type_ref: &str,
        fields: &[(String, String)],
        indent: usize,
    ) -> String {
        let _ = (fields, indent);
        type_ref.to_owned()
    }

    /// Collection literal.
    fn collection_expression(&self, element: &str, items: &[String], indent: usize) -> String;

    /// Map literal. Keys are raw JSON names.
    fn map_expression(&self, entries: &[(String, String)], indent: usize) -> String;

    /// Declaration of the request body variable.
    fn body_declaration(&self, var: &str, expr: &str) -> String;

    /// Declaration of a stream body from a byte expression.
    fn stream_declaration(&self, var: &str, bytes: &str) -> String;

    /// Bytes of a text literal.
    fn text_bytes(&self, literal: &str) -> String;

    /// Declaration of a freshly constructed object local.
    fn object_declaration(&self, var: &str, type_ref: &str) -> String {
        self.body_declaration(var, type_ref)
    }

    /// Whether a value must be bound to a local before it can be used,
    /// e.g. calls returning a value and an error.
    fn binds_local(&self, node: &PropertyNode) -> bool {
        let _ = node;
        false
    }

    /// Declaration of a local holding a leaf or container value.
    fn local_declaration(&self, var: &str, node: &PropertyNode, expr: &str) -> String {
        let _ = node;
        self.body_declaration(var, expr)
    }

    /// Assignment of `value` to `field` of `target`.
    fn field_assignment(
        &self,
        target: &str,
        field: &str,
        value: &str,
        node: &PropertyNode,
    ) -> String {
        let _ = node;
        format!("{target}.{field} = {value}")
    }

    /// Request builder accessor.
    fn accessor(&self, name: &str) -> String;

    /// Keyed item accessor for the `key_param` placeholder.
    fn keyed(&self, key_param: &str) -> String;

    /// Request builder method call.
    fn call(&self, name: &str, args: &[String]) -> String;

    /// Query and header configuration; `None` when neither is present.
    fn configuration(
        &self,
        ctx: &RenderContext<'_>,
        locals: &mut LocalNames,
        query: &[QueryEntry],
        headers: &[Header],
    ) -> Option<Configuration>;

    /// The verb call statement.
    fn call_statement(&self, ctx: &RenderContext<'_>, call: &CallParts<'_>) -> String;

    /// Root client and language support imports.
    fn support_imports(&self, ctx: &RenderContext<'_>, features: &Features) -> Vec<Import>;

    /// Imports needed by the request configuration.
    fn configuration_imports(&self, ctx: &RenderContext<'_>, features: &Features) -> Vec<Import>;

    /// Render the ordered import list.
    fn format_imports(&self, imports: &[Import]) -> String;
}
