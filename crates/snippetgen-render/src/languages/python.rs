//! Python: keyword-argument constructors and a `RequestConfiguration`
//! object for query options and headers.

use snippetgen_core::naming::{Casing, to_pascal_case};
use snippetgen_model::{
    Header, NumberKind, NumberWidth, ScalarValue, TemporalKind, TypeName, TypeOrigin, ValueType,
};

use crate::imports::{Import, ImportGroup};
use crate::literal::{IsoDuration, normalize_date_time, parse_date, parse_time_of_day, time_components};
use crate::naming::{
    LocalNames, builder_class_stem, model_sub_namespace, property_name, request_builder_path,
    type_builder_path,
};
use crate::profile::{
    CallParts, Configuration, ConstructionStyle, Features, LanguageProfile, LanguageSyntax,
    QueryEntry, RenderContext, ReservedEscape, ScanRule, SdkLayout,
};

const RESERVED: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

const SCAN_RULES: &[ScanRule] = &[
    ScanRule {
        pattern: r"\b([A-Z][A-Za-z0-9]*)\(",
        group: ImportGroup::Models,
        template: "from {root}.generated.models.{snake} import {name}",
        exclude_suffixes: &["RequestConfiguration", "QueryParameters", "RequestBody", "UUID"],
    },
    ScanRule {
        pattern: r"\b([A-Z][A-Za-z0-9]*)\.[A-Z]",
        group: ImportGroup::Models,
        template: "from {root}.generated.models.{snake} import {name}",
        exclude_suffixes: &["RequestBuilder"],
    },
];

/// The Python profile.
pub static PYTHON: LanguageProfile = LanguageProfile {
    id: "python",
    aliases: &["py"],
    property_casing: Casing::Snake,
    navigation_casing: Casing::Snake,
    local_casing: Casing::Snake,
    reserved_words: RESERVED,
    reserved_case_insensitive: false,
    escape: ReservedEscape::Suffix("_"),
    is_async: true,
    construction: ConstructionStyle::Expression,
    pointer_arguments: false,
    comment: "#",
    docs_tab: "python",
    layout: SdkLayout {
        stable: "msgraph",
        beta: "msgraph_beta",
        me_as_user_item: true,
    },
    scan_rules: SCAN_RULES,
    syntax: &PythonSyntax,
};

#[derive(Debug)]
struct PythonSyntax;

fn pad(indent: usize) -> String {
    "\t".repeat(indent)
}

fn snake_path<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .map(|p| Casing::Snake.apply(p.as_ref()))
        .collect::<Vec<_>>()
        .join(".")
}

/// `{Stem}RequestBuilder` of the request being rendered.
fn builder_class(ctx: &RenderContext<'_>) -> String {
    format!("{}RequestBuilder", builder_class_stem(&request_builder_path(ctx)))
}

impl PythonSyntax {
    fn scalar(&self, value: &ScalarValue) -> String {
        match value {
            ScalarValue::String(s) => self.string_literal(s),
            ScalarValue::Integer(n) => self.integer_literal(*n),
            ScalarValue::Boolean(b) => self.boolean_literal(*b),
            ScalarValue::List(items) => self.string_list(items),
        }
    }
}

impl LanguageSyntax for PythonSyntax {
    fn number_literal(&self, raw: &str, _width: NumberWidth, _kind: NumberKind) -> String {
        raw.to_owned()
    }

    fn boolean_literal(&self, value: bool) -> String {
        if value { "True" } else { "False" }.to_owned()
    }

    fn null_literal(&self) -> &'static str {
        "None"
    }

    fn guid_literal(&self, raw: &str) -> String {
        format!("UUID({})", self.string_literal(raw))
    }

    fn temporal_literal(&self, raw: &str, kind: TemporalKind) -> String {
        match kind {
            TemporalKind::DateTime => format!(
                "datetime.fromisoformat({})",
                self.string_literal(&normalize_date_time(raw, false))
            ),
            TemporalKind::Date => match parse_date(raw) {
                Some(date) => {
                    use chrono::Datelike;
                    format!("date({}, {}, {})", date.year(), date.month(), date.day())
                }
                None => format!("date.fromisoformat({})", self.string_literal(raw)),
            },
            TemporalKind::TimeOfDay => match parse_time_of_day(raw) {
                Some(time) => {
                    let (h, m, s) = time_components(time);
                    format!("time({h}, {m}, {s})")
                }
                None => format!("time.fromisoformat({})", self.string_literal(raw)),
            },
            TemporalKind::Duration => match IsoDuration::parse(raw) {
                Some(d) => {
                    let mut args = Vec::new();
                    if d.days > 0 {
                        args.push(format!("days={}", d.days));
                    }
                    if d.hours > 0 {
                        args.push(format!("hours={}", d.hours));
                    }
                    if d.minutes > 0 {
                        args.push(format!("minutes={}", d.minutes));
                    }
                    if d.seconds > 0.0 {
                        args.push(format!("seconds={}", d.seconds));
                    }
                    format!("timedelta({})", args.join(", "))
                }
                None => self.string_literal(raw),
            },
        }
    }

    fn binary_literal(&self, base64: &str) -> String {
        format!("base64.b64decode({})", self.string_literal(base64))
    }

    fn enum_literal(&self, _ctx: &RenderContext<'_>, type_name: &TypeName, members: &[String]) -> String {
        let ty = to_pascal_case(&type_name.name);
        members
            .iter()
            .map(|m| format!("{ty}.{}", to_pascal_case(m)))
            .collect::<Vec<_>>()
            .join(" | ")
    }

    fn string_list(&self, items: &[String]) -> String {
        let items: Vec<String> = items.iter().map(|i| self.string_literal(i)).collect();
        format!("[{}]", items.join(", "))
    }

    fn type_reference(&self, _ctx: &RenderContext<'_>, type_name: &TypeName) -> String {
        to_pascal_case(&type_name.name)
    }

    fn element_type(&self, _ctx: &RenderContext<'_>, _item: &ValueType) -> String {
        String::new()
    }

    fn type_import(&self, ctx: &RenderContext<'_>, type_name: &TypeName) -> Import {
        let class = to_pascal_case(&type_name.name);
        let module = Casing::Snake.apply(&type_name.name);
        match type_name.origin {
            TypeOrigin::Model => {
                let mut package = format!("{}.generated.models", ctx.sdk_root);
                for part in model_sub_namespace(ctx, type_name) {
                    package.push('.');
                    package.push_str(&Casing::Snake.apply(part));
                }
                Import::model(format!("from {package}.{module} import {class}"))
            }
            TypeOrigin::RequestBuilder => {
                let path = snake_path(&type_builder_path(ctx.profile, type_name));
                Import::configuration(format!(
                    "from {}.generated.{path}.{module} import {class}",
                    ctx.sdk_root
                ))
            }
        }
    }

    fn object_expression(&self, type_ref: &str, fields: &[(String, String)], indent: usize) -> String {
        let (outer, inner) = (pad(indent), pad(indent + 1));
        let mut out = format!("{type_ref}(\n");
        for (name, value) in fields {
            out.push_str(&format!("{inner}{name} = {value},\n"));
        }
        out.push_str(&format!("{outer})"));
        out
    }

    fn collection_expression(&self, _element: &str, items: &[String], indent: usize) -> String {
        let (outer, inner) = (pad(indent), pad(indent + 1));
        let mut out = String::from("[\n");
        for item in items {
            out.push_str(&format!("{inner}{item},\n"));
        }
        out.push_str(&format!("{outer}]"));
        out
    }

    fn map_expression(&self, entries: &[(String, String)], indent: usize) -> String {
        let (outer, inner) = (pad(indent), pad(indent + 1));
        let mut out = String::from("{\n");
        for (key, value) in entries {
            out.push_str(&format!("{inner}{} : {value},\n", self.string_literal(key)));
        }
        out.push_str(&format!("{outer}}}"));
        out
    }

    fn body_declaration(&self, var: &str, expr: &str) -> String {
        format!("{var} = {expr}")
    }

    fn stream_declaration(&self, var: &str, bytes: &str) -> String {
        format!("{var} = {bytes}")
    }

    fn text_bytes(&self, literal: &str) -> String {
        format!("{literal}.encode(\"utf-8\")")
    }

    fn accessor(&self, name: &str) -> String {
        format!(".{name}")
    }

    fn keyed(&self, key_param: &str) -> String {
        format!(
            ".by_{}({})",
            Casing::Snake.apply(key_param),
            self.string_literal(key_param)
        )
    }

    fn call(&self, name: &str, args: &[String]) -> String {
        format!(".{name}({})", args.join(", "))
    }

    fn configuration(
        &self,
        ctx: &RenderContext<'_>,
        locals: &mut LocalNames,
        query: &[QueryEntry],
        headers: &[Header],
    ) -> Option<Configuration> {
        if query.is_empty() && headers.is_empty() {
            return None;
        }
        let mut declarations = Vec::new();
        let config_var = locals.allocate("request_configuration");

        if query.is_empty() {
            declarations.push(format!("{config_var} = RequestConfiguration()"));
        } else {
            let params_var = locals.allocate("query_params");
            let class = builder_class(ctx);
            let verb = to_pascal_case(&ctx.request.method.as_str().to_ascii_lowercase());
            let mut params = format!("{params_var} = {class}.{class}{verb}QueryParameters(\n");
            for entry in query {
                params.push_str(&format!(
                    "\t{} = {},\n",
                    property_name(ctx.profile, &entry.name),
                    self.scalar(&entry.value)
                ));
            }
            params.push(')');
            declarations.push(params);
            declarations.push(String::new());
            declarations.push(format!(
                "{config_var} = RequestConfiguration(\n\tquery_parameters = {params_var},\n)"
            ));
        }
        for header in headers {
            declarations.push(format!(
                "{config_var}.headers.add({}, {})",
                self.string_literal(&header.name),
                self.string_literal(&header.value)
            ));
        }
        Some(Configuration {
            declarations,
            argument: Some(format!("request_configuration = {config_var}")),
        })
    }

    fn call_statement(&self, _ctx: &RenderContext<'_>, call: &CallParts<'_>) -> String {
        let verb = call.method.as_str().to_ascii_lowercase();
        let args: Vec<&str> = call.body.into_iter().chain(call.configuration).collect();
        let capture = if call.has_result { "result = " } else { "" };
        let wait = if call.awaited { "await " } else { "" };
        format!(
            "{capture}{wait}{}{}.{verb}({})",
            call.client,
            call.chain,
            args.join(", ")
        )
    }

    fn support_imports(&self, ctx: &RenderContext<'_>, features: &Features) -> Vec<Import> {
        let mut imports = vec![Import::root(format!(
            "from {} import GraphServiceClient",
            ctx.sdk_root
        ))];
        if features.binary || features.binary_stream {
            imports.push(Import::root("import base64"));
        }
        if features.guid {
            imports.push(Import::root("from uuid import UUID"));
        }
        let temporal: Vec<&str> = [
            (features.date, "date"),
            (features.date_time, "datetime"),
            (features.time_of_day, "time"),
            (features.duration, "timedelta"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect();
        if !temporal.is_empty() {
            imports.push(Import::root(format!("from datetime import {}", temporal.join(", "))));
        }
        imports
    }

    fn configuration_imports(&self, ctx: &RenderContext<'_>, features: &Features) -> Vec<Import> {
        let mut imports = vec![Import::configuration(
            "from kiota_abstractions.base_request_configuration import RequestConfiguration",
        )];
        if features.query {
            let path = request_builder_path(ctx);
            let stem = builder_class_stem(&path);
            imports.push(Import::configuration(format!(
                "from {}.generated.{}.{}_request_builder import {}",
                ctx.sdk_root,
                snake_path(&path),
                Casing::Snake.apply(&stem),
                builder_class(ctx)
            )));
        }
        imports
    }

    fn format_imports(&self, imports: &[Import]) -> String {
        imports
            .iter()
            .map(|i| i.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
