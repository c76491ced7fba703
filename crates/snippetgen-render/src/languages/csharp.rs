//! C#: nested object initializers, awaited `Async` verbs and a lambda for
//! request configuration.

use snippetgen_core::naming::{Casing, to_pascal_case};
use snippetgen_model::{
    Header, NumberKind, NumberWidth, ScalarValue, TemporalKind, TypeName, TypeOrigin, ValueType,
};

use crate::imports::{Import, ImportGroup};
use crate::literal::{IsoDuration, normalize_date_time, parse_date, parse_time_of_day, time_components};
use crate::naming::{LocalNames, model_sub_namespace, property_name};
use crate::profile::{
    CallParts, Configuration, ConstructionStyle, Features, LanguageProfile, LanguageSyntax,
    QueryEntry, RenderContext, ReservedEscape, ScanRule, SdkLayout,
};

const RESERVED: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

const SCAN_RULES: &[ScanRule] = &[
    ScanRule {
        pattern: r"\bnew ([A-Z][A-Za-z0-9]*)",
        group: ImportGroup::Models,
        template: "{root}.Models",
        exclude_suffixes: &["List", "Dictionary", "MemoryStream", "TimeSpan", "Date", "Time"],
    },
    ScanRule {
        pattern: r"\b([A-Z][A-Za-z0-9]*)\.[A-Z][A-Za-z0-9]*\b",
        group: ImportGroup::Models,
        template: "{root}.Models",
        exclude_suffixes: &[
            "Guid",
            "DateTimeOffset",
            "Convert",
            "Encoding",
            "QueryParameters",
            "Headers",
            "XmlConvert",
            "TimeSpan",
        ],
    },
];

/// The C# profile.
pub static CSHARP: LanguageProfile = LanguageProfile {
    id: "csharp",
    aliases: &["c#", "cs", "dotnet"],
    property_casing: Casing::Pascal,
    navigation_casing: Casing::Pascal,
    local_casing: Casing::Camel,
    reserved_words: RESERVED,
    reserved_case_insensitive: false,
    escape: ReservedEscape::Prefix("@"),
    is_async: true,
    construction: ConstructionStyle::Expression,
    pointer_arguments: false,
    comment: "//",
    docs_tab: "csharp",
    layout: SdkLayout {
        stable: "Microsoft.Graph",
        beta: "Microsoft.Graph.Beta",
        me_as_user_item: false,
    },
    scan_rules: SCAN_RULES,
    syntax: &CSharpSyntax,
};

#[derive(Debug)]
struct CSharpSyntax;

fn pad(indent: usize) -> String {
    "\t".repeat(indent)
}

impl LanguageSyntax for CSharpSyntax {
    fn number_literal(&self, raw: &str, width: NumberWidth, kind: NumberKind) -> String {
        match (width, kind) {
            (NumberWidth::W32, NumberKind::Int) => raw.to_owned(),
            (NumberWidth::W64, NumberKind::Int) => format!("{raw}L"),
            (NumberWidth::W32, NumberKind::Float) => format!("{raw}f"),
            (NumberWidth::W64, NumberKind::Float) => format!("{raw}d"),
        }
    }

    fn boolean_literal(&self, value: bool) -> String {
        value.to_string()
    }

    fn null_literal(&self) -> &'static str {
        "null"
    }

    fn guid_literal(&self, raw: &str) -> String {
        format!("Guid.Parse({})", self.string_literal(raw))
    }

    fn temporal_literal(&self, raw: &str, kind: TemporalKind) -> String {
        match kind {
            TemporalKind::DateTime => format!(
                "DateTimeOffset.Parse({})",
                self.string_literal(&normalize_date_time(raw, true))
            ),
            TemporalKind::Date => match parse_date(raw) {
                Some(date) => {
                    use chrono::Datelike;
                    format!("new Date({}, {}, {})", date.year(), date.month(), date.day())
                }
                None => format!("new Date(DateTime.Parse({}))", self.string_literal(raw)),
            },
            TemporalKind::TimeOfDay => match parse_time_of_day(raw) {
                Some(time) => {
                    let (h, m, s) = time_components(time);
                    format!("new Time({h}, {m}, {s})")
                }
                None => format!("new Time(DateTime.Parse({}))", self.string_literal(raw)),
            },
            TemporalKind::Duration => match IsoDuration::parse(raw) {
                Some(d) if d.seconds.fract().abs() < f64::EPSILON => format!(
                    "new TimeSpan({}, {}, {}, {})",
                    d.days, d.hours, d.minutes, d.seconds
                ),
                _ => format!(
                    "System.Xml.XmlConvert.ToTimeSpan({})",
                    self.string_literal(raw)
                ),
            },
        }
    }

    fn binary_literal(&self, base64: &str) -> String {
        format!("Convert.FromBase64String({})", self.string_literal(base64))
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
        format!("new string []{{ {} }}", items.join(", "))
    }

    fn type_reference(&self, _ctx: &RenderContext<'_>, type_name: &TypeName) -> String {
        to_pascal_case(&type_name.name)
    }

    fn element_type(&self, ctx: &RenderContext<'_>, item: &ValueType) -> String {
        match item {
            ValueType::String => "string".to_owned(),
            ValueType::Boolean => "bool?".to_owned(),
            ValueType::Number(NumberWidth::W32, NumberKind::Int) => "int?".to_owned(),
            ValueType::Number(NumberWidth::W64, NumberKind::Int) => "long?".to_owned(),
            ValueType::Number(NumberWidth::W32, NumberKind::Float) => "float?".to_owned(),
            ValueType::Number(NumberWidth::W64, NumberKind::Float) => "double?".to_owned(),
            ValueType::Guid => "Guid?".to_owned(),
            ValueType::Temporal(TemporalKind::DateTime) => "DateTimeOffset?".to_owned(),
            ValueType::Temporal(TemporalKind::Date) => "Date?".to_owned(),
            ValueType::Temporal(TemporalKind::TimeOfDay) => "Time?".to_owned(),
            ValueType::Temporal(TemporalKind::Duration) => "TimeSpan?".to_owned(),
            ValueType::Binary => "byte[]".to_owned(),
            ValueType::Enum(type_name) => format!("{}?", self.type_reference(ctx, type_name)),
            ValueType::Object(type_name) => self.type_reference(ctx, type_name),
            ValueType::Untyped => "object".to_owned(),
        }
    }

    fn type_import(&self, ctx: &RenderContext<'_>, type_name: &TypeName) -> Import {
        match type_name.origin {
            TypeOrigin::Model => {
                let mut namespace = format!("{}.Models", ctx.sdk_root);
                for part in model_sub_namespace(ctx, type_name) {
                    namespace.push('.');
                    namespace.push_str(&to_pascal_case(part));
                }
                Import::model(namespace)
            }
            TypeOrigin::RequestBuilder => {
                let mut namespace = ctx.sdk_root.to_owned();
                for part in type_name.builder_path() {
                    namespace.push('.');
                    namespace.push_str(&to_pascal_case(part));
                }
                Import::configuration(namespace)
            }
        }
    }

    fn object_expression(&self, type_ref: &str, fields: &[(String, String)], indent: usize) -> String {
        let (outer, inner) = (pad(indent), pad(indent + 1));
        let mut out = format!("new {type_ref}\n{outer}{{\n");
        for (name, value) in fields {
            out.push_str(&format!("{inner}{name} = {value},\n"));
        }
        out.push_str(&format!("{outer}}}"));
        out
    }

    fn collection_expression(&self, element: &str, items: &[String], indent: usize) -> String {
        let (outer, inner) = (pad(indent), pad(indent + 1));
        let mut out = format!("new List<{element}>\n{outer}{{\n");
        for item in items {
            out.push_str(&format!("{inner}{item},\n"));
        }
        out.push_str(&format!("{outer}}}"));
        out
    }

    fn map_expression(&self, entries: &[(String, String)], indent: usize) -> String {
        let (outer, inner) = (pad(indent), pad(indent + 1));
        let mut out = format!("new Dictionary<string, object>\n{outer}{{\n");
        for (key, value) in entries {
            out.push_str(&format!(
                "{inner}{{\n{inner}\t{}, {value}\n{inner}}},\n",
                self.string_literal(key)
            ));
        }
        out.push_str(&format!("{outer}}}"));
        out
    }

    fn body_declaration(&self, var: &str, expr: &str) -> String {
        format!("var {var} = {expr};")
    }

    fn stream_declaration(&self, var: &str, bytes: &str) -> String {
        format!("using var {var} = new MemoryStream({bytes});")
    }

    fn text_bytes(&self, literal: &str) -> String {
        format!("Encoding.UTF8.GetBytes({literal})")
    }

    fn accessor(&self, name: &str) -> String {
        format!(".{name}")
    }

    fn keyed(&self, key_param: &str) -> String {
        format!("[\"{{{key_param}}}\"]")
    }

    fn call(&self, name: &str, args: &[String]) -> String {
        format!(".{name}({})", args.join(", "))
    }

    fn configuration(
        &self,
        ctx: &RenderContext<'_>,
        _locals: &mut LocalNames,
        query: &[QueryEntry],
        headers: &[Header],
    ) -> Option<Configuration> {
        if query.is_empty() && headers.is_empty() {
            return None;
        }
        let mut lambda = String::from("(requestConfiguration) =>\n{\n");
        for entry in query {
            let value = match &entry.value {
                ScalarValue::String(s) => self.string_literal(s),
                ScalarValue::Integer(n) => self.integer_literal(*n),
                ScalarValue::Boolean(b) => self.boolean_literal(*b),
                ScalarValue::List(items) => self.string_list(items),
            };
            lambda.push_str(&format!(
                "\trequestConfiguration.QueryParameters.{} = {value};\n",
                property_name(ctx.profile, &entry.name)
            ));
        }
        for header in headers {
            lambda.push_str(&format!(
                "\trequestConfiguration.Headers.Add({}, {});\n",
                self.string_literal(&header.name),
                self.string_literal(&header.value)
            ));
        }
        lambda.push('}');
        Some(Configuration {
            declarations: Vec::new(),
            argument: Some(lambda),
        })
    }

    fn call_statement(&self, _ctx: &RenderContext<'_>, call: &CallParts<'_>) -> String {
        let verb = to_pascal_case(&call.method.as_str().to_ascii_lowercase());
        let args: Vec<&str> = call.body.into_iter().chain(call.configuration).collect();
        let capture = if call.has_result { "var result = " } else { "" };
        let wait = if call.awaited { "await " } else { "" };
        format!(
            "{capture}{wait}{}{}.{verb}Async({});",
            call.client,
            call.chain,
            args.join(", ")
        )
    }

    fn support_imports(&self, ctx: &RenderContext<'_>, features: &Features) -> Vec<Import> {
        let mut imports = vec![Import::root(ctx.sdk_root)];
        if features.guid
            || features.date_time
            || features.duration
            || features.binary
            || features.binary_stream
        {
            imports.push(Import::root("System"));
        }
        if features.date || features.time_of_day {
            imports.push(Import::root("Microsoft.Kiota.Abstractions"));
        }
        if features.text_stream || features.binary_stream {
            imports.push(Import::root("System.IO"));
        }
        if features.text_stream {
            imports.push(Import::root("System.Text"));
        }
        imports
    }

    fn configuration_imports(&self, _ctx: &RenderContext<'_>, _features: &Features) -> Vec<Import> {
        Vec::new()
    }

    fn format_imports(&self, imports: &[Import]) -> String {
        imports
            .iter()
            .map(|i| format!("using {};", i.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
