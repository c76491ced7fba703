//! Go: constructor functions with setter statements, pointer arguments and
//! explicit request configuration structs.

use snippetgen_core::naming::{Casing, to_pascal_case};
use snippetgen_model::{
    Header, NumberKind, NumberWidth, PropertyNode, ScalarValue, TemporalKind, TypeName,
    TypeOrigin, ValueType,
};

use crate::imports::{Import, ImportGroup};
use crate::literal::normalize_date_time;
use crate::naming::{
    LocalNames, builder_class_stem, inner_prefix, model_sub_namespace, request_builder_path,
    type_builder_path,
};
use crate::profile::{
    CallParts, Configuration, ConstructionStyle, Features, LanguageProfile, LanguageSyntax,
    QueryEntry, RenderContext, ReservedEscape, ScanRule, SdkLayout,
};

const RESERVED: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

const SCAN_RULES: &[ScanRule] = &[
    ScanRule {
        pattern: r"\bgraphmodels\.",
        group: ImportGroup::Models,
        template: r#"graphmodels "{root}/models""#,
        exclude_suffixes: &[],
    },
    ScanRule {
        pattern: r"\b(graph[a-z]+)\.(?:New)?[A-Z]\w*Request(?:Body|Builder)",
        group: ImportGroup::RequestConfiguration,
        template: r#"{name} "{root}/{package}""#,
        exclude_suffixes: &["graphmodels"],
    },
];

const KIOTA_ABSTRACTIONS: &str = "github.com/microsoft/kiota-abstractions-go";

/// The Go profile.
pub static GO: LanguageProfile = LanguageProfile {
    id: "go",
    aliases: &["golang"],
    property_casing: Casing::Pascal,
    navigation_casing: Casing::Pascal,
    local_casing: Casing::Camel,
    reserved_words: RESERVED,
    reserved_case_insensitive: true,
    escape: ReservedEscape::Suffix("Escaped"),
    is_async: false,
    construction: ConstructionStyle::Statement,
    pointer_arguments: true,
    comment: "//",
    docs_tab: "go",
    layout: SdkLayout {
        stable: "github.com/microsoftgraph/msgraph-sdk-go",
        beta: "github.com/microsoftgraph/msgraph-beta-sdk-go",
        me_as_user_item: true,
    },
    scan_rules: SCAN_RULES,
    syntax: &GoSyntax,
};

#[derive(Debug)]
struct GoSyntax;

fn pad(indent: usize) -> String {
    "\t".repeat(indent)
}

/// Package alias and class name of a type, e.g.
/// `("graphmodelssecurity", "AlertComment")`.
fn go_type(ctx: &RenderContext<'_>, type_name: &TypeName) -> (String, String) {
    match type_name.origin {
        TypeOrigin::Model => {
            let sub: String = model_sub_namespace(ctx, type_name)
                .iter()
                .map(|s| s.to_ascii_lowercase())
                .collect();
            (format!("graphmodels{sub}"), to_pascal_case(&type_name.name))
        }
        TypeOrigin::RequestBuilder => {
            let path = type_builder_path(ctx.profile, type_name);
            (
                builder_package(&path),
                format!("{}{}", inner_prefix(&path), to_pascal_case(&type_name.name)),
            )
        }
    }
}

/// `graph{first path element}`, e.g. `graphusers`.
fn builder_package(path: &[String]) -> String {
    format!(
        "graph{}",
        path.first().map(|p| p.to_ascii_lowercase()).unwrap_or_default()
    )
}

/// Class prefix of the request being rendered, e.g. `ItemMessages` and
/// `MessageItem` combine into `ItemMessagesMessageItem`.
fn builder_class(path: &[String]) -> String {
    format!("{}{}RequestBuilder", inner_prefix(path), builder_class_stem(path))
}

impl GoSyntax {
    fn scalar(&self, value: &ScalarValue) -> String {
        match value {
            ScalarValue::String(s) => self.string_literal(s),
            ScalarValue::Integer(n) => self.integer_literal(*n),
            ScalarValue::Boolean(b) => self.boolean_literal(*b),
            ScalarValue::List(items) => self.string_list(items),
        }
    }
}

impl LanguageSyntax for GoSyntax {
    fn integer_literal(&self, value: i64) -> String {
        format!("int32({value})")
    }

    fn number_literal(&self, raw: &str, width: NumberWidth, kind: NumberKind) -> String {
        match (width, kind) {
            (NumberWidth::W32, NumberKind::Int) => format!("int32({raw})"),
            (NumberWidth::W64, NumberKind::Int) => format!("int64({raw})"),
            (NumberWidth::W32, NumberKind::Float) => format!("float32({raw})"),
            (NumberWidth::W64, NumberKind::Float) => format!("float64({raw})"),
        }
    }

    fn boolean_literal(&self, value: bool) -> String {
        value.to_string()
    }

    fn null_literal(&self) -> &'static str {
        "nil"
    }

    fn guid_literal(&self, raw: &str) -> String {
        format!("uuid.MustParse({})", self.string_literal(raw))
    }

    fn temporal_literal(&self, raw: &str, kind: TemporalKind) -> String {
        match kind {
            TemporalKind::DateTime => format!(
                "time.Parse(time.RFC3339, {})",
                self.string_literal(&normalize_date_time(raw, true))
            ),
            TemporalKind::Date => format!("serialization.ParseDateOnly({})", self.string_literal(raw)),
            TemporalKind::TimeOfDay => {
                format!("serialization.ParseTimeOnly({})", self.string_literal(raw))
            }
            TemporalKind::Duration => {
                format!("serialization.ParseISODuration({})", self.string_literal(raw))
            }
        }
    }

    fn binary_literal(&self, base64: &str) -> String {
        format!("base64.StdEncoding.DecodeString({})", self.string_literal(base64))
    }

    fn enum_literal(&self, ctx: &RenderContext<'_>, type_name: &TypeName, members: &[String]) -> String {
        let (package, _) = go_type(ctx, type_name);
        let ty = type_name.name.to_ascii_uppercase();
        members
            .iter()
            .map(|m| format!("{package}.{}_{ty}", m.to_ascii_uppercase()))
            .collect::<Vec<_>>()
            .join(" | ")
    }

    fn string_list(&self, items: &[String]) -> String {
        let items: Vec<String> = items.iter().map(|i| self.string_literal(i)).collect();
        format!("[] string {{{}}}", items.join(", "))
    }

    fn type_reference(&self, ctx: &RenderContext<'_>, type_name: &TypeName) -> String {
        let (package, class) = go_type(ctx, type_name);
        format!("{package}.New{class}()")
    }

    fn element_type(&self, ctx: &RenderContext<'_>, item: &ValueType) -> String {
        match item {
            ValueType::String => "string".to_owned(),
            ValueType::Boolean => "bool".to_owned(),
            ValueType::Number(NumberWidth::W32, NumberKind::Int) => "int32".to_owned(),
            ValueType::Number(NumberWidth::W64, NumberKind::Int) => "int64".to_owned(),
            ValueType::Number(NumberWidth::W32, NumberKind::Float) => "float32".to_owned(),
            ValueType::Number(NumberWidth::W64, NumberKind::Float) => "float64".to_owned(),
            ValueType::Guid => "uuid.UUID".to_owned(),
            ValueType::Temporal(TemporalKind::DateTime) => "time.Time".to_owned(),
            ValueType::Temporal(TemporalKind::Date) => "serialization.DateOnly".to_owned(),
            ValueType::Temporal(TemporalKind::TimeOfDay) => "serialization.TimeOnly".to_owned(),
            ValueType::Temporal(TemporalKind::Duration) => "serialization.ISODuration".to_owned(),
            ValueType::Binary => "[]byte".to_owned(),
            ValueType::Enum(type_name) => {
                let (package, class) = go_type(ctx, type_name);
                format!("{package}.{class}")
            }
            ValueType::Object(type_name) => {
                let (package, class) = go_type(ctx, type_name);
                format!("{package}.{class}able")
            }
            ValueType::Untyped => "interface{}".to_owned(),
        }
    }

    fn type_import(&self, ctx: &RenderContext<'_>, type_name: &TypeName) -> Import {
        match type_name.origin {
            TypeOrigin::Model => {
                let (package, _) = go_type(ctx, type_name);
                let mut location = format!("{}/models", ctx.sdk_root);
                for part in model_sub_namespace(ctx, type_name) {
                    location.push('/');
                    location.push_str(&part.to_ascii_lowercase());
                }
                Import::model(format!("{package} \"{location}\""))
            }
            TypeOrigin::RequestBuilder => {
                let path = type_builder_path(ctx.profile, type_name);
                Import::configuration(builder_import(ctx, &path))
            }
        }
    }

    fn collection_expression(&self, element: &str, items: &[String], indent: usize) -> String {
        let (outer, inner) = (pad(indent), pad(indent + 1));
        let mut out = format!("[]{element} {{\n");
        for item in items {
            out.push_str(&format!("{inner}{item},\n"));
        }
        out.push_str(&format!("{outer}}}"));
        out
    }

    fn map_expression(&self, entries: &[(String, String)], indent: usize) -> String {
        let (outer, inner) = (pad(indent), pad(indent + 1));
        let mut out = String::from("map[string]interface{}{\n");
        for (key, value) in entries {
            out.push_str(&format!("{inner}{} : {value},\n", self.string_literal(key)));
        }
        out.push_str(&format!("{outer}}}"));
        out
    }

    fn body_declaration(&self, var: &str, expr: &str) -> String {
        format!("{var} := {expr}")
    }

    fn stream_declaration(&self, var: &str, bytes: &str) -> String {
        format!("{var} := {bytes}")
    }

    fn text_bytes(&self, literal: &str) -> String {
        format!("[]byte({literal})")
    }

    fn binds_local(&self, node: &PropertyNode) -> bool {
        matches!(node, PropertyNode::DateTime { .. } | PropertyNode::Binary(_))
    }

    fn local_declaration(&self, var: &str, node: &PropertyNode, expr: &str) -> String {
        match node {
            PropertyNode::DateTime { .. } | PropertyNode::Binary(_) => format!("{var}, _ := {expr}"),
            _ => format!("{var} := {expr}"),
        }
    }

    fn field_assignment(&self, target: &str, field: &str, value: &str, node: &PropertyNode) -> String {
        let by_pointer = matches!(
            node,
            PropertyNode::String(_)
                | PropertyNode::Number { .. }
                | PropertyNode::Boolean(_)
                | PropertyNode::Guid(_)
                | PropertyNode::Enum { .. }
                | PropertyNode::DateTime {
                    kind: TemporalKind::DateTime,
                    ..
                }
        );
        if by_pointer {
            format!("{target}.Set{field}(&{value})")
        } else {
            format!("{target}.Set{field}({value})")
        }
    }

    fn accessor(&self, name: &str) -> String {
        format!(".{name}()")
    }

    fn keyed(&self, key_param: &str) -> String {
        format!(
            ".By{}({})",
            to_pascal_case(key_param),
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
        let path = request_builder_path(ctx);
        let package = builder_package(&path);
        let class = builder_class(&path);
        let verb = to_pascal_case(&ctx.request.method.as_str().to_ascii_lowercase());
        let mut declarations = Vec::new();

        let headers_var = (!headers.is_empty()).then(|| {
            let var = locals.allocate("headers");
            declarations.push(format!("{var} := abstractions.NewRequestHeaders()"));
            for header in headers {
                declarations.push(format!(
                    "{var}.Add({}, {})",
                    self.string_literal(&header.name),
                    self.string_literal(&header.value)
                ));
            }
            declarations.push(String::new());
            var
        });

        let params_var = (!query.is_empty()).then(|| {
            let mut fields = Vec::new();
            for entry in query {
                let field = to_pascal_case(&entry.name);
                match &entry.value {
                    ScalarValue::List(items) => {
                        fields.push(format!("\t{field}: {},", self.string_list(items)));
                    }
                    value => {
                        let local = locals.allocate(&format!("request{field}"));
                        declarations.push(format!("{local} := {}", self.scalar(value)));
                        fields.push(format!("\t{field}: &{local},"));
                    }
                }
            }
            let var = locals.allocate("requestParameters");
            if declarations.last().is_some_and(|d| !d.is_empty()) {
                declarations.push(String::new());
            }
            declarations.push(format!(
                "{var} := &{package}.{class}{verb}QueryParameters{{\n{}\n}}",
                fields.join("\n")
            ));
            var
        });

        let config_var = locals.allocate("configuration");
        let mut fields = Vec::new();
        if let Some(headers_var) = headers_var {
            fields.push(format!("\tHeaders: {headers_var},"));
        }
        if let Some(params_var) = params_var {
            fields.push(format!("\tQueryParameters: {params_var},"));
        }
        declarations.push(format!(
            "{config_var} := &{package}.{class}{verb}RequestConfiguration{{\n{}\n}}",
            fields.join("\n")
        ));
        Some(Configuration {
            declarations,
            argument: Some(config_var),
        })
    }

    fn call_statement(&self, _ctx: &RenderContext<'_>, call: &CallParts<'_>) -> String {
        let verb = to_pascal_case(&call.method.as_str().to_ascii_lowercase());
        let mut args = vec!["context.Background()"];
        args.extend(call.body);
        args.push(call.configuration.unwrap_or("nil"));
        let capture = if call.has_result { "result, err := " } else { "" };
        format!("{capture}{}{}.{verb}({})", call.client, call.chain, args.join(", "))
    }

    fn support_imports(&self, ctx: &RenderContext<'_>, features: &Features) -> Vec<Import> {
        let mut imports = vec![
            Import::root("\"context\""),
            Import::root(format!("msgraphsdk \"{}\"", ctx.sdk_root)),
        ];
        if features.binary || features.binary_stream {
            imports.push(Import::root("\"encoding/base64\""));
        }
        if features.date_time {
            imports.push(Import::root("\"time\""));
        }
        if features.guid {
            imports.push(Import::root("\"github.com/google/uuid\""));
        }
        if features.date || features.time_of_day || features.duration {
            imports.push(Import::root(format!("\"{KIOTA_ABSTRACTIONS}/serialization\"")));
        }
        imports
    }

    fn configuration_imports(&self, ctx: &RenderContext<'_>, features: &Features) -> Vec<Import> {
        let mut imports = vec![Import::configuration(builder_import(
            ctx,
            &request_builder_path(ctx),
        ))];
        if features.headers {
            imports.push(Import::configuration(format!(
                "abstractions \"{KIOTA_ABSTRACTIONS}\""
            )));
        }
        imports
    }

    fn format_imports(&self, imports: &[Import]) -> String {
        let mut out = String::from("import (\n");
        for import in imports {
            out.push_str(&format!("\t  {}\n", import.text));
        }
        out.push(')');
        out
    }
}

fn builder_import(ctx: &RenderContext<'_>, path: &[String]) -> String {
    let first = path.first().map(|p| p.to_ascii_lowercase()).unwrap_or_default();
    format!("{} \"{}/{first}\"", builder_package(path), ctx.sdk_root)
}
