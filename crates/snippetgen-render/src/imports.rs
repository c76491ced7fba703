//! Import resolution.
//!
//! Imports are derived from structure: the types named by the body graph,
//! the request builders the configuration references and the literal
//! features the body uses. Requests without resolved segments fall back to
//! scanning the rendered text with each language's [`ScanRule`]s.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use snippetgen_core::naming::Casing;
use snippetgen_model::BodyGraph;
use tracing::{debug, warn};

use crate::languages::LANGUAGES;
use crate::profile::{Features, RenderContext, ScanRule};

static SCAN_PATTERNS: LazyLock<HashMap<&'static str, Regex>> = LazyLock::new(|| {
    LANGUAGES
        .iter()
        .flat_map(|profile| profile.scan_rules)
        .map(|rule| {
            (
                rule.pattern,
                Regex::new(rule.pattern).expect("Invalid import scan regex"),
            )
        })
        .collect()
});

/// Import section, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImportGroup {
    /// Client and language support imports.
    Root,
    /// Request builder and configuration imports.
    RequestConfiguration,
    /// Model imports.
    Models,
}

/// One import line before language formatting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Import {
    /// Section.
    pub group: ImportGroup,
    /// Language-specific import text, e.g. a namespace or a full line.
    pub text: String,
}

impl Import {
    /// Create an import.
    #[must_use]
    pub fn new(group: ImportGroup, text: impl Into<String>) -> Self {
        Self {
            group,
            text: text.into(),
        }
    }

    /// An import in the root section.
    #[must_use]
    pub fn root(text: impl Into<String>) -> Self {
        Self::new(ImportGroup::Root, text)
    }

    /// An import in the request configuration section.
    #[must_use]
    pub fn configuration(text: impl Into<String>) -> Self {
        Self::new(ImportGroup::RequestConfiguration, text)
    }

    /// An import in the models section.
    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self::new(ImportGroup::Models, text)
    }
}

/// Computes the import set of one snippet.
#[derive(Debug, Clone, Copy)]
pub struct ImportResolver<'a> {
    ctx: RenderContext<'a>,
}

impl<'a> ImportResolver<'a> {
    /// Resolver for `ctx`.
    #[must_use]
    pub fn new(ctx: RenderContext<'a>) -> Self {
        Self { ctx }
    }

    /// Deduplicated imports ordered by group, then text.
    ///
    /// `rendered` is the snippet text without imports; it is only read when
    /// the request has no resolved segments.
    #[must_use]
    pub fn resolve(&self, graph: &BodyGraph, features: &Features, rendered: &str) -> Vec<Import> {
        let syntax = self.ctx.profile.syntax;
        let mut imports: BTreeSet<Import> =
            syntax.support_imports(&self.ctx, features).into_iter().collect();

        if self.ctx.request.segments.is_empty() {
            debug!(
                language = self.ctx.profile.id,
                "no resolved segments, scanning rendered text for imports"
            );
            imports.extend(scan(&self.ctx, rendered));
        } else {
            if features.configuration() {
                imports.extend(syntax.configuration_imports(&self.ctx, features));
            }
            imports.extend(
                graph
                    .type_names()
                    .into_iter()
                    .map(|type_name| syntax.type_import(&self.ctx, type_name)),
            );
        }

        imports.into_iter().collect()
    }
}

fn scan(ctx: &RenderContext<'_>, rendered: &str) -> Vec<Import> {
    ctx.profile
        .scan_rules
        .iter()
        .flat_map(|rule| scan_rule(ctx, rule, rendered))
        .collect()
}

fn scan_rule(ctx: &RenderContext<'_>, rule: &ScanRule, rendered: &str) -> Vec<Import> {
    let compiled;
    let re = match SCAN_PATTERNS.get(rule.pattern) {
        Some(re) => re,
        None => match Regex::new(rule.pattern) {
            Ok(re) => {
                compiled = re;
                &compiled
            }
            Err(e) => {
                warn!(pattern = rule.pattern, error = %e, "invalid import scan rule");
                return Vec::new();
            }
        },
    };
    re.captures_iter(rendered)
        .filter_map(|caps| {
            let name = caps.get(1).map_or("", |m| m.as_str());
            if !name.is_empty() && rule.exclude_suffixes.iter().any(|s| name.ends_with(s)) {
                return None;
            }
            let package = name.strip_prefix("graph").unwrap_or(name);
            Some(Import::new(
                rule.group,
                rule.template
                    .replace("{root}", ctx.sdk_root)
                    .replace("{name}", name)
                    .replace("{snake}", &Casing::Snake.apply(name))
                    .replace("{package}", package),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use http::Method;
    use snippetgen_body::BodyGraphBuilder;
    use snippetgen_model::RecordedRequest;
    use snippetgen_model::fixtures::graph_index;
    use snippetgen_resolver::RequestResolver;

    use super::*;
    use crate::languages::{CSHARP, GO, PYTHON};

    fn resolved(method: Method, url: &str, body: &str) -> (snippetgen_model::ResolvedRequest, BodyGraph) {
        let index = graph_index();
        let request = RecordedRequest::new(method, url)
            .with_header("Content-Type", "application/json")
            .with_body(body.to_owned());
        let resolved = RequestResolver::default().resolve(&request, &index).unwrap();
        let graph = BodyGraphBuilder::default().build(&resolved, &index).unwrap();
        (resolved, graph)
    }

    #[test]
    fn test_should_order_groups_and_deduplicate() {
        let mut set = BTreeSet::new();
        set.insert(Import::model("b"));
        set.insert(Import::root("z"));
        set.insert(Import::configuration("c"));
        set.insert(Import::model("a"));
        set.insert(Import::model("a"));
        let texts: Vec<_> = set.into_iter().map(|i| i.text).collect();
        assert_eq!(texts, vec!["z", "c", "a", "b"]);
    }

    #[test]
    fn test_should_derive_model_imports_from_graph() {
        let (request, graph) = resolved(
            Method::POST,
            "/v1.0/me/messages",
            r#"{"subject": "Hi", "importance": "high", "toRecipients": [{"emailAddress": {"address": "a@b.c"}}]}"#,
        );
        let ctx = RenderContext::new(&PYTHON, &request);
        let imports = ImportResolver::new(ctx).resolve(&graph, &Features::default(), "");
        let texts: Vec<_> = imports.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts[0], "from msgraph import GraphServiceClient");
        assert!(texts.contains(&"from msgraph.generated.models.message import Message"));
        assert!(texts.contains(&"from msgraph.generated.models.importance import Importance"));
        assert!(texts.contains(&"from msgraph.generated.models.email_address import EmailAddress"));
        assert_eq!(
            texts.iter().filter(|t| t.ends_with("import Recipient")).count(),
            1
        );
    }

    #[test]
    fn test_should_import_request_builder_body_types() {
        let (request, graph) = resolved(
            Method::POST,
            "/v1.0/teams/t1/sendActivityNotification",
            r#"{"activityType": "taskCreated"}"#,
        );
        let ctx = RenderContext::new(&GO, &request);
        let imports = ImportResolver::new(ctx).resolve(&graph, &Features::default(), "");
        assert!(imports.contains(&Import::configuration(
            r#"graphteams "github.com/microsoftgraph/msgraph-sdk-go/teams""#
        )));

        let ctx = RenderContext::new(&CSHARP, &request);
        let imports = ImportResolver::new(ctx).resolve(&graph, &Features::default(), "");
        assert!(imports.contains(&Import::configuration(
            "Microsoft.Graph.Teams.Item.SendActivityNotification"
        )));
    }

    #[test]
    fn test_should_scan_rendered_text_without_segments() {
        let (mut request, graph) = resolved(Method::POST, "/v1.0/me/messages", r#"{"subject": "Hi"}"#);
        request.segments.clear();
        let ctx = RenderContext::new(&CSHARP, &request);
        let rendered = "var requestBody = new Message\n{\n\tBody = new ItemBody(),\n\tCc = new List<Recipient>(),\n};";
        let imports = ImportResolver::new(ctx).resolve(&graph, &Features::default(), rendered);
        let models: Vec<_> = imports
            .iter()
            .filter(|i| i.group == ImportGroup::Models)
            .collect();
        assert_eq!(models, vec![&Import::model("Microsoft.Graph.Models")]);

        let ctx = RenderContext::new(&GO, &request);
        let rendered = "requestBody := graphusers.NewItemSendMailPostRequestBody()\nmessage := graphmodels.NewMessage()";
        let imports = ImportResolver::new(ctx).resolve(&graph, &Features::default(), rendered);
        assert!(imports.contains(&Import::configuration(
            r#"graphusers "github.com/microsoftgraph/msgraph-sdk-go/users""#
        )));
        assert!(imports.contains(&Import::model(
            r#"graphmodels "github.com/microsoftgraph/msgraph-sdk-go/models""#
        )));
    }

    #[test]
    fn test_should_precompile_every_scan_rule() {
        for profile in LANGUAGES {
            for rule in profile.scan_rules {
                assert!(SCAN_PATTERNS.contains_key(rule.pattern), "{}: {}", profile.id, rule.pattern);
            }
        }
        let pattern_count: usize = LANGUAGES.iter().map(|p| p.scan_rules.len()).sum();
        assert!(SCAN_PATTERNS.len() <= pattern_count);
        assert!(!SCAN_PATTERNS.is_empty());
    }
}
