//! Identifier and package naming shared by the walker and the import
//! resolver.

use std::collections::HashSet;

use snippetgen_core::naming::{singularize, sub_namespace, to_pascal_case};
use snippetgen_model::TypeName;

use crate::profile::{LanguageProfile, RenderContext, ReservedEscape};

/// Escape `name` if it collides with a reserved word.
#[must_use]
pub fn escape_reserved(profile: &LanguageProfile, name: String) -> String {
    let reserved = profile.reserved_words.iter().any(|word| {
        if profile.reserved_case_insensitive {
            word.eq_ignore_ascii_case(&name)
        } else {
            *word == name
        }
    });
    if !reserved {
        return name;
    }
    match profile.escape {
        ReservedEscape::Prefix(prefix) => format!("{prefix}{name}"),
        ReservedEscape::Suffix(suffix) => format!("{name}{suffix}"),
    }
}

/// Cased and escaped property name.
#[must_use]
pub fn property_name(profile: &LanguageProfile, name: &str) -> String {
    escape_reserved(profile, profile.property_casing.apply(name))
}

/// Cased and escaped request builder accessor name.
#[must_use]
pub fn navigation_name(profile: &LanguageProfile, name: &str) -> String {
    escape_reserved(profile, profile.navigation_casing.apply(name))
}

/// Allocates unique local variable names.
#[derive(Debug)]
pub struct LocalNames {
    profile: &'static LanguageProfile,
    used: HashSet<String>,
}

impl LocalNames {
    /// Empty allocator for `profile`.
    #[must_use]
    pub fn new(profile: &'static LanguageProfile) -> Self {
        Self {
            profile,
            used: HashSet::new(),
        }
    }

    /// Reserve `name` verbatim, e.g. the client variable.
    pub fn reserve(&mut self, name: &str) {
        self.used.insert(name.to_owned());
    }

    /// A fresh local derived from `hint`: `recipient`, then `recipient1`.
    pub fn allocate(&mut self, hint: &str) -> String {
        let cased = self.profile.local_casing.apply(hint);
        let base = escape_reserved(
            self.profile,
            if cased.is_empty() {
                "value".to_owned()
            } else {
                cased
            },
        );
        let mut candidate = base.clone();
        let mut n = 1;
        while self.used.contains(&candidate) {
            candidate = format!("{base}{n}");
            n += 1;
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

/// Request builder path with the SDK's `/me` alias applied.
#[must_use]
pub fn aliased_builder_path(profile: &LanguageProfile, path: &[String]) -> Vec<String> {
    match path.split_first() {
        Some((first, rest)) if profile.layout.me_as_user_item && first == "me" => {
            let mut aliased = vec!["users".to_owned(), "item".to_owned()];
            aliased.extend(rest.iter().cloned());
            aliased
        }
        _ => path.to_vec(),
    }
}

/// Builder path of the request being rendered, alias applied.
#[must_use]
pub fn request_builder_path(ctx: &RenderContext<'_>) -> Vec<String> {
    aliased_builder_path(ctx.profile, &ctx.request.builder_path())
}

/// Stem of the request builder class for `path`.
///
/// Keyed items are named after their collection: `messages/item` gives
/// `MessageItem`.
#[must_use]
pub fn builder_class_stem(path: &[String]) -> String {
    match path {
        [.., collection, last] if last == "item" => {
            format!("{}Item", to_pascal_case(&singularize(collection)))
        }
        [.., last] => to_pascal_case(last),
        [] => String::new(),
    }
}

/// Pascal-cased builder path strictly between the package and the last
/// element, e.g. `Item` for `users/item/messages`.
#[must_use]
pub fn inner_prefix(path: &[String]) -> String {
    match path {
        [_, inner @ .., _] => inner.iter().map(|p| to_pascal_case(p)).collect(),
        _ => String::new(),
    }
}

/// Model namespace segments below the schema root, e.g. `["security"]`.
#[must_use]
pub fn model_sub_namespace<'t>(ctx: &RenderContext<'_>, type_name: &'t TypeName) -> Vec<&'t str> {
    sub_namespace(&type_name.namespace, &ctx.request.namespace)
}

/// Builder path of a request-builder type, alias applied.
#[must_use]
pub fn type_builder_path(profile: &LanguageProfile, type_name: &TypeName) -> Vec<String> {
    let path: Vec<String> = type_name
        .builder_path()
        .into_iter()
        .map(str::to_owned)
        .collect();
    aliased_builder_path(profile, &path)
}
