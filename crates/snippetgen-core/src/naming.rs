//! Casing and type-name helpers shared by rendering and import resolution.
//!
//! Both passes go through these functions, so a type or accessor name is
//! spelled the same way in the rendered call chain and in the import list.

use heck::{ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase, ToSnakeCase};

/// Casing convention applied to identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Casing {
    /// `PascalCase`.
    Pascal,
    /// `camelCase`.
    Camel,
    /// `snake_case`.
    Snake,
    /// `SHOUTY_SNAKE_CASE`.
    ShoutySnake,
    /// Left untouched.
    Verbatim,
}

impl Casing {
    /// Apply this casing to `name`.
    #[must_use]
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::Pascal => to_pascal_case(name),
            Self::Camel => name.to_lower_camel_case(),
            Self::Snake => name.to_snake_case(),
            Self::ShoutySnake => name.to_shouty_snake_case(),
            Self::Verbatim => name.to_owned(),
        }
    }
}

/// Convert `name` to PascalCase.
///
/// Identifiers without separators only get their first character
/// uppercased, so `ODataError` stays intact.
#[must_use]
pub fn to_pascal_case(name: &str) -> String {
    if !name.is_empty() && name.chars().all(char::is_alphanumeric) {
        let mut chars = name.chars();
        if let Some(first) = chars.next() {
            return first.to_uppercase().chain(chars).collect();
        }
    }
    name.to_pascal_case()
}

/// Get the short name from a qualified schema name.
///
/// For example, `microsoft.graph.user` returns `user`.
#[must_use]
pub fn short_type_name(qualified: &str) -> &str {
    qualified
        .trim_start_matches('#')
        .rsplit_once('.')
        .map_or(qualified.trim_start_matches('#'), |(_, name)| name)
}

/// Get the namespace of a qualified schema name, if any.
///
/// For example, `microsoft.graph.security.alert` returns `microsoft.graph.security`.
#[must_use]
pub fn type_namespace(qualified: &str) -> Option<&str> {
    qualified
        .trim_start_matches('#')
        .rsplit_once('.')
        .map(|(ns, _)| ns)
}

/// Namespace segments below `root`, e.g. `["security"]` for
/// `microsoft.graph.security` under `microsoft.graph`.
#[must_use]
pub fn sub_namespace<'a>(namespace: &'a str, root: &str) -> Vec<&'a str> {
    match namespace.strip_prefix(root) {
        Some(rest) => rest.split('.').filter(|s| !s.is_empty()).collect(),
        None => namespace.split('.').filter(|s| !s.is_empty()).collect(),
    }
}

/// Whether `name` reads as an English plural.
#[must_use]
pub fn is_plural(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.len() > 2 && lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us")
}

/// Best-effort English singular of an identifier.
#[must_use]
pub fn singularize(name: &str) -> String {
    if let Some(stem) = name.strip_suffix("ies") {
        return format!("{stem}y");
    }
    if let Some(stem) = name.strip_suffix("sses") {
        return format!("{stem}ss");
    }
    if is_plural(name) {
        return name[..name.len() - 1].to_owned();
    }
    name.to_owned()
}
