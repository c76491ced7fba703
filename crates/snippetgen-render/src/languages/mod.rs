//! Built-in language profiles.

mod csharp;
mod go;
mod python;

use snippetgen_core::{SnippetError, SnippetResult};

use crate::profile::LanguageProfile;

pub use csharp::CSHARP;
pub use go::GO;
pub use python::PYTHON;

/// Every supported language, in lookup order.
pub static LANGUAGES: [&LanguageProfile; 3] = [&CSHARP, &GO, &PYTHON];

/// Profile for a language identifier or alias, case-insensitively.
///
/// # Errors
///
/// Returns [`SnippetError::UnsupportedLanguage`] for unknown identifiers.
pub fn find_language(id: &str) -> SnippetResult<&'static LanguageProfile> {
    LANGUAGES
        .iter()
        .copied()
        .find(|profile| profile.matches(id.trim()))
        .ok_or_else(|| SnippetError::UnsupportedLanguage {
            language: id.to_owned(),
        })
}

/// Primary identifiers of the supported languages.
#[must_use]
pub fn supported_languages() -> Vec<&'static str> {
    LANGUAGES.iter().map(|profile| profile.id).collect()
}
