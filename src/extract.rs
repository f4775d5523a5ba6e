//! Identifier extraction
//!
//! Strips literals and every known keyword from an expression and
//! returns the bare identifiers that remain, e.g. to feed completion
//! lists. This is best-effort: failures are logged and yield an empty
//! list.

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use tracing::error;

use crate::error::{Result, SyntaxError};
use crate::syntax::ConfigModel;

static STRING_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"'[^']*'").expect("string pattern"));
static TIMESTAMP_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}\.[0-9]{3}Z")
        .expect("timestamp pattern")
});
static NUMBER_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?-u:\b)[0-9]+\.?[0-9]*(?-u:\b)").expect("number pattern"));
static SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s()]+").expect("separator pattern"));
static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_]*$").expect("identifier pattern"));

#[derive(Debug, Clone, Copy)]
pub struct IdentifierExtractor<'a> {
    model: &'a ConfigModel,
}

impl<'a> IdentifierExtractor<'a> {
    pub fn new(model: &'a ConfigModel) -> Self {
        Self { model }
    }

    /// Bare identifiers of an expression, de-duplicated
    ///
    /// Empty or absent input, and any internal failure, yield an empty list.
    pub fn extract<'t>(&self, text: impl Into<Option<&'t str>>) -> Vec<String> {
        let text = match text.into() {
            Some(text) if !text.is_empty() => text,
            _ => return Vec::new(),
        };

        match self.try_extract(text) {
            Ok(identifiers) => identifiers,
            Err(e) => {
                error!("Error extracting identifiers: {}", e);
                Vec::new()
            }
        }
    }

    fn try_extract(&self, text: &str) -> Result<Vec<String>> {
        let cleaned = STRING_LITERAL.replace_all(text, "");
        let cleaned = TIMESTAMP_LITERAL.replace_all(&cleaned, "");
        let cleaned = NUMBER_LITERAL.replace_all(&cleaned, "");
        let cleaned = self.remove_keywords(&cleaned)?;

        let identifiers: IndexSet<&str> = SEPARATOR
            .split(&cleaned)
            .map(str::trim)
            .filter(|token| IDENTIFIER.is_match(token))
            .collect();

        Ok(identifiers.into_iter().map(str::to_string).collect())
    }

    /// Remove operators, functions, boolean literals and custom tokens
    fn remove_keywords(&self, text: &str) -> Result<String> {
        let keywords = self
            .model
            .operator_keywords()
            .into_iter()
            .chain(self.model.function_keywords())
            .chain(self.model.boolean_literal_keywords())
            .chain(self.model.custom_token_keywords());

        let mut cleaned = text.to_string();
        for keyword in keywords {
            cleaned = keyword_pattern(&keyword)?
                .replace_all(&cleaned, "")
                .into_owned();
        }
        Ok(cleaned)
    }
}

/// Case-insensitive, ASCII-bounded match for one literal keyword
///
/// Keywords are escaped, so this only fails when the compiled pattern
/// outgrows the regex size limit.
fn keyword_pattern(keyword: &str) -> Result<Regex> {
    RegexBuilder::new(&format!(r"(?-u:\b){}(?-u:\b)", regex::escape(keyword)))
        .case_insensitive(true)
        .build()
        .map_err(|source| SyntaxError::InvalidPattern {
            rule: keyword.to_string(),
            source,
        })
}
