//! Operator-aware prettifier
//!
//! Re-spaces text around the operator keywords of a grammar and
//! collapses horizontal whitespace, line by line.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex, RegexBuilder};

use crate::error::{Result, SyntaxError};
use crate::syntax::ConfigModel;

/// Default advertised line length
pub const DEFAULT_MAX_LINE_LENGTH: usize = 80;

static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\n|\r").expect("line break pattern"));
static HORIZONTAL_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").expect("space pattern"));

/// Operator keyword with its spacing pattern
#[derive(Debug, Clone)]
struct OperatorSpacing {
    pattern: Regex,
    /// The keyword in its configured casing, padded with one space each side
    padded: String,
}

#[derive(Debug, Clone)]
pub struct Prettifier {
    operators: Vec<OperatorSpacing>,
    /// Accepted and stored; wrapping is not performed
    max_line_length: usize,
}

impl Prettifier {
    pub fn new(model: &ConfigModel) -> Result<Self> {
        Self::with_max_line_length(model, DEFAULT_MAX_LINE_LENGTH)
    }

    pub fn with_max_line_length(model: &ConfigModel, max_line_length: usize) -> Result<Self> {
        let operators = model
            .operator_keywords()
            .into_iter()
            .map(|keyword| -> Result<OperatorSpacing> {
                let expression = format!(r"\s*(?-u:\b){}(?-u:\b)\s*", regex::escape(&keyword));
                let pattern = RegexBuilder::new(&expression)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| SyntaxError::InvalidPattern {
                        rule: keyword.clone(),
                        source,
                    })?;
                Ok(OperatorSpacing {
                    pattern,
                    padded: format!(" {} ", keyword),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            operators,
            max_line_length,
        })
    }

    pub fn set_max_line_length(&mut self, length: usize) -> &mut Self {
        self.max_line_length = length;
        self
    }

    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    /// Normalize spacing; empty or absent input yields an empty string
    pub fn prettify<'t>(&self, text: impl Into<Option<&'t str>>) -> String {
        let text = match text.into() {
            Some(text) if !text.is_empty() => text,
            _ => return String::new(),
        };

        let mut formatted = text.to_string();
        for op in &self.operators {
            formatted = op
                .pattern
                .replace_all(&formatted, NoExpand(&op.padded))
                .into_owned();
        }

        let lines: Vec<_> = LINE_BREAK
            .split(&formatted)
            .map(|line| HORIZONTAL_SPACE.replace_all(line, " "))
            .collect();

        lines.join("\n").trim().to_string()
    }
}
