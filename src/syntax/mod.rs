//! Grammar and highlighting module
//!
//! This module provides the grammar document model, the configuration
//! model built from it, and the rule-driven highlighter:
//! - Document types and structural validation
//! - Lookup indices and stylesheet generation
//! - Compiled rules and the segment-and-rescan highlighting pass

mod config;
mod model;
mod style;
mod rules;
mod highlighter;

pub use config::{
    validate_document, FontWeight, HighlightingRule, KeywordRule, RegexRule, SyntaxConfig,
    TokenDefinition, TypeStyle,
};
pub use model::ConfigModel;
pub use style::{camel_to_kebab, css_class, GroupStyle, KeywordGroup, StyleRule, UNKNOWN_CLASS};
pub use rules::{translate_template, CompiledRule};
pub use highlighter::{escape_html, Highlighter};
