//! Style rules derived from type styles
//!
//! This module turns the type styles of a grammar into CSS class names
//! and stylesheet text, so presentation stays consistent with the
//! class names the highlighter emits.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::config::{FontWeight, TypeStyle};

/// Prefix of every generated class name
pub const CLASS_PREFIX: &str = "rcse-";

/// Class used when a type has no matching style
pub const UNKNOWN_CLASS: &str = "rcse-unknown";

static CAMEL_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("camel boundary pattern"));

/// Convert camelCase/PascalCase to kebab-case
pub fn camel_to_kebab(s: &str) -> String {
    CAMEL_BOUNDARY.replace_all(s, "${1}-${2}").to_lowercase()
}

/// Display class for a style's `className`: `rcse-<kebab>`
pub fn css_class(class_name: &str) -> String {
    format!("{}{}", CLASS_PREFIX, camel_to_kebab(class_name))
}

/// One stylesheet rule block
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    /// Class selector without the leading dot
    pub selector: String,
    pub color: String,
    pub font_weight: Option<FontWeight>,
    pub font_style: Option<String>,
}

impl StyleRule {
    /// Per-class rule: falsy weight/style values are left out
    fn for_class(style: &TypeStyle) -> Self {
        Self {
            selector: css_class(&style.class_name),
            color: style.highlight_color.clone(),
            font_weight: style.font_weight.clone().filter(FontWeight::is_set),
            font_style: style.font_style.clone().filter(|s| !s.is_empty()),
        }
    }

    /// Parent-category rule built from the first style seen for that parent
    fn for_parent(style: &TypeStyle) -> Self {
        Self {
            selector: css_class(&style.parent_type.to_lowercase()),
            color: style.highlight_color.clone(),
            font_weight: style.font_weight.clone(),
            font_style: style.font_style.clone().filter(|s| !s.is_empty()),
        }
    }
}

impl fmt::Display for StyleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, ".{} {{", self.selector)?;
        writeln!(f, "  color: {};", self.color)?;
        if let Some(weight) = &self.font_weight {
            writeln!(f, "  font-weight: {};", weight)?;
        }
        if let Some(style) = &self.font_style {
            writeln!(f, "  font-style: {};", style)?;
        }
        writeln!(f, "}}")
    }
}

/// Build the stylesheet rules for a list of type styles
///
/// Every distinct class gets its own rule, then every distinct parent
/// type gets one rule styled after the first type that names it. A
/// selector is never emitted twice.
pub fn style_rules(types: &[TypeStyle]) -> Vec<StyleRule> {
    let mut emitted = HashSet::new();
    let mut rules = Vec::new();

    for style in types {
        let rule = StyleRule::for_class(style);
        if emitted.insert(rule.selector.clone()) {
            rules.push(rule);
        }
    }

    let mut parents: IndexMap<&str, &TypeStyle> = IndexMap::new();
    for style in types {
        parents.entry(style.parent_type.as_str()).or_insert(style);
    }

    for style in parents.values() {
        let rule = StyleRule::for_parent(style);
        if emitted.insert(rule.selector.clone()) {
            rules.push(rule);
        }
    }

    rules
}

/// Render a full stylesheet
pub fn generate_css(types: &[TypeStyle]) -> String {
    let mut css = String::from("/* Auto-generated from syntax configuration */\n\n");
    for rule in style_rules(types) {
        css.push_str(&rule.to_string());
        css.push('\n');
    }
    css
}

/// Style shared by a group of keywords
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStyle {
    pub color: String,
    pub font_weight: FontWeight,
}

/// Keywords sharing a parent type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordGroup {
    pub keywords: Vec<String>,
    pub style: GroupStyle,
}

impl KeywordGroup {
    pub(crate) fn styled_after(style: &TypeStyle) -> Self {
        Self {
            keywords: Vec::new(),
            style: GroupStyle {
                color: style.highlight_color.clone(),
                font_weight: style
                    .font_weight
                    .clone()
                    .filter(FontWeight::is_set)
                    .unwrap_or_default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_to_kebab() {
        assert_eq!(camel_to_kebab("ComparisonOperator"), "comparison-operator");
        assert_eq!(camel_to_kebab("stringLiteral"), "string-literal");
        assert_eq!(camel_to_kebab("Number2Literal"), "number2-literal");
        assert_eq!(camel_to_kebab("comment"), "comment");
        assert_eq!(css_class("BooleanLiteral"), "rcse-boolean-literal");
    }

    #[test]
    fn test_style_rule_display() {
        let rule = StyleRule {
            selector: "rcse-comment".to_string(),
            color: "#6a9955".to_string(),
            font_weight: None,
            font_style: Some("italic".to_string()),
        };
        assert_eq!(
            rule.to_string(),
            ".rcse-comment {\n  color: #6a9955;\n  font-style: italic;\n}\n"
        );
    }

    #[test]
    fn test_parent_rules_first_wins() {
        let types = vec![
            TypeStyle::new("LogicalOperator", "#111111", "Operator")
                .with_font_weight(FontWeight::Named("600".to_string())),
            TypeStyle::new("ComparisonOperator", "#222222", "Operator"),
            TypeStyle::new("StringLiteral", "#333333", "Literal"),
        ];
        let rules = style_rules(&types);
        let selectors: Vec<_> = rules.iter().map(|r| r.selector.as_str()).collect();
        assert_eq!(
            selectors,
            vec![
                "rcse-logical-operator",
                "rcse-comparison-operator",
                "rcse-string-literal",
                "rcse-operator",
                "rcse-literal",
            ]
        );
        assert_eq!(rules[3].color, "#111111");
        assert_eq!(rules[3].font_weight, Some(FontWeight::Named("600".to_string())));
    }

    #[test]
    fn test_no_duplicate_selectors() {
        // parent "comment" collides with the class "Comment"
        let types = vec![
            TypeStyle::new("Comment", "#6a9955", "Comment"),
            TypeStyle::new("Comment", "#000000", "Comment"),
        ];
        let css = generate_css(&types);
        assert_eq!(css.matches(".rcse-comment {").count(), 1);
        assert!(css.contains("color: #6a9955;"));
        assert!(!css.contains("#000000"));
    }
}
