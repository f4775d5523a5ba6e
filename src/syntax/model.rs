//! Configuration model
//!
//! This module provides the ConfigModel that owns a grammar document
//! and the lookup indices built from it once, at construction.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

use super::config::{HighlightingRule, SyntaxConfig, TokenDefinition, TypeStyle};
use super::style::{self, KeywordGroup};
use crate::error::Result;

/// Parent type naming operator styles
pub const OPERATOR_PARENT: &str = "Operator";
/// Parent type naming function styles
pub const FUNCTION_PARENT: &str = "Function";
/// Type name of custom tokens
pub const CUSTOM_TOKEN_TYPE: &str = "CustomToken";
/// Type name of boolean literals
pub const BOOLEAN_LITERAL_TYPE: &str = "BooleanLiteral";

/// Validated grammar plus its lookup indices
#[derive(Debug, Clone)]
pub struct ConfigModel {
    config: SyntaxConfig,
    /// Lowercased keyword -> token (later declarations win)
    tokens_by_keyword: IndexMap<String, TokenDefinition>,
    /// Type name -> every token declared with it
    tokens_by_type: IndexMap<String, Vec<TokenDefinition>>,
    /// Style class name -> style
    types_by_class: IndexMap<String, TypeStyle>,
}

impl ConfigModel {
    /// Build a model and its indices from a configuration
    ///
    /// The configuration is not validated here; use one of the parsing
    /// constructors for untrusted documents.
    pub fn new(config: SyntaxConfig) -> Self {
        let mut tokens_by_keyword = IndexMap::new();
        let mut tokens_by_type: IndexMap<String, Vec<TokenDefinition>> = IndexMap::new();
        let mut types_by_class = IndexMap::new();

        for token in config.highlighting_rules.iter().flat_map(|rule| rule.tokens()) {
            tokens_by_keyword.insert(token.keyword.to_lowercase(), token.clone());
            tokens_by_type
                .entry(token.token_type.clone())
                .or_default()
                .push(token.clone());
        }

        for style in &config.types {
            types_by_class.insert(style.class_name.clone(), style.clone());
        }

        debug!(
            rules = config.highlighting_rules.len(),
            keywords = tokens_by_keyword.len(),
            types = types_by_class.len(),
            "built configuration indices"
        );

        Self {
            config,
            tokens_by_keyword,
            tokens_by_type,
            types_by_class,
        }
    }

    /// Parse, validate and index a JSON document
    pub fn from_json(text: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(text)?;
        Ok(Self::new(SyntaxConfig::from_document(document)?))
    }

    /// Parse, validate and index a TOML document of the same shape
    pub fn from_toml(text: &str) -> Result<Self> {
        let document: toml::Value = toml::from_str(text)?;
        let document = serde_json::to_value(document)?;
        Ok(Self::new(SyntaxConfig::from_document(document)?))
    }

    /// Validate an untyped document without building a model
    pub fn validate(document: &Value) -> Result<()> {
        super::config::validate_document(document)
    }

    /// Keywords whose type has the given parent
    fn keywords_with_parent(&self, parent: &str) -> Vec<String> {
        self.tokens_by_keyword
            .values()
            .filter(|token| {
                self.types_by_class
                    .get(&token.token_type)
                    .is_some_and(|style| style.parent_type == parent)
            })
            .map(|token| token.keyword.clone())
            .collect()
    }

    /// Keywords declared with exactly the given type name
    fn keywords_of_type(&self, type_name: &str) -> Vec<String> {
        self.tokens_by_type(type_name)
            .iter()
            .map(|token| token.keyword.clone())
            .collect()
    }

    pub fn operator_keywords(&self) -> Vec<String> {
        self.keywords_with_parent(OPERATOR_PARENT)
    }

    pub fn function_keywords(&self) -> Vec<String> {
        self.keywords_with_parent(FUNCTION_PARENT)
    }

    pub fn custom_token_keywords(&self) -> Vec<String> {
        self.keywords_of_type(CUSTOM_TOKEN_TYPE)
    }

    pub fn boolean_literal_keywords(&self) -> Vec<String> {
        self.keywords_of_type(BOOLEAN_LITERAL_TYPE)
    }

    /// Case-insensitive token lookup
    pub fn token_info(&self, keyword: &str) -> Option<&TokenDefinition> {
        self.tokens_by_keyword.get(&keyword.to_lowercase())
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.tokens_by_keyword.contains_key(&keyword.to_lowercase())
    }

    pub fn type_style(&self, class_name: &str) -> Option<&TypeStyle> {
        self.types_by_class.get(class_name)
    }

    pub fn tokens_by_type(&self, type_name: &str) -> &[TokenDefinition] {
        self.tokens_by_type
            .get(type_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn types_by_parent(&self, parent_type: &str) -> Vec<&TypeStyle> {
        self.config
            .types
            .iter()
            .filter(|style| style.parent_type == parent_type)
            .collect()
    }

    /// Display class for a keyword, if both the keyword and its type are known
    pub fn token_class_name(&self, keyword: &str) -> Option<String> {
        let token = self.token_info(keyword)?;
        let type_style = self.type_style(&token.token_type)?;
        Some(style::css_class(&type_style.class_name))
    }

    /// Display class for a type name, falling back to the unknown class
    pub fn class_for_type(&self, type_name: &str) -> String {
        self.type_style(type_name)
            .map(|type_style| style::css_class(&type_style.class_name))
            .unwrap_or_else(|| style::UNKNOWN_CLASS.to_string())
    }

    pub fn token_description(&self, keyword: &str) -> Option<&str> {
        self.token_info(keyword).map(|token| token.description.as_str())
    }

    /// Stylesheet for every class and parent category in this grammar
    pub fn generate_css(&self) -> String {
        style::generate_css(&self.config.types)
    }

    /// Keywords grouped by parent type, in type declaration order
    pub fn keyword_groups(&self) -> IndexMap<String, KeywordGroup> {
        let mut groups: IndexMap<String, KeywordGroup> = IndexMap::new();
        for type_style in &self.config.types {
            let group = groups
                .entry(type_style.parent_type.clone())
                .or_insert_with(|| KeywordGroup::styled_after(type_style));
            group.keywords.extend(
                self.tokens_by_type(&type_style.class_name)
                    .iter()
                    .map(|token| token.keyword.clone()),
            );
        }
        groups
    }

    /// Document metadata (empty when absent)
    pub fn metadata(&self) -> Map<String, Value> {
        self.config.metadata.clone().unwrap_or_default()
    }

    pub fn raw_config(&self) -> &SyntaxConfig {
        &self.config
    }

    pub fn highlighting_rules(&self) -> &[HighlightingRule] {
        &self.config.highlighting_rules
    }
}

impl Default for ConfigModel {
    /// An empty grammar: no rules, no types
    fn default() -> Self {
        Self::new(SyntaxConfig::default())
    }
}

impl From<SyntaxConfig> for ConfigModel {
    fn from(config: SyntaxConfig) -> Self {
        Self::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyntaxError;
    use crate::syntax::config::{FontWeight, KeywordRule, RegexRule};

    fn keyword_rule(name: &str, tokens: Vec<TokenDefinition>) -> HighlightingRule {
        HighlightingRule::Keyword(KeywordRule {
            name: name.to_string(),
            case_sensitive: false,
            add_word_boundaries: true,
            tokens,
        })
    }

    fn test_config() -> SyntaxConfig {
        SyntaxConfig {
            highlighting_rules: vec![
                HighlightingRule::Regex(RegexRule {
                    name: "Strings".to_string(),
                    pattern: "'[^']*'".to_string(),
                    token_type: Some("StringLiteral".to_string()),
                    replacement: None,
                }),
                keyword_rule(
                    "Operators",
                    vec![
                        TokenDefinition::new("eq", "ComparisonOperator", "Equal to"),
                        TokenDefinition::new("and", "LogicalOperator", "Logical and"),
                    ],
                ),
                keyword_rule(
                    "Functions",
                    vec![TokenDefinition::new("contains", "StringFunction", "Substring test")],
                ),
                keyword_rule(
                    "Literals",
                    vec![
                        TokenDefinition::new("true", "BooleanLiteral", "True"),
                        TokenDefinition::new("@this_month", "CustomToken", "Current month"),
                        TokenDefinition::new("mystery", "Unstyled", "No style"),
                    ],
                ),
            ],
            types: vec![
                TypeStyle::new("ComparisonOperator", "#569cd6", "Operator")
                    .with_font_weight(FontWeight::Named("bold".to_string())),
                TypeStyle::new("LogicalOperator", "#c586c0", "Operator"),
                TypeStyle::new("StringFunction", "#dcdcaa", "Function"),
                TypeStyle::new("StringLiteral", "#ce9178", "Literal"),
                TypeStyle::new("BooleanLiteral", "#569cd6", "Literal"),
                TypeStyle::new("CustomToken", "#4ec9b0", "Token"),
            ],
            ..SyntaxConfig::default()
        }
    }

    #[test]
    fn test_default_is_empty() {
        let model = ConfigModel::default();
        assert!(model.highlighting_rules().is_empty());
        assert!(model.raw_config().types.is_empty());
        assert!(model.operator_keywords().is_empty());
        assert_eq!(model.generate_css(), "/* Auto-generated from syntax configuration */\n\n");
    }

    #[test]
    fn test_keyword_categories() {
        let model = ConfigModel::new(test_config());
        let mut operators = model.operator_keywords();
        operators.sort();
        assert_eq!(operators, vec!["and", "eq"]);
        assert_eq!(model.function_keywords(), vec!["contains"]);
        assert_eq!(model.boolean_literal_keywords(), vec!["true"]);
        assert_eq!(model.custom_token_keywords(), vec!["@this_month"]);
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let model = ConfigModel::new(test_config());
        assert_eq!(model.token_info("AND"), model.token_info("and"));
        assert!(model.token_info("and").is_some());
        assert!(model.has_keyword("Eq"));
        assert!(!model.has_keyword("ne"));
        assert_eq!(model.token_description("EQ"), Some("Equal to"));
    }

    #[test]
    fn test_class_names() {
        let model = ConfigModel::new(test_config());
        assert_eq!(
            model.token_class_name("eq").as_deref(),
            Some("rcse-comparison-operator")
        );
        assert_eq!(model.token_class_name("mystery"), None);
        assert_eq!(model.token_class_name("nothing"), None);
        assert_eq!(model.class_for_type("Unstyled"), "rcse-unknown");
    }

    #[test]
    fn test_index_lookups() {
        let model = ConfigModel::new(test_config());
        assert_eq!(model.tokens_by_type("ComparisonOperator").len(), 1);
        assert!(model.tokens_by_type("Nope").is_empty());
        assert_eq!(model.types_by_parent("Operator").len(), 2);
        assert_eq!(model.type_style("StringLiteral").unwrap().highlight_color, "#ce9178");
        assert!(model.metadata().is_empty());
    }

    #[test]
    fn test_keyword_groups() {
        let model = ConfigModel::new(test_config());
        let groups = model.keyword_groups();
        let keys: Vec<_> = groups.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Operator", "Function", "Literal", "Token"]);
        assert_eq!(groups["Operator"].keywords, vec!["eq", "and"]);
        assert_eq!(groups["Operator"].style.font_weight.to_string(), "bold");
        assert_eq!(groups["Literal"].style.font_weight.to_string(), "normal");
        assert_eq!(groups["Literal"].keywords, vec!["true"]);
    }

    #[test]
    fn test_generate_css() {
        let model = ConfigModel::new(test_config());
        let css = model.generate_css();
        assert!(css.contains(".rcse-comparison-operator {\n  color: #569cd6;\n  font-weight: bold;\n}"));
        assert!(css.contains(".rcse-operator {\n  color: #569cd6;\n  font-weight: bold;\n}"));
        assert!(css.contains(".rcse-literal {\n  color: #ce9178;\n}"));
        assert_eq!(css.matches(".rcse-operator {").count(), 1);
    }

    #[test]
    fn test_from_json() {
        let text = serde_json::to_string(&test_config()).unwrap();
        let model = ConfigModel::from_json(&text).unwrap();
        assert!(model.has_keyword("contains"));

        assert!(matches!(ConfigModel::from_json("{ nope"), Err(SyntaxError::Json(_))));
        assert!(matches!(
            ConfigModel::from_json(r#"{"version": "1", "types": []}"#),
            Err(SyntaxError::MissingKey("highlightingRules"))
        ));
    }

    #[test]
    fn test_from_toml() {
        let text = r##"
version = "1.0.0"
types = [
    { className = "LogicalOperator", highlightColor = "#c586c0", parentType = "Operator", fontWeight = 600 },
]

[[highlightingRules]]
name = "Operators"
matchType = "keyword"
addWordBoundaries = true
tokens = [
    { keyword = "or", type = "LogicalOperator", description = "Logical or" },
]
"##;
        let model = ConfigModel::from_toml(text).unwrap();
        assert_eq!(model.operator_keywords(), vec!["or"]);
        assert!(model.generate_css().contains("font-weight: 600;"));

        assert!(matches!(ConfigModel::from_toml("version = "), Err(SyntaxError::Toml(_))));
    }

    #[test]
    fn test_later_keyword_wins() {
        let config = SyntaxConfig {
            highlighting_rules: vec![
                keyword_rule("A", vec![TokenDefinition::new("x", "First", "first")]),
                keyword_rule("B", vec![TokenDefinition::new("X", "Second", "second")]),
            ],
            ..SyntaxConfig::default()
        };
        let model = ConfigModel::new(config);
        assert_eq!(model.token_info("x").unwrap().token_type, "Second");
        assert_eq!(model.tokens_by_type("First").len(), 1);
    }
}
