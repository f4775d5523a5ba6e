//! Grammar document model
//!
//! This module defines the serialized shape of a syntax configuration
//! (rules, tokens and type styles) and the structural validation that
//! runs on the untyped document before it is deserialized.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{Result, SyntaxError};

/// One literal vocabulary word and the semantic type it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenDefinition {
    pub keyword: String,
    #[serde(rename = "type")]
    pub token_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

impl TokenDefinition {
    pub fn new(keyword: &str, token_type: &str, description: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            token_type: token_type.to_string(),
            description: description.to_string(),
        }
    }
}

/// Font weight as written in the document: `600` or `"bold"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontWeight {
    Numeric(serde_json::Number),
    Named(String),
}

impl FontWeight {
    /// Falsy weights (`0`, `""`) are skipped by per-class stylesheet rules
    pub fn is_set(&self) -> bool {
        match self {
            FontWeight::Numeric(n) => n.as_f64().map_or(true, |v| v != 0.0),
            FontWeight::Named(s) => !s.is_empty(),
        }
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        FontWeight::Named("normal".to_string())
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontWeight::Numeric(n) => write!(f, "{}", n),
            FontWeight::Named(s) => f.write_str(s),
        }
    }
}

/// Presentation style bound to a semantic type name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStyle {
    pub class_name: String,
    pub highlight_color: String,
    pub parent_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
}

impl TypeStyle {
    pub fn new(class_name: &str, highlight_color: &str, parent_type: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            highlight_color: highlight_color.to_string(),
            parent_type: parent_type.to_string(),
            font_weight: None,
            font_style: None,
        }
    }

    pub fn with_font_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = Some(weight);
        self
    }

    pub fn with_font_style(mut self, style: &str) -> Self {
        self.font_style = Some(style.to_string());
        self
    }
}

/// A batch of literal keywords sharing matching flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRule {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub case_sensitive: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub add_word_boundaries: bool,
    pub tokens: Vec<TokenDefinition>,
}

/// A single free-form pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegexRule {
    pub name: String,
    pub pattern: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

/// An ordered unit of the grammar, dispatched on `matchType`
#[derive(Debug, Clone, PartialEq)]
pub enum HighlightingRule {
    Keyword(KeywordRule),
    Regex(RegexRule),
    /// Any other `matchType`; accepted by validation, skipped when
    /// highlighting and written back exactly as it was read
    Unsupported(Value),
}

impl HighlightingRule {
    pub fn name(&self) -> Option<&str> {
        match self {
            HighlightingRule::Keyword(rule) => Some(&rule.name),
            HighlightingRule::Regex(rule) => Some(&rule.name),
            HighlightingRule::Unsupported(rule) => rule.get("name").and_then(Value::as_str),
        }
    }

    /// Tokens declared by this rule (empty for non-keyword rules)
    pub fn tokens(&self) -> &[TokenDefinition] {
        match self {
            HighlightingRule::Keyword(rule) => &rule.tokens,
            _ => &[],
        }
    }
}

/// A known rule body with its `matchType` tag in front
#[derive(Serialize)]
struct Tagged<'a, T> {
    #[serde(rename = "matchType")]
    match_type: &'static str,
    #[serde(flatten)]
    rule: &'a T,
}

impl Serialize for HighlightingRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            HighlightingRule::Keyword(rule) => Tagged {
                match_type: "keyword",
                rule,
            }
            .serialize(serializer),
            HighlightingRule::Regex(rule) => Tagged {
                match_type: "regex",
                rule,
            }
            .serialize(serializer),
            HighlightingRule::Unsupported(rule) => rule.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for HighlightingRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let rule = Value::deserialize(deserializer)?;
        let match_type = rule
            .get("matchType")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        match match_type.as_str() {
            "keyword" => KeywordRule::deserialize(rule)
                .map(HighlightingRule::Keyword)
                .map_err(de::Error::custom),
            "regex" => RegexRule::deserialize(rule)
                .map(HighlightingRule::Regex)
                .map_err(de::Error::custom),
            _ => Ok(HighlightingRule::Unsupported(rule)),
        }
    }
}

/// `null` reads as the field's default
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Versions may be written as numbers (`1`, `1.5`); they are kept as text
fn version_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(version) => Ok(version),
        Value::Null => Ok(String::new()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(de::Error::custom(format!("version must be text, found {}", other))),
    }
}

/// Root grammar document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntaxConfig {
    #[serde(deserialize_with = "version_text")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub highlighting_rules: Vec<HighlightingRule>,
    pub types: Vec<TypeStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl Default for SyntaxConfig {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            description: None,
            reference: None,
            highlighting_rules: Vec::new(),
            types: Vec::new(),
            metadata: None,
        }
    }
}

impl SyntaxConfig {
    /// Validate an untyped document and convert it into a typed configuration
    pub fn from_document(document: Value) -> Result<Self> {
        validate_document(&document)?;
        serde_json::from_value(document).map_err(|e| SyntaxError::Document(e.to_string()))
    }

    /// Validate this configuration as it would appear once serialized
    pub fn validate(&self) -> Result<()> {
        let document = serde_json::to_value(self)?;
        validate_document(&document)
    }

    /// Serialize to the JSON document format
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Top-level keys every document must carry
const REQUIRED_KEYS: [&str; 3] = ["version", "highlightingRules", "types"];

/// Check the structure of a grammar document
///
/// Only shape is checked. A token whose type has no matching style is
/// not an error; the highlighter falls back to an unknown class for it.
pub fn validate_document(document: &Value) -> Result<()> {
    let root = document
        .as_object()
        .ok_or_else(|| SyntaxError::Document("configuration must be an object".to_string()))?;

    for key in REQUIRED_KEYS {
        if !root.contains_key(key) {
            return Err(SyntaxError::MissingKey(key));
        }
    }

    let rules = root["highlightingRules"]
        .as_array()
        .ok_or(SyntaxError::NotASequence("highlightingRules"))?;

    for rule in rules {
        if !truthy(rule.get("name")) || !truthy(rule.get("matchType")) {
            return Err(SyntaxError::RuleMissingField);
        }
        let name = rule["name"].as_str().unwrap_or_default().to_string();

        match rule["matchType"].as_str() {
            Some("keyword") => {
                let tokens = rule
                    .get("tokens")
                    .and_then(Value::as_array)
                    .ok_or_else(|| SyntaxError::KeywordRuleWithoutTokens(name.clone()))?;
                for token in tokens {
                    if !truthy(token.get("keyword")) || !truthy(token.get("type")) {
                        return Err(SyntaxError::TokenMissingField(name));
                    }
                }
            }
            Some("regex") => {
                if !truthy(rule.get("pattern")) {
                    return Err(SyntaxError::RegexRuleWithoutPattern(name));
                }
            }
            _ => {}
        }
    }

    let types = root["types"]
        .as_array()
        .ok_or(SyntaxError::NotASequence("types"))?;

    for style in types {
        if !truthy(style.get("className"))
            || !truthy(style.get("highlightColor"))
            || !truthy(style.get("parentType"))
        {
            return Err(SyntaxError::TypeMissingField);
        }
    }

    Ok(())
}

/// Presence test matching the document format's notion of "set"
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().map_or(true, |v| v != 0.0),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
