//! Compiled highlighting rules
//!
//! This module turns the rules of a grammar document into compiled
//! matchers. Each compiled rule rewrites a plain-text segment into
//! markup; segmentation and comment skipping live in the highlighter.

use regex::{Captures, Regex, RegexBuilder};
use tracing::trace;

use super::config::{KeywordRule, RegexRule, TokenDefinition};
use super::model::ConfigModel;
use super::style::UNKNOWN_CLASS;
use crate::error::{Result, SyntaxError};

/// Keywords starting with one of these never get word boundaries
const SENTINEL_PREFIXES: [char; 3] = ['@', '$', '%'];

/// Matcher for a single keyword of a keyword rule
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    pub keyword: String,
    pub pattern: Regex,
    /// Display class of the token's type
    pub class_name: String,
    pub description: String,
}

impl KeywordMatcher {
    /// Compile the match expression for one token under its rule's flags
    pub fn new(rule: &KeywordRule, token: &TokenDefinition, class_name: String) -> Result<Self> {
        let escaped = regex::escape(&token.keyword);
        let is_sentinel = token.keyword.starts_with(SENTINEL_PREFIXES);
        let source = if rule.add_word_boundaries && !is_sentinel {
            format!(r"(?-u:\b)(?:{})(?-u:\b)", escaped)
        } else {
            escaped
        };

        let pattern = RegexBuilder::new(&source)
            .case_insensitive(!rule.case_sensitive)
            .build()
            .map_err(|source| SyntaxError::InvalidPattern {
                rule: rule.name.clone(),
                source,
            })?;

        Ok(Self {
            keyword: token.keyword.clone(),
            pattern,
            class_name,
            description: token.description.clone(),
        })
    }

    /// Wrap every occurrence, keeping the matched text's own casing
    pub fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, |caps: &Captures| {
                format!(
                    "<span class='{}' title='{}'>{}</span>",
                    self.class_name, self.description, &caps[0]
                )
            })
            .into_owned()
    }
}

/// What a pattern rule puts in place of each match
#[derive(Debug, Clone, PartialEq)]
pub enum Replacement {
    /// A user template, already translated to the regex crate's syntax
    Template(String),
    /// Wrap the whole match in a span with this class
    Wrap(String),
}

/// A compiled regex rule
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub name: String,
    pub pattern: Regex,
    pub replacement: Replacement,
}

impl PatternRule {
    /// Compile a regex rule; the pattern is case-sensitive unless it says otherwise
    pub fn new(rule: &RegexRule, model: &ConfigModel) -> Result<Self> {
        let pattern = Regex::new(&rule.pattern).map_err(|source| SyntaxError::InvalidPattern {
            rule: rule.name.clone(),
            source,
        })?;

        let replacement = match (non_empty(&rule.replacement), non_empty(&rule.token_type)) {
            (Some(template), _) => Replacement::Template(translate_template(template, &pattern)),
            (None, Some(type_name)) => Replacement::Wrap(model.class_for_type(type_name)),
            (None, None) => Replacement::Wrap(UNKNOWN_CLASS.to_string()),
        };

        Ok(Self {
            name: rule.name.clone(),
            pattern,
            replacement,
        })
    }

    pub fn apply(&self, text: &str) -> String {
        match &self.replacement {
            Replacement::Template(template) => {
                self.pattern.replace_all(text, template.as_str()).into_owned()
            }
            Replacement::Wrap(class_name) => self
                .pattern
                .replace_all(text, |caps: &Captures| {
                    format!("<span class='{}'>{}</span>", class_name, &caps[0])
                })
                .into_owned(),
        }
    }
}

/// A rule ready to run over plain-text segments
#[derive(Debug, Clone)]
pub enum CompiledRule {
    /// Keyword matchers applied one after another, in token order
    Keywords {
        name: String,
        matchers: Vec<KeywordMatcher>,
    },
    Pattern(PatternRule),
}

impl CompiledRule {
    pub fn keywords(rule: &KeywordRule, model: &ConfigModel) -> Result<Self> {
        let matchers = rule
            .tokens
            .iter()
            .map(|token| KeywordMatcher::new(rule, token, model.class_for_type(&token.token_type)))
            .collect::<Result<Vec<_>>>()?;
        trace!(rule = %rule.name, keywords = matchers.len(), "compiled keyword rule");
        Ok(CompiledRule::Keywords {
            name: rule.name.clone(),
            matchers,
        })
    }

    pub fn pattern(rule: &RegexRule, model: &ConfigModel) -> Result<Self> {
        let compiled = PatternRule::new(rule, model)?;
        trace!(rule = %rule.name, pattern = %rule.pattern, "compiled regex rule");
        Ok(CompiledRule::Pattern(compiled))
    }

    pub fn name(&self) -> &str {
        match self {
            CompiledRule::Keywords { name, .. } => name,
            CompiledRule::Pattern(rule) => &rule.name,
        }
    }

    /// Rewrite one plain-text segment
    ///
    /// Keyword matchers run sequentially, each over the previous one's
    /// output, so a later keyword can match inside markup inserted by an
    /// earlier one within the same segment.
    pub fn apply(&self, segment: &str) -> String {
        match self {
            CompiledRule::Keywords { matchers, .. } => matchers
                .iter()
                .fold(segment.to_string(), |text, matcher| matcher.apply(&text)),
            CompiledRule::Pattern(rule) => rule.apply(segment),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Translate a `$&`/`$n`/`$nn`/`$<name>`/`$$` replacement template into
/// the regex crate's `${0}`/`${n}`/`${name}`/`$$` form
///
/// References resolve against the groups `pattern` actually has: `$nn`
/// is tried before `$n`, and `$<name>` is only a reference when the
/// pattern names at least one group. Anything else keeps its `$` literally.
pub fn translate_template(template: &str, pattern: &Regex) -> String {
    let groups = pattern.captures_len() - 1;
    let names: Vec<&str> = pattern.capture_names().flatten().collect();

    let mut out = String::with_capacity(template.len() + 8);
    let mut rest = template;
    while let Some(dollar) = rest.find('$') {
        out.push_str(&rest[..dollar]);
        let after = &rest[dollar + 1..];
        match group_reference(after, groups, &names) {
            Some((expansion, consumed)) => {
                out.push_str(&expansion);
                rest = &after[consumed..];
            }
            None => {
                out.push_str("$$");
                rest = after;
            }
        }
    }
    out.push_str(rest);

    out
}

/// Expansion and length of the reference following a `$`, if it is one
fn group_reference(after: &str, groups: usize, names: &[&str]) -> Option<(String, usize)> {
    let bytes = after.as_bytes();
    match *bytes.first()? {
        b'$' => Some(("$$".to_string(), 1)),
        b'&' => Some(("${0}".to_string(), 1)),
        b'<' if !names.is_empty() => {
            let end = after.find('>')?;
            let name = &after[1..end];
            // unknown names expand to nothing
            let expansion = if names.contains(&name) {
                format!("${{{}}}", name)
            } else {
                String::new()
            };
            Some((expansion, end + 1))
        }
        first if first.is_ascii_digit() => {
            let first = usize::from(first - b'0');
            if let Some(&second) = bytes.get(1).filter(|b| b.is_ascii_digit()) {
                let index = first * 10 + usize::from(second - b'0');
                if (1..=groups).contains(&index) {
                    return Some((format!("${{{}}}", index), 2));
                }
            }
            (1..=groups)
                .contains(&first)
                .then(|| (format!("${{{}}}", first), 1))
        }
        _ => None,
    }
}
