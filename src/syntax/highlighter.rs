//! Rule-driven highlighter
//!
//! This module provides the Highlighter, which turns plain text into
//! span markup by running every rule of a grammar, in order, over the
//! output of the previous rule.
//!
//! Each pass splits the current text into markup tags and plain text,
//! and only rewrites plain text. Plain text lying inside a comment span
//! is left alone, so comment rules must come before the rules that are
//! expected to respect them.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use super::config::HighlightingRule;
use super::model::ConfigModel;
use super::rules::CompiledRule;
use crate::error::Result;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("tag pattern"));

/// Start of an opening comment span
const COMMENT_OPENING: &str = "<span class='rcse-comment'";
const CLOSING_SPAN: &str = "</span>";

/// Highlighter bound to one configuration model
///
/// Rules are compiled at construction. A model replaced later is not
/// observed; build a new highlighter for it.
#[derive(Debug, Clone)]
pub struct Highlighter<'a> {
    model: &'a ConfigModel,
    rules: Vec<CompiledRule>,
}

impl<'a> Highlighter<'a> {
    /// Compile every rule of the model
    ///
    /// Fails on the first rule whose pattern does not compile.
    pub fn new(model: &'a ConfigModel) -> Result<Self> {
        let mut rules = Vec::new();
        for rule in model.highlighting_rules() {
            match rule {
                HighlightingRule::Keyword(rule) => rules.push(CompiledRule::keywords(rule, model)?),
                HighlightingRule::Regex(rule) => rules.push(CompiledRule::pattern(rule, model)?),
                HighlightingRule::Unsupported(_) => {
                    debug!(rule = ?rule.name(), "skipping rule with unsupported match type");
                }
            }
        }
        Ok(Self { model, rules })
    }

    pub fn model(&self) -> &'a ConfigModel {
        self.model
    }

    /// Annotate text with span markup
    ///
    /// Empty or absent input yields an empty string.
    pub fn highlight<'t>(&self, text: impl Into<Option<&'t str>>) -> String {
        let text = match text.into() {
            Some(text) if !text.is_empty() => text,
            _ => return String::new(),
        };

        let mut highlighted = escape_html(text);
        for rule in &self.rules {
            highlighted = apply_rule(rule, &highlighted);
            trace!(rule = rule.name(), len = highlighted.len(), "applied rule");
        }
        highlighted
    }
}

/// Escape the five HTML-significant characters, then restore single quotes
///
/// Single quotes delimit markup attributes and are expected literally in
/// text (string literals, apostrophes), so they are not left escaped.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push('\''),
            c => out.push(c),
        }
    }
    out
}

/// Split text into alternating plain-text and tag segments
///
/// Plain-text segments may be empty; tags are always at odd indices.
pub fn split_segments(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut last = 0;
    for tag in TAG.find_iter(text) {
        segments.push(&text[last..tag.start()]);
        segments.push(tag.as_str());
        last = tag.end();
    }
    segments.push(&text[last..]);
    segments
}

fn is_tag(segment: &str) -> bool {
    segment.starts_with('<')
}

/// Whether the plain-text segment at `index` sits inside an open comment span
///
/// Scans back to the nearest closing span or comment opening; other
/// opening tags are passed over.
fn inside_comment(segments: &[&str], index: usize) -> bool {
    for segment in segments[..index].iter().rev() {
        if !is_tag(segment) {
            continue;
        }
        if *segment == CLOSING_SPAN {
            return false;
        }
        if segment.starts_with(COMMENT_OPENING) {
            return true;
        }
    }
    false
}

/// Run one rule over every eligible plain-text segment
fn apply_rule(rule: &CompiledRule, text: &str) -> String {
    let segments = split_segments(text);
    let mut result = String::with_capacity(text.len());

    for (index, segment) in segments.iter().enumerate() {
        if is_tag(segment) || inside_comment(&segments, index) {
            result.push_str(segment);
        } else {
            result.push_str(&rule.apply(segment));
        }
    }

    result
}
