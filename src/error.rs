//! Error types for rcse

use thiserror::Error;

/// Result type alias for rcse operations
pub type Result<T> = std::result::Result<T, SyntaxError>;

/// Grammar, highlighting and transport errors
#[derive(Error, Debug)]
pub enum SyntaxError {
    #[error("Missing required key: {0}")]
    MissingKey(&'static str),

    #[error("{0} must be an array")]
    NotASequence(&'static str),

    #[error("Each rule must have name and matchType")]
    RuleMissingField,

    #[error("Keyword rule '{0}' must have a tokens array")]
    KeywordRuleWithoutTokens(String),

    #[error("Each token must have keyword and type (in rule '{0}')")]
    TokenMissingField(String),

    #[error("Regex rule '{0}' must have a pattern")]
    RegexRuleWithoutPattern(String),

    #[error("Each type must have className, highlightColor, and parentType")]
    TypeMissingField,

    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML document: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Malformed configuration: {0}")]
    Document(String),

    #[error("Invalid pattern in rule '{rule}': {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to fetch configuration from {url} (status {status})")]
    Fetch { url: String, status: u16 },

    #[error("Failed to fetch configuration from {url}: {message}")]
    Transport { url: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyntaxError {
    /// Whether this error came from structural validation of a document
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SyntaxError::MissingKey(_)
                | SyntaxError::NotASequence(_)
                | SyntaxError::RuleMissingField
                | SyntaxError::KeywordRuleWithoutTokens(_)
                | SyntaxError::TokenMissingField(_)
                | SyntaxError::RegexRuleWithoutPattern(_)
                | SyntaxError::TypeMissingField
        )
    }
}
