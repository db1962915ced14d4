use crate::grammar::RecognitionError;
use crate::xpath::XPathError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("start cannot be null or empty")]
    EmptyStartDelimiter,

    #[error("stop cannot be null or empty")]
    EmptyStopDelimiter,

    #[error("escape cannot be null or empty")]
    EmptyEscape,

    #[error("tag cannot be null or empty")]
    EmptyTag,

    #[error("{kind} name cannot be null or empty")]
    EmptyTagName { kind: &'static str },

    #[error("unterminated tag in pattern: {pattern}")]
    UnterminatedTag { pattern: String },

    #[error("missing start tag in pattern: {pattern}")]
    MissingStartTag { pattern: String },

    #[error("tag delimiters out of order in pattern: {pattern}")]
    DelimitersOutOfOrder { pattern: String },

    #[error("Unknown token {tag} in pattern: {pattern}")]
    UnknownToken { tag: String, pattern: String },

    #[error("Unknown rule {tag} in pattern: {pattern}")]
    UnknownRule { tag: String, pattern: String },

    #[error("invalid tag: {tag} in pattern: {pattern}")]
    InvalidTag { tag: String, pattern: String },

    #[error("cannot tokenize '{text}' in pattern: {source}")]
    Tokenize {
        text: String,
        #[source]
        source: RecognitionError,
    },

    /// The pattern is not a sentence of the start rule.
    #[error(transparent)]
    Recognition(RecognitionError),

    #[error("CannotInvokeStartRule: {0}")]
    CannotInvokeStartRule(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("start rule does not consume full pattern: {pattern}")]
    StartRuleDoesNotConsumeFullPattern { pattern: String },

    #[error(transparent)]
    XPath(#[from] XPathError),
}
