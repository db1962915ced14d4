//! Grammar-side collaborators: vocabulary lookups, tokenizing, and parsing.
//!
//! The pattern compiler never lexes or parses on its own. It drives a
//! [`Tokenizer`] over the literal parts of a pattern and hands the resulting
//! token sequence to a [`BypassParser`], which must treat each rule's bypass
//! token type as a stand-in for a full invocation of that rule.
//!
//! [`expr`] is a small bundled grammar implementing all three traits.

pub mod errors;
pub mod expr;
pub mod stream;

pub use errors::{ParseFailure, RecognitionError};
pub use stream::TokenStream;

use crate::tree::{CommonToken, ParseTree, TokenType};
use std::fmt;
use std::sync::Arc;

/// Name lookups for a grammar's tokens and rules.
pub trait Vocabulary: fmt::Debug + Send + Sync {
    /// Resolve a symbolic (`ID`) or quoted literal (`'return'`) token name.
    fn token_type(&self, name: &str) -> Option<TokenType>;

    fn rule_index(&self, name: &str) -> Option<usize>;

    fn rule_name(&self, rule_index: usize) -> Option<&str>;

    /// Human-readable name of a token type, used in error messages.
    fn display_name(&self, token_type: TokenType) -> String;

    /// The synthetic token type that stands for a whole invocation of a rule.
    fn bypass_token_type(&self, rule_index: usize) -> Option<TokenType>;
}

/// Turns literal text into tokens.
pub trait Tokenizer {
    /// Reset to `text` and drain every token up to, not including, EOF.
    ///
    /// Takes `&mut self`: a tokenizer instance serves one caller at a time.
    fn tokenize(&mut self, text: &str) -> Result<Vec<CommonToken>, RecognitionError>;
}

/// How a parser reacts to its first syntax error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorStrategy {
    /// Abort immediately; the error surfaces as [`ParseFailure::Cancelled`].
    Bail,
    /// Report the error as [`ParseFailure::Recognition`].
    #[default]
    Report,
}

/// A parser that can start at any rule and accepts bypass tokens.
pub trait BypassParser {
    fn vocabulary(&self) -> Arc<dyn Vocabulary>;

    /// Parse `tokens` starting at `start_rule`.
    ///
    /// Stops after the start rule completes; trailing tokens are left in the
    /// stream for the caller to inspect.
    fn parse(
        &mut self,
        tokens: &mut TokenStream,
        start_rule: usize,
        strategy: ErrorStrategy,
    ) -> Result<ParseTree, ParseFailure>;
}
