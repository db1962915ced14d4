use crate::pattern::{RuleTagToken, TokenTagToken};
use std::borrow::Cow;
use std::fmt;

/// Numeric token kind assigned by a grammar.
pub type TokenType = i32;

/// End-of-input marker returned by token streams.
pub const EOF: TokenType = -1;

/// Never assigned to a real token; lookups that fail resolve to this.
pub const INVALID_TYPE: TokenType = 0;

/// Smallest token type a grammar may hand out.
pub const MIN_USER_TOKEN_TYPE: TokenType = 1;

/// The capability surface shared by real and synthetic tokens.
pub trait Token {
    fn token_type(&self) -> TokenType;
    fn text(&self) -> Cow<'_, str>;
    /// 1-based line, or 0 for tokens that never came from input.
    fn line(&self) -> u32;
    /// 0-based column, or -1 for tokens that never came from input.
    fn column(&self) -> i32;
    fn token_index(&self) -> i32;
    fn start_index(&self) -> i32;
    fn stop_index(&self) -> i32;
}

/// A token produced by lexing real input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonToken {
    pub token_type: TokenType,
    pub text: String,
    pub line: u32,
    pub column: i32,
    pub token_index: i32,
    /// Byte offset of the first character (inclusive)
    pub start: i32,
    /// Byte offset of the last character (inclusive)
    pub stop: i32,
}

impl CommonToken {
    /// Create a token with no position information.
    pub fn new(token_type: TokenType, text: impl Into<String>) -> Self {
        Self {
            token_type,
            text: text.into(),
            line: 1,
            column: -1,
            token_index: -1,
            start: -1,
            stop: -1,
        }
    }

    pub fn eof() -> Self {
        Self::new(EOF, "<EOF>")
    }
}

impl Token for CommonToken {
    fn token_type(&self) -> TokenType {
        self.token_type
    }

    fn text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.text)
    }

    fn line(&self) -> u32 {
        self.line
    }

    fn column(&self) -> i32 {
        self.column
    }

    fn token_index(&self) -> i32 {
        self.token_index
    }

    fn start_index(&self) -> i32 {
        self.start
    }

    fn stop_index(&self) -> i32 {
        self.stop
    }
}

impl fmt::Display for CommonToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .text
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t");
        write!(
            f,
            "[@{},{}:{}='{}',<{}>,{}:{}]",
            self.token_index,
            self.start,
            self.stop,
            text,
            self.token_type,
            self.line,
            self.column
        )
    }
}

/// Payload of a terminal node: either real input or a pattern placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Common(CommonToken),
    RuleTag(RuleTagToken),
    TokenTag(TokenTagToken),
}

impl Symbol {
    pub fn as_rule_tag(&self) -> Option<&RuleTagToken> {
        match self {
            Symbol::RuleTag(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn as_token_tag(&self) -> Option<&TokenTagToken> {
        match self {
            Symbol::TokenTag(tag) => Some(tag),
            _ => None,
        }
    }

    /// Whether this symbol is a placeholder rather than lexed input.
    pub fn is_tag(&self) -> bool {
        !matches!(self, Symbol::Common(_))
    }

    fn inner(&self) -> &dyn Token {
        match self {
            Symbol::Common(t) => t,
            Symbol::RuleTag(t) => t,
            Symbol::TokenTag(t) => t,
        }
    }
}

impl Token for Symbol {
    fn token_type(&self) -> TokenType {
        self.inner().token_type()
    }

    fn text(&self) -> Cow<'_, str> {
        self.inner().text()
    }

    fn line(&self) -> u32 {
        self.inner().line()
    }

    fn column(&self) -> i32 {
        self.inner().column()
    }

    fn token_index(&self) -> i32 {
        self.inner().token_index()
    }

    fn start_index(&self) -> i32 {
        self.inner().start_index()
    }

    fn stop_index(&self) -> i32 {
        self.inner().stop_index()
    }
}

impl From<CommonToken> for Symbol {
    fn from(token: CommonToken) -> Self {
        Symbol::Common(token)
    }
}

impl From<RuleTagToken> for Symbol {
    fn from(token: RuleTagToken) -> Self {
        Symbol::RuleTag(token)
    }
}

impl From<TokenTagToken> for Symbol {
    fn from(token: TokenTagToken) -> Self {
        Symbol::TokenTag(token)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Common(t) => t.fmt(f),
            Symbol::RuleTag(t) => t.fmt(f),
            Symbol::TokenTag(t) => t.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_token_display_matches_runtime_format() {
        let token = CommonToken {
            token_type: 1,
            text: "=".to_string(),
            line: 1,
            column: 1,
            token_index: -1,
            start: 1,
            stop: 1,
        };
        assert_eq!(token.to_string(), "[@-1,1:1='=',<1>,1:1]");
    }

    #[test]
    fn symbol_delegates_to_tag_sentinels() {
        let tag = TokenTagToken::new("ID", 3, None).unwrap();
        let symbol = Symbol::from(tag);

        assert!(symbol.is_tag());
        assert_eq!(symbol.token_type(), 3);
        assert_eq!(symbol.text(), "<ID>");
        assert_eq!(symbol.line(), 0);
        assert_eq!(symbol.column(), -1);
        assert_eq!(symbol.token_index(), -1);
    }

    #[test]
    fn common_symbol_is_not_a_tag() {
        let symbol = Symbol::from(CommonToken::new(5, "x"));
        assert!(!symbol.is_tag());
        assert!(symbol.as_rule_tag().is_none());
        assert!(symbol.as_token_tag().is_none());
    }
}
