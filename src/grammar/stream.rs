use crate::tree::{Symbol, Token, TokenType, EOF};

/// A buffered token stream with arbitrary lookahead.
///
/// Pattern tokens are a mix of lexed tokens and synthetic tag tokens, so the
/// buffer holds [`Symbol`]s. Looking past the end yields [`EOF`].
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Symbol>,
    index: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Symbol>) -> Self {
        Self { tokens, index: 0 }
    }

    /// Type of the `i`-th token ahead; `la(1)` is the current token.
    pub fn la(&self, i: usize) -> TokenType {
        self.lt(i).map(|t| t.token_type()).unwrap_or(EOF)
    }

    /// The `i`-th token ahead; `lt(1)` is the current token.
    pub fn lt(&self, i: usize) -> Option<&Symbol> {
        if i == 0 {
            return None;
        }
        self.tokens.get(self.index + i - 1)
    }

    /// Take the current token and advance. Returns `None` at end of input.
    pub fn consume(&mut self) -> Option<Symbol> {
        let token = self.tokens.get(self.index)?.clone();
        self.index += 1;
        Some(token)
    }

    /// Position of the current token.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Text of the current token, `<EOF>` past the end.
    pub fn current_text(&self) -> String {
        self.lt(1)
            .map(|t| t.text().into_owned())
            .unwrap_or_else(|| "<EOF>".to_string())
    }
}

impl From<Vec<Symbol>> for TokenStream {
    fn from(tokens: Vec<Symbol>) -> Self {
        Self::new(tokens)
    }
}
