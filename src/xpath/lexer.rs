use crate::xpath::errors::XPathError;
use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Raw {
    #[token("//")]
    Anywhere,
    #[token("/")]
    Root,
    #[token("*")]
    Wildcard,
    #[token("!")]
    Bang,
    #[regex(r"[\p{L}_][\p{L}\p{N}_]*")]
    Id,
    #[regex(r"'[^']*'")]
    Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathTokenKind {
    Anywhere,
    Root,
    Wildcard,
    Bang,
    /// Identifier starting with anything but a lowercase letter.
    TokenRef,
    /// Identifier starting with a lowercase letter.
    RuleRef,
    /// Quoted literal such as `'return'`.
    Literal,
}

impl PathTokenKind {
    pub fn is_separator(self) -> bool {
        matches!(self, PathTokenKind::Anywhere | PathTokenKind::Root)
    }

    pub fn is_word(self) -> bool {
        matches!(
            self,
            PathTokenKind::Wildcard
                | PathTokenKind::TokenRef
                | PathTokenKind::RuleRef
                | PathTokenKind::Literal
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathToken {
    pub kind: PathTokenKind,
    pub text: String,
    /// Character offset in the path.
    pub index: usize,
}

/// Lex a path; fails at the first character no token accepts.
pub fn tokenize(path: &str) -> Result<Vec<PathToken>, XPathError> {
    let mut lexer = Raw::lexer(path);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let index = path[..span.start].chars().count();
        let raw = result.map_err(|_| XPathError::InvalidCharacters {
            index,
            path: path.to_string(),
        })?;
        let text = lexer.slice();

        let kind = match raw {
            Raw::Anywhere => PathTokenKind::Anywhere,
            Raw::Root => PathTokenKind::Root,
            Raw::Wildcard => PathTokenKind::Wildcard,
            Raw::Bang => PathTokenKind::Bang,
            Raw::Literal => PathTokenKind::Literal,
            Raw::Id if text.starts_with(char::is_lowercase) => PathTokenKind::RuleRef,
            Raw::Id => PathTokenKind::TokenRef,
        };
        tokens.push(PathToken {
            kind,
            text: text.to_string(),
            index,
        });
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use PathTokenKind::*;

    fn kinds(path: &str) -> Vec<PathTokenKind> {
        tokenize(path).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn separators_and_words() {
        assert_eq!(kinds("//ID"), vec![Anywhere, TokenRef]);
        assert_eq!(kinds("/prog/func"), vec![Root, RuleRef, Root, RuleRef]);
        assert_eq!(kinds("///"), vec![Anywhere, Root]);
        assert_eq!(kinds("//expr/!*"), vec![Anywhere, RuleRef, Root, Bang, Wildcard]);
    }

    #[test]
    fn identifier_case_decides_kind() {
        assert_eq!(kinds("Ick"), vec![TokenRef]);
        assert_eq!(kinds("_x"), vec![TokenRef]);
        assert_eq!(kinds("ick"), vec![RuleRef]);
    }

    #[test]
    fn quoted_literals() {
        let tokens = tokenize("//'return'").unwrap();
        assert_eq!(tokens[1].kind, Literal);
        assert_eq!(tokens[1].text, "'return'");
        assert_eq!(tokens[1].index, 2);
    }

    #[test]
    fn bad_character_index() {
        let err = tokenize("//w&e/").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid tokens or characters at index 3 in path '//w&e/'"
        );
    }
}
