//! A small function/statement/expression language.
//!
//! ```text
//! prog    : func+ ;
//! func    : 'def' ID '(' arg (',' arg)* ')' body ;
//! body    : '{' stat+ '}' ;
//! arg     : ID ;
//! stat    : ID '=' expr ';' | 'return' expr ';' | expr ';' | ';' ;
//! expr    : expr ('*'|'/') expr | expr ('+'|'-') expr | primary ;
//! primary : INT | ID | '(' expr ')' ;
//! ```
//!
//! It is deliberately shaped like the grammars parse-tree tooling is usually
//! exercised against: nested rules, a left-recursive expression rule, keyword
//! and punctuation literals.

pub mod lexer;
pub mod parser;

pub use lexer::ExprLexer;
pub use parser::ExprParser;

use crate::grammar::{BypassParser, ErrorStrategy, ParseFailure, RecognitionError, TokenStream};
use crate::grammar::{Tokenizer, Vocabulary};
use crate::tree::{ParseTree, Symbol, TokenType, EOF};

pub const DEF: TokenType = 1;
pub const LPAREN: TokenType = 2;
pub const COMMA: TokenType = 3;
pub const RPAREN: TokenType = 4;
pub const LBRACE: TokenType = 5;
pub const RBRACE: TokenType = 6;
pub const SEMI: TokenType = 7;
pub const ASSIGN: TokenType = 8;
pub const MUL: TokenType = 9;
pub const DIV: TokenType = 10;
pub const ADD: TokenType = 11;
pub const SUB: TokenType = 12;
pub const RETURN: TokenType = 13;
pub const ID: TokenType = 14;
pub const INT: TokenType = 15;

const MAX_TOKEN_TYPE: TokenType = INT;

pub const RULE_PROG: usize = 0;
pub const RULE_FUNC: usize = 1;
pub const RULE_BODY: usize = 2;
pub const RULE_ARG: usize = 3;
pub const RULE_STAT: usize = 4;
pub const RULE_EXPR: usize = 5;
pub const RULE_PRIMARY: usize = 6;

const RULE_NAMES: [&str; 7] = ["prog", "func", "body", "arg", "stat", "expr", "primary"];

// Indexed by token type.
const LITERAL_NAMES: [Option<&str>; 16] = [
    None,
    Some("'def'"),
    Some("'('"),
    Some("','"),
    Some("')'"),
    Some("'{'"),
    Some("'}'"),
    Some("';'"),
    Some("'='"),
    Some("'*'"),
    Some("'/'"),
    Some("'+'"),
    Some("'-'"),
    Some("'return'"),
    None,
    None,
];

const SYMBOLIC_NAMES: [Option<&str>; 16] = [
    None,
    Some("DEF"),
    Some("LPAREN"),
    Some("COMMA"),
    Some("RPAREN"),
    Some("LBRACE"),
    Some("RBRACE"),
    Some("SEMI"),
    Some("ASSIGN"),
    Some("MUL"),
    Some("DIV"),
    Some("ADD"),
    Some("SUB"),
    Some("RETURN"),
    Some("ID"),
    Some("INT"),
];

/// Token and rule names of the expression grammar.
///
/// The bypass token of rule `r` is `MAX_TOKEN_TYPE + 1 + r`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExprVocabulary;

impl ExprVocabulary {
    pub fn new() -> Self {
        Self
    }
}

impl Vocabulary for ExprVocabulary {
    fn token_type(&self, name: &str) -> Option<TokenType> {
        let by = |names: &[Option<&str>]| names.iter().position(|n| *n == Some(name));
        by(&SYMBOLIC_NAMES)
            .or_else(|| by(&LITERAL_NAMES))
            .map(|i| i as TokenType)
    }

    fn rule_index(&self, name: &str) -> Option<usize> {
        RULE_NAMES.iter().position(|r| *r == name)
    }

    fn rule_name(&self, rule_index: usize) -> Option<&str> {
        RULE_NAMES.get(rule_index).copied()
    }

    fn display_name(&self, token_type: TokenType) -> String {
        if token_type == EOF {
            return "<EOF>".to_string();
        }
        if token_type > MAX_TOKEN_TYPE {
            let rule = (token_type - MAX_TOKEN_TYPE - 1) as usize;
            if let Some(name) = RULE_NAMES.get(rule) {
                return format!("<{name}>");
            }
        }
        let index = token_type as usize;
        LITERAL_NAMES
            .get(index)
            .copied()
            .flatten()
            .or_else(|| SYMBOLIC_NAMES.get(index).copied().flatten())
            .map(str::to_string)
            .unwrap_or_else(|| token_type.to_string())
    }

    fn bypass_token_type(&self, rule_index: usize) -> Option<TokenType> {
        (rule_index < RULE_NAMES.len()).then(|| MAX_TOKEN_TYPE + 1 + rule_index as TokenType)
    }
}

/// Lex and parse `source` starting at the rule called `start_rule`.
///
/// Unlike [`BypassParser::parse`], this requires the whole input to be
/// consumed.
pub fn parse_source(source: &str, start_rule: &str) -> Result<ParseTree, ParseFailure> {
    let vocabulary = ExprVocabulary::new();
    let rule = vocabulary
        .rule_index(start_rule)
        .ok_or_else(|| ParseFailure::Other(format!("unknown rule '{start_rule}'").into()))?;

    let tokens = ExprLexer::new()
        .tokenize(source)
        .map_err(ParseFailure::Recognition)?;
    let mut stream = TokenStream::new(tokens.into_iter().map(Symbol::from).collect());

    let tree = ExprParser::new().parse(&mut stream, rule, ErrorStrategy::Report)?;
    if stream.la(1) != EOF {
        return Err(ParseFailure::Recognition(RecognitionError::ExtraneousInput {
            found: stream.current_text(),
            token_index: stream.index(),
        }));
    }
    Ok(tree)
}
