use crate::grammar::expr::{
    ADD, ASSIGN, COMMA, DEF, DIV, ID, INT, LBRACE, LPAREN, MUL, RBRACE, RETURN, RPAREN, SEMI, SUB,
};
use crate::grammar::{RecognitionError, Tokenizer};
use crate::tree::{CommonToken, TokenType};
use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
enum Lexeme {
    #[token("def")]
    Def,
    #[token("(")]
    LParen,
    #[token(",")]
    Comma,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semi,
    #[token("=")]
    Assign,
    #[token("*")]
    Mul,
    #[token("/")]
    Div,
    #[token("+")]
    Add,
    #[token("-")]
    Sub,
    #[token("return")]
    Return,
    #[regex("[a-zA-Z]+")]
    Id,
    #[regex("[0-9]+")]
    Int,
}

impl Lexeme {
    fn token_type(self) -> TokenType {
        match self {
            Lexeme::Def => DEF,
            Lexeme::LParen => LPAREN,
            Lexeme::Comma => COMMA,
            Lexeme::RParen => RPAREN,
            Lexeme::LBrace => LBRACE,
            Lexeme::RBrace => RBRACE,
            Lexeme::Semi => SEMI,
            Lexeme::Assign => ASSIGN,
            Lexeme::Mul => MUL,
            Lexeme::Div => DIV,
            Lexeme::Add => ADD,
            Lexeme::Sub => SUB,
            Lexeme::Return => RETURN,
            Lexeme::Id => ID,
            Lexeme::Int => INT,
        }
    }
}

/// Lexer for the expression grammar. Whitespace is skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExprLexer;

impl ExprLexer {
    pub fn new() -> Self {
        Self
    }
}

impl Tokenizer for ExprLexer {
    fn tokenize(&mut self, text: &str) -> Result<Vec<CommonToken>, RecognitionError> {
        let mut lexer = Lexeme::lexer(text);
        let mut tokens = Vec::new();
        let mut line = 1u32;
        let mut line_start = 0usize;
        let mut scanned = 0usize;

        while let Some(result) = lexer.next() {
            let span = lexer.span();
            for (offset, ch) in text[scanned..span.start].char_indices() {
                if ch == '\n' {
                    line += 1;
                    line_start = scanned + offset + 1;
                }
            }
            scanned = span.start;

            let lexeme = result.map_err(|_| RecognitionError::TokenRecognition {
                text: lexer.slice().to_string(),
                offset: span.start,
            })?;

            tokens.push(CommonToken {
                token_type: lexeme.token_type(),
                text: lexer.slice().to_string(),
                line,
                column: (span.start - line_start) as i32,
                token_index: tokens.len() as i32,
                start: span.start as i32,
                stop: span.end as i32 - 1,
            });
        }

        Ok(tokens)
    }
}
