//! Placeholder tokens that stand in for `<expr>` and `<ID>` tags.
//!
//! These are never produced by a lexer, so their position fields are fixed
//! sentinels: line 0, column -1, token index -1.

use crate::pattern::errors::PatternError;
use crate::tree::{Token, TokenType};
use std::borrow::Cow;
use std::fmt;

/// A `<rule>` or `<label:rule>` tag; its type is the rule's bypass token type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTagToken {
    rule_name: String,
    bypass_token_type: TokenType,
    label: Option<String>,
}

impl RuleTagToken {
    pub fn new(
        rule_name: impl Into<String>,
        bypass_token_type: TokenType,
        label: Option<String>,
    ) -> Result<Self, PatternError> {
        let rule_name = rule_name.into();
        if rule_name.is_empty() {
            return Err(PatternError::EmptyTagName { kind: "rule" });
        }
        Ok(Self {
            rule_name,
            bypass_token_type,
            label,
        })
    }

    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl Token for RuleTagToken {
    fn token_type(&self) -> TokenType {
        self.bypass_token_type
    }

    fn text(&self) -> Cow<'_, str> {
        Cow::Owned(tag_text(&self.rule_name, self.label.as_deref()))
    }

    fn line(&self) -> u32 {
        0
    }

    fn column(&self) -> i32 {
        -1
    }

    fn token_index(&self) -> i32 {
        -1
    }

    fn start_index(&self) -> i32 {
        -1
    }

    fn stop_index(&self) -> i32 {
        -1
    }
}

impl fmt::Display for RuleTagToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.rule_name, self.bypass_token_type)
    }
}

/// A `<TOKEN>` or `<label:TOKEN>` tag; matches any token of that type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTagToken {
    token_name: String,
    token_type: TokenType,
    label: Option<String>,
}

impl TokenTagToken {
    pub fn new(
        token_name: impl Into<String>,
        token_type: TokenType,
        label: Option<String>,
    ) -> Result<Self, PatternError> {
        let token_name = token_name.into();
        if token_name.is_empty() {
            return Err(PatternError::EmptyTagName { kind: "token" });
        }
        Ok(Self {
            token_name,
            token_type,
            label,
        })
    }

    pub fn token_name(&self) -> &str {
        &self.token_name
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl Token for TokenTagToken {
    fn token_type(&self) -> TokenType {
        self.token_type
    }

    fn text(&self) -> Cow<'_, str> {
        Cow::Owned(tag_text(&self.token_name, self.label.as_deref()))
    }

    fn line(&self) -> u32 {
        0
    }

    fn column(&self) -> i32 {
        -1
    }

    fn token_index(&self) -> i32 {
        -1
    }

    fn start_index(&self) -> i32 {
        -1
    }

    fn stop_index(&self) -> i32 {
        -1
    }
}

impl fmt::Display for TokenTagToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.token_name, self.token_type)
    }
}

fn tag_text(name: &str, label: Option<&str>) -> String {
    match label {
        Some(label) => format!("<{label}:{name}>"),
        None => format!("<{name}>"),
    }
}
