use crate::grammar::expr::{
    ExprVocabulary, ADD, ASSIGN, COMMA, DEF, DIV, ID, INT, LBRACE, LPAREN, MUL, RBRACE, RETURN,
    RPAREN, RULE_ARG, RULE_BODY, RULE_EXPR, RULE_FUNC, RULE_PRIMARY, RULE_PROG, RULE_STAT, SEMI,
    SUB,
};
use crate::grammar::{
    BypassParser, ErrorStrategy, ParseFailure, RecognitionError, TokenStream, Vocabulary,
};
use crate::tree::{NodeId, ParseTree, TokenType, TreeBuilder, TreeError};
use std::sync::Arc;
use tracing::debug;

/// Deepest parenthesized expression the parser descends into.
pub const MAX_NESTING: usize = 200;

/// Recursive-descent parser for the expression grammar.
///
/// Every rule first checks for its bypass token, so a pattern such as
/// `<ID> = <expr>;` parses into `(stat <ID> = (expr <expr>) ;)`.
#[derive(Debug, Clone)]
pub struct ExprParser {
    vocabulary: Arc<ExprVocabulary>,
}

impl ExprParser {
    pub fn new() -> Self {
        Self {
            vocabulary: Arc::new(ExprVocabulary::new()),
        }
    }
}

impl Default for ExprParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BypassParser for ExprParser {
    fn vocabulary(&self) -> Arc<dyn Vocabulary> {
        self.vocabulary.clone()
    }

    fn parse(
        &mut self,
        tokens: &mut TokenStream,
        start_rule: usize,
        strategy: ErrorStrategy,
    ) -> Result<ParseTree, ParseFailure> {
        if self.vocabulary.rule_name(start_rule).is_none() {
            return Err(ParseFailure::Other(
                format!("no rule with index {start_rule}").into(),
            ));
        }

        let mut rd = RuleDescent {
            tokens,
            vocabulary: &self.vocabulary,
            builder: TreeBuilder::new(),
            nesting: 0,
        };

        let result = rd.invoke(start_rule).and_then(|root| {
            rd.builder.build(root).map_err(Halt::Tree)
        });

        result.map_err(|halt| match halt {
            Halt::Syntax(e) => {
                debug!("parse failed at rule {}: {}", start_rule, e);
                match strategy {
                    ErrorStrategy::Bail => ParseFailure::Cancelled(e),
                    ErrorStrategy::Report => ParseFailure::Recognition(e),
                }
            }
            Halt::Tree(e) => ParseFailure::Other(Box::new(e)),
        })
    }
}

enum Halt {
    Syntax(RecognitionError),
    Tree(TreeError),
}

impl From<TreeError> for Halt {
    fn from(e: TreeError) -> Self {
        Halt::Tree(e)
    }
}

struct RuleDescent<'a> {
    tokens: &'a mut TokenStream,
    vocabulary: &'a ExprVocabulary,
    builder: TreeBuilder,
    nesting: usize,
}

impl RuleDescent<'_> {
    fn invoke(&mut self, rule: usize) -> Result<NodeId, Halt> {
        match rule {
            RULE_PROG => self.prog(),
            RULE_FUNC => self.func(),
            RULE_BODY => self.body(),
            RULE_ARG => self.arg(),
            RULE_STAT => self.stat(),
            RULE_EXPR => self.expr(0),
            RULE_PRIMARY => self.primary(),
            _ => Err(self.no_viable()),
        }
    }

    fn prog(&mut self) -> Result<NodeId, Halt> {
        if let Some(tag) = self.bypass(RULE_PROG)? {
            return Ok(tag);
        }
        if !self.starts_func() {
            return Err(self.no_viable());
        }
        let mut children = Vec::new();
        while self.starts_func() {
            children.push(self.func()?);
        }
        Ok(self.builder.rule(RULE_PROG, children)?)
    }

    fn func(&mut self) -> Result<NodeId, Halt> {
        if let Some(tag) = self.bypass(RULE_FUNC)? {
            return Ok(tag);
        }
        let mut children = vec![self.expect(DEF)?, self.expect(ID)?, self.expect(LPAREN)?];
        children.push(self.arg()?);
        while self.tokens.la(1) == COMMA {
            children.push(self.expect(COMMA)?);
            children.push(self.arg()?);
        }
        children.push(self.expect(RPAREN)?);
        children.push(self.body()?);
        Ok(self.builder.rule(RULE_FUNC, children)?)
    }

    fn body(&mut self) -> Result<NodeId, Halt> {
        if let Some(tag) = self.bypass(RULE_BODY)? {
            return Ok(tag);
        }
        let mut children = vec![self.expect(LBRACE)?];
        children.push(self.stat()?);
        while self.starts_stat() {
            children.push(self.stat()?);
        }
        children.push(self.expect(RBRACE)?);
        Ok(self.builder.rule(RULE_BODY, children)?)
    }

    fn arg(&mut self) -> Result<NodeId, Halt> {
        if let Some(tag) = self.bypass(RULE_ARG)? {
            return Ok(tag);
        }
        let id = self.expect(ID)?;
        Ok(self.builder.rule(RULE_ARG, vec![id])?)
    }

    fn stat(&mut self) -> Result<NodeId, Halt> {
        if let Some(tag) = self.bypass(RULE_STAT)? {
            return Ok(tag);
        }
        let children = match self.tokens.la(1) {
            ID if self.tokens.la(2) == ASSIGN => vec![
                self.expect(ID)?,
                self.expect(ASSIGN)?,
                self.expr(0)?,
                self.expect(SEMI)?,
            ],
            RETURN => vec![self.expect(RETURN)?, self.expr(0)?, self.expect(SEMI)?],
            SEMI => vec![self.expect(SEMI)?],
            t if self.starts_expr(t) => vec![self.expr(0)?, self.expect(SEMI)?],
            _ => return Err(self.no_viable()),
        };
        Ok(self.builder.rule(RULE_STAT, children)?)
    }

    fn expr(&mut self, min_precedence: u8) -> Result<NodeId, Halt> {
        if self.nesting >= MAX_NESTING {
            return Err(Halt::Syntax(RecognitionError::NestingTooDeep {
                limit: MAX_NESTING,
                token_index: self.tokens.index(),
            }));
        }
        self.nesting += 1;
        let result = self.climb(min_precedence);
        self.nesting -= 1;
        result
    }

    /// Precedence climbing; builds the same left-nested shape a
    /// left-recursive `expr` rule produces.
    fn climb(&mut self, min_precedence: u8) -> Result<NodeId, Halt> {
        let mut lhs = match self.bypass(RULE_EXPR)? {
            Some(tag) => tag,
            None => {
                let primary = self.primary()?;
                self.builder.rule(RULE_EXPR, vec![primary])?
            }
        };

        loop {
            let precedence = match self.tokens.la(1) {
                MUL | DIV => 2,
                ADD | SUB => 1,
                _ => break,
            };
            if precedence < min_precedence {
                break;
            }
            let op = self.consume_leaf()?;
            let rhs = self.expr(precedence + 1)?;
            lhs = self.builder.rule(RULE_EXPR, vec![lhs, op, rhs])?;
        }

        Ok(lhs)
    }

    fn primary(&mut self) -> Result<NodeId, Halt> {
        if let Some(tag) = self.bypass(RULE_PRIMARY)? {
            return Ok(tag);
        }
        let children = match self.tokens.la(1) {
            INT | ID => vec![self.consume_leaf()?],
            LPAREN => vec![self.expect(LPAREN)?, self.expr(0)?, self.expect(RPAREN)?],
            _ => return Err(self.no_viable()),
        };
        Ok(self.builder.rule(RULE_PRIMARY, children)?)
    }

    fn starts_func(&self) -> bool {
        let t = self.tokens.la(1);
        t == DEF || self.is_bypass(t, RULE_FUNC)
    }

    fn starts_stat(&self) -> bool {
        let t = self.tokens.la(1);
        matches!(t, RETURN | SEMI) || self.is_bypass(t, RULE_STAT) || self.starts_expr(t)
    }

    fn starts_expr(&self, t: TokenType) -> bool {
        matches!(t, ID | INT | LPAREN)
            || self.is_bypass(t, RULE_EXPR)
            || self.is_bypass(t, RULE_PRIMARY)
    }

    fn is_bypass(&self, t: TokenType, rule: usize) -> bool {
        self.vocabulary.bypass_token_type(rule) == Some(t)
    }

    /// Consume `(rule <tag>)` if the current token is `rule`'s bypass token.
    fn bypass(&mut self, rule: usize) -> Result<Option<NodeId>, Halt> {
        if !self.is_bypass(self.tokens.la(1), rule) {
            return Ok(None);
        }
        let tag = self.consume_leaf()?;
        Ok(Some(self.builder.rule(rule, vec![tag])?))
    }

    fn expect(&mut self, token_type: TokenType) -> Result<NodeId, Halt> {
        if self.tokens.la(1) != token_type {
            return Err(Halt::Syntax(RecognitionError::InputMismatch {
                found: self.tokens.current_text(),
                expected: self.vocabulary.display_name(token_type),
                token_index: self.tokens.index(),
            }));
        }
        self.consume_leaf()
    }

    fn consume_leaf(&mut self) -> Result<NodeId, Halt> {
        match self.tokens.consume() {
            Some(symbol) => Ok(self.builder.leaf(symbol)),
            None => Err(self.no_viable()),
        }
    }

    fn no_viable(&self) -> Halt {
        Halt::Syntax(RecognitionError::NoViableAlternative {
            found: self.tokens.current_text(),
            token_index: self.tokens.index(),
        })
    }
}
