use crate::grammar::{BypassParser, ErrorStrategy, ParseFailure, Tokenizer, TokenStream};
use crate::pattern::chunk::{Chunk, Delimiters};
use crate::pattern::compiled::ParseTreePattern;
use crate::pattern::errors::PatternError;
use crate::pattern::tag::{RuleTagToken, TokenTagToken};
use crate::pattern::tree_match::{LabelMap, ParseTreeMatch};
use crate::tree::{Node, NodeKind, Symbol, Token, EOF};
use tracing::{debug, trace};

/// Compiles tree patterns with a grammar's tokenizer and parser, and matches
/// them against parse trees of the same grammar.
///
/// Compiling needs `&mut self`: the tokenizer and parser are driven in place,
/// so one matcher serves one compilation at a time. Matching an already
/// compiled [`ParseTreePattern`] needs no matcher at all.
#[derive(Debug)]
pub struct ParseTreePatternMatcher<L, P> {
    lexer: L,
    parser: P,
    delimiters: Delimiters,
}

impl<L: Tokenizer, P: BypassParser> ParseTreePatternMatcher<L, P> {
    pub fn new(lexer: L, parser: P) -> Self {
        Self {
            lexer,
            parser,
            delimiters: Delimiters::default(),
        }
    }

    pub fn with_delimiters(mut self, delimiters: Delimiters) -> Self {
        self.delimiters = delimiters;
        self
    }

    /// Replace the tag delimiters, e.g. `<<`, `>>`, `$`.
    pub fn set_delimiters(&mut self, start: &str, stop: &str, escape: &str) -> Result<(), PatternError> {
        self.delimiters = Delimiters::new(start, stop, escape)?;
        Ok(())
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    pub fn lexer(&self) -> &L {
        &self.lexer
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    pub fn split(&self, pattern: &str) -> Result<Vec<Chunk>, PatternError> {
        self.delimiters.split(pattern)
    }

    /// Turn a pattern into the token sequence the parser sees: a tag token
    /// per tag and the lexer's tokens for each text chunk.
    pub fn tokenize(&mut self, pattern: &str) -> Result<Vec<Symbol>, PatternError> {
        let vocabulary = self.parser.vocabulary();
        let mut tokens = Vec::new();

        for chunk in self.delimiters.split(pattern)? {
            match chunk {
                Chunk::Tag(tag) => {
                    let name = tag.tag();
                    let label = tag.label().map(str::to_string);
                    let first = name.chars().next().unwrap_or_default();
                    if first.is_uppercase() {
                        let token_type = vocabulary.token_type(name).ok_or_else(|| {
                            PatternError::UnknownToken {
                                tag: name.to_string(),
                                pattern: pattern.to_string(),
                            }
                        })?;
                        tokens.push(TokenTagToken::new(name, token_type, label)?.into());
                    } else if first.is_lowercase() {
                        let bypass = vocabulary
                            .rule_index(name)
                            .and_then(|rule| vocabulary.bypass_token_type(rule))
                            .ok_or_else(|| PatternError::UnknownRule {
                                tag: name.to_string(),
                                pattern: pattern.to_string(),
                            })?;
                        tokens.push(RuleTagToken::new(name, bypass, label)?.into());
                    } else {
                        return Err(PatternError::InvalidTag {
                            tag: name.to_string(),
                            pattern: pattern.to_string(),
                        });
                    }
                }
                Chunk::Text(text) => {
                    let lexed = self.lexer.tokenize(text.text()).map_err(|source| {
                        PatternError::Tokenize {
                            text: text.text().to_string(),
                            source,
                        }
                    })?;
                    tokens.extend(lexed.into_iter().map(Symbol::from));
                }
            }
        }

        trace!(pattern, count = tokens.len(), "tokenized pattern");
        Ok(tokens)
    }

    /// Compile `pattern` as an instance of the rule `pattern_rule_index`.
    pub fn compile(&mut self, pattern: &str, pattern_rule_index: usize) -> Result<ParseTreePattern, PatternError> {
        let tokens = self.tokenize(pattern)?;
        let mut stream = TokenStream::new(tokens);

        let tree = self
            .parser
            .parse(&mut stream, pattern_rule_index, ErrorStrategy::Bail)
            .map_err(|failure| match failure {
                ParseFailure::Cancelled(cause) | ParseFailure::Recognition(cause) => {
                    PatternError::Recognition(cause)
                }
                ParseFailure::Other(err) => PatternError::CannotInvokeStartRule(err),
            })?;

        if stream.la(1) != EOF {
            return Err(PatternError::StartRuleDoesNotConsumeFullPattern {
                pattern: pattern.to_string(),
            });
        }

        debug!(pattern, rule = pattern_rule_index, nodes = tree.len(), "compiled pattern");
        Ok(ParseTreePattern::new(
            pattern,
            pattern_rule_index,
            tree,
            self.parser.vocabulary(),
        ))
    }

    pub fn match_tree<'t>(&self, tree: Node<'t>, pattern: &ParseTreePattern) -> ParseTreeMatch<'t> {
        pattern.match_tree(tree)
    }

    pub fn matches(&self, tree: Node<'_>, pattern: &ParseTreePattern) -> bool {
        pattern.matches(tree)
    }

    /// Compile `pattern` and match it against `tree` in one step.
    pub fn match_pattern<'t>(
        &mut self,
        tree: Node<'t>,
        pattern: &str,
        pattern_rule_index: usize,
    ) -> Result<ParseTreeMatch<'t>, PatternError> {
        Ok(self.compile(pattern, pattern_rule_index)?.match_tree(tree))
    }

    pub fn matches_pattern(
        &mut self,
        tree: Node<'_>,
        pattern: &str,
        pattern_rule_index: usize,
    ) -> Result<bool, PatternError> {
        Ok(self.compile(pattern, pattern_rule_index)?.matches(tree))
    }

    /// Compile `pattern`, select subtrees of `tree` with `xpath`, and return
    /// the successful matches.
    pub fn find_all<'t>(
        &mut self,
        tree: Node<'t>,
        pattern: &str,
        pattern_rule_index: usize,
        xpath: &str,
    ) -> Result<Vec<ParseTreeMatch<'t>>, PatternError> {
        let compiled = self.compile(pattern, pattern_rule_index)?;
        Ok(compiled.find_all(tree, xpath)?)
    }
}

/// Walk `tree` and `pattern_tree` in lockstep, recording tag captures into
/// `labels`. Returns the first subject node that fails to match.
pub(crate) fn match_impl<'t>(
    tree: Node<'t>,
    pattern_tree: Node<'_>,
    labels: &mut LabelMap<'t>,
) -> Option<Node<'t>> {
    match (tree.kind(), pattern_tree.kind()) {
        (NodeKind::Terminal(symbol), NodeKind::Terminal(pattern_symbol)) => {
            if symbol.token_type() != pattern_symbol.token_type() {
                return Some(tree);
            }
            match pattern_symbol {
                Symbol::TokenTag(tag) => {
                    labels.map(tag.token_name(), tree);
                    if let Some(label) = tag.label() {
                        labels.map(label, tree);
                    }
                    None
                }
                _ if symbol.text() == pattern_symbol.text() => None,
                _ => Some(tree),
            }
        }
        (NodeKind::Rule(rule_index), NodeKind::Rule(pattern_rule_index)) => {
            if let Some(tag) = pattern_tree.rule_tag() {
                if rule_index != pattern_rule_index {
                    return Some(tree);
                }
                labels.map(tag.rule_name(), tree);
                if let Some(label) = tag.label() {
                    labels.map(label, tree);
                }
                return None;
            }

            if tree.child_count() != pattern_tree.child_count() {
                return Some(tree);
            }
            tree.children()
                .zip(pattern_tree.children())
                .find_map(|(child, pattern_child)| match_impl(child, pattern_child, labels))
        }
        _ => Some(tree),
    }
}
