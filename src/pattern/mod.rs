//! Tree patterns: concrete syntax with `<tag>` holes.
//!
//! A pattern such as `<ID> = <e:expr>;` is split into text and tag chunks,
//! tokenized (tags become placeholder tokens, text goes through the grammar's
//! lexer), and parsed with the grammar's parser into a pattern tree. Matching
//! walks a subject tree and the pattern tree in lockstep; tags match whole
//! tokens or subtrees and record what they matched under their names and
//! labels.
//!
//! ```no_run
//! use tree_pattern::grammar::expr::{self, ExprLexer, ExprParser, RULE_STAT};
//! use tree_pattern::pattern::ParseTreePatternMatcher;
//!
//! let tree = expr::parse_source("x = 3 + 4;", "stat").unwrap();
//! let mut matcher = ParseTreePatternMatcher::new(ExprLexer::new(), ExprParser::new());
//! let pattern = matcher.compile("<ID> = <e:expr>;", RULE_STAT).unwrap();
//! let m = pattern.match_tree(tree.root());
//! assert_eq!(m.get("e").unwrap().text(), "3+4");
//! ```

pub mod chunk;
pub mod compiled;
pub mod errors;
pub mod matcher;
pub mod tag;
pub mod tree_match;

pub use chunk::{Chunk, Delimiters, TagChunk, TextChunk};
pub use compiled::ParseTreePattern;
pub use errors::PatternError;
pub use matcher::ParseTreePatternMatcher;
pub use tag::{RuleTagToken, TokenTagToken};
pub use tree_match::{LabelMap, ParseTreeMatch};
