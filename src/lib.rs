//! Tree Pattern: structural matching and path queries over parse trees
//!
//! Patterns are written in the concrete syntax of a grammar, with `<tag>`
//! holes for tokens and whole subtrees. They are compiled with the grammar's
//! own tokenizer and parser, so a pattern tree has exactly the shape of the
//! trees it is matched against.
//!
//! # Architecture
//!
//! - [`tree`]: arena parse trees, node handles, and traversal helpers.
//! - [`grammar`]: the [`Vocabulary`], [`Tokenizer`] and [`BypassParser`]
//!   seams a grammar implements, plus a bundled sample grammar.
//! - [`pattern`]: chunk splitting, pattern compilation, and matching.
//! - [`xpath`]: `//expr/!primary`-style path queries.
//! - [`config`]: TOML rule files and a scanner that runs them.
//!
//! # Example
//!
//! ```no_run
//! use tree_pattern::grammar::expr::{self, ExprLexer, ExprParser, RULE_STAT};
//! use tree_pattern::ParseTreePatternMatcher;
//!
//! let tree = expr::parse_source("def f(x) { x = 1; y = x * 2; }", "prog").unwrap();
//! let mut matcher = ParseTreePatternMatcher::new(ExprLexer::new(), ExprParser::new());
//!
//! for m in matcher.find_all(tree.root(), "<ID> = <expr>;", RULE_STAT, "//stat").unwrap() {
//!     println!("{} := {}", m.get("ID").unwrap().text(), m.get("expr").unwrap().text());
//! }
//! ```

pub mod config;
pub mod grammar;
pub mod pattern;
pub mod tree;
pub mod xpath;

// Re-exports
pub use config::{load_from_path, load_from_str, scan, ConfigError, RuleReport, ScanConfig};
pub use grammar::{BypassParser, ErrorStrategy, ParseFailure, RecognitionError, Tokenizer, Vocabulary};
pub use pattern::{
    Chunk, Delimiters, ParseTreeMatch, ParseTreePattern, ParseTreePatternMatcher, PatternError,
};
pub use tree::{Node, ParseTree, TreeBuilder};
pub use xpath::{XPath, XPathError};

/// Install a stderr `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `tree_pattern=warn`, or
/// `tree_pattern=debug` when `verbose`.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default = if verbose {
        "tree_pattern=debug"
    } else {
        "tree_pattern=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}
