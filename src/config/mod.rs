//! TOML rule files: named patterns with the path that selects their
//! candidate subtrees, and a scanner that runs them over a tree.

pub mod loader;
pub mod scanner;
pub mod schema;

pub use loader::{
    load_for_grammar, load_from_path, load_from_str, load_str_for_grammar, ConfigError,
};
pub use scanner::{scan, MatchSummary, RuleReport};
pub use schema::{
    DelimiterConfig, Metadata, RuleDefinition, ScanConfig, ValidationError, ValidationIssue,
};
