//! Parse tree model consumed by the pattern matcher and the path evaluator.
//!
//! Trees are arenas of rule and terminal nodes linked both ways. A terminal's
//! payload is a [`Symbol`], which distinguishes real lexed tokens from the
//! placeholder tokens a compiled pattern carries.

pub mod errors;
pub mod node;
pub mod token;
pub mod trees;

pub use errors::TreeError;
pub use node::{Node, NodeId, NodeKind, ParseTree, TreeBuilder, MAX_DEPTH};
pub use token::{CommonToken, Symbol, Token, TokenType, EOF, INVALID_TYPE, MIN_USER_TOKEN_TYPE};
