//! Path queries over parse trees.
//!
//! A path is a sequence of steps, each a separator, an optional `!`, and a
//! word:
//!
//! | step        | selects                                             |
//! |-------------|-----------------------------------------------------|
//! | `/expr`     | `expr` rule children                                |
//! | `//expr`    | `expr` rule nodes at or below the context node      |
//! | `/ID`       | `ID` token children (`'return'` works too)          |
//! | `/*`, `//*` | every child, every node at or below                 |
//! | `/!expr`    | rule children that are not `expr`                   |
//!
//! The first step is evaluated from an implicit parent of the root, so
//! `/prog` selects the root of a `prog` tree. A leading bare word behaves
//! like a `/` step. Results are returned as an ordered set.

pub mod element;
pub mod errors;
pub mod lexer;
pub mod path;

pub use element::{ElementKind, XPathElement};
pub use errors::XPathError;
pub use path::XPath;
