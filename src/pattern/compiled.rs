use crate::grammar::Vocabulary;
use crate::pattern::matcher::match_impl;
use crate::pattern::tree_match::{LabelMap, ParseTreeMatch};
use crate::tree::{trees, Node, ParseTree};
use crate::xpath::{XPath, XPathError};
use std::fmt;
use std::sync::Arc;

/// A compiled pattern: the source text, the rule it was parsed as, and the
/// resulting tree whose leaves may be tag placeholders.
///
/// Cloning is cheap; the tree and vocabulary are shared.
#[derive(Debug, Clone)]
pub struct ParseTreePattern {
    pattern: Arc<str>,
    pattern_rule_index: usize,
    tree: Arc<ParseTree>,
    vocabulary: Arc<dyn Vocabulary>,
}

impl ParseTreePattern {
    pub fn new(
        pattern: &str,
        pattern_rule_index: usize,
        tree: ParseTree,
        vocabulary: Arc<dyn Vocabulary>,
    ) -> Self {
        Self {
            pattern: Arc::from(pattern),
            pattern_rule_index,
            tree: Arc::new(tree),
            vocabulary,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn pattern_rule_index(&self) -> usize {
        self.pattern_rule_index
    }

    pub fn pattern_tree(&self) -> Node<'_> {
        self.tree.root()
    }

    pub fn vocabulary(&self) -> &Arc<dyn Vocabulary> {
        &self.vocabulary
    }

    /// LISP-style rendering of the pattern tree.
    pub fn to_string_tree(&self) -> String {
        trees::to_string_tree(self.pattern_tree(), self.vocabulary.as_ref())
    }

    pub fn match_tree<'t>(&self, tree: Node<'t>) -> ParseTreeMatch<'t> {
        let mut labels = LabelMap::new();
        let mismatched = match_impl(tree, self.pattern_tree(), &mut labels);
        ParseTreeMatch::new(tree, self.clone(), labels, mismatched)
    }

    pub fn matches(&self, tree: Node<'_>) -> bool {
        let mut labels = LabelMap::new();
        match_impl(tree, self.pattern_tree(), &mut labels).is_none()
    }

    /// Select subtrees of `tree` with `xpath` and keep the successful matches,
    /// in path-result order.
    pub fn find_all<'t>(
        &self,
        tree: Node<'t>,
        xpath: &str,
    ) -> Result<Vec<ParseTreeMatch<'t>>, XPathError> {
        let subtrees = XPath::find_all(tree, xpath, self.vocabulary.as_ref())?;
        Ok(subtrees
            .into_iter()
            .map(|subtree| self.match_tree(subtree))
            .filter(ParseTreeMatch::succeeded)
            .collect())
    }
}

impl fmt::Display for ParseTreePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}
