use crate::tree::{trees, Node, NodeKind, Token, TokenType};
use std::fmt;

/// What one path step selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Rule children with this rule index.
    Rule(usize),
    /// Rule nodes with this index anywhere at or below the context node.
    RuleAnywhere(usize),
    /// Terminal children with this token type.
    Token(TokenType),
    /// Terminal nodes with this type anywhere at or below the context node.
    TokenAnywhere(TokenType),
    Wildcard,
    WildcardAnywhere,
}

impl ElementKind {
    fn name(self) -> &'static str {
        match self {
            ElementKind::Rule(_) => "Rule",
            ElementKind::RuleAnywhere(_) => "RuleAnywhere",
            ElementKind::Token(_) => "Token",
            ElementKind::TokenAnywhere(_) => "TokenAnywhere",
            ElementKind::Wildcard => "Wildcard",
            ElementKind::WildcardAnywhere => "WildcardAnywhere",
        }
    }
}

/// Where a step is evaluated from.
///
/// The first step of a path runs against an implicit parent of the tree
/// root, so `/prog` tests the root itself and `//x` includes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Context<'t> {
    AboveRoot(Node<'t>),
    Node(Node<'t>),
}

impl<'t> Context<'t> {
    pub(crate) fn has_children(self) -> bool {
        match self {
            Context::AboveRoot(_) => true,
            Context::Node(node) => node.child_count() > 0,
        }
    }

    fn children(self) -> Vec<Node<'t>> {
        match self {
            Context::AboveRoot(root) => vec![root],
            Context::Node(node) => trees::children(node),
        }
    }

    /// The topmost real node in scope; anywhere steps search from here.
    fn top(self) -> Node<'t> {
        match self {
            Context::AboveRoot(node) | Context::Node(node) => node,
        }
    }
}

/// One step of a compiled path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XPathElement {
    node_name: String,
    kind: ElementKind,
    invert: bool,
}

impl XPathElement {
    pub fn new(node_name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            node_name: node_name.into(),
            kind,
            invert: false,
        }
    }

    pub fn inverted(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn node_name(&self) -> &str {
        &self.node_name
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    /// Nodes this step selects from `node`.
    ///
    /// Child steps honor `!`. Anywhere steps ignore it, except that `//!*`
    /// selects nothing.
    pub fn evaluate<'t>(&self, node: Node<'t>) -> Vec<Node<'t>> {
        self.evaluate_in(Context::Node(node))
    }

    pub(crate) fn evaluate_in<'t>(&self, context: Context<'t>) -> Vec<Node<'t>> {
        match self.kind {
            ElementKind::Rule(index) => context
                .children()
                .into_iter()
                .filter(|child| match child.kind() {
                    NodeKind::Rule(rule) => (rule == index) != self.invert,
                    NodeKind::Terminal(_) => false,
                })
                .collect(),
            ElementKind::Token(token_type) => context
                .children()
                .into_iter()
                .filter(|child| match child.kind() {
                    NodeKind::Terminal(symbol) => (symbol.token_type() == token_type) != self.invert,
                    NodeKind::Rule(_) => false,
                })
                .collect(),
            ElementKind::Wildcard if self.invert => Vec::new(),
            ElementKind::Wildcard => context.children(),
            ElementKind::RuleAnywhere(index) => trees::find_all_rule_nodes(context.top(), index),
            ElementKind::TokenAnywhere(token_type) => {
                trees::find_all_token_nodes(context.top(), token_type)
            }
            ElementKind::WildcardAnywhere if self.invert => Vec::new(),
            ElementKind::WildcardAnywhere => trees::descendants(context.top()),
        }
    }
}

impl fmt::Display for XPathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bang = if self.invert { "!" } else { "" };
        write!(f, "{}[{}{}]", self.kind.name(), bang, self.node_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::expr::{self, ID, RULE_EXPR, RULE_PRIMARY};

    fn texts(nodes: &[Node<'_>]) -> Vec<String> {
        nodes.iter().map(|n| n.text()).collect()
    }

    #[test]
    fn child_steps_filter_by_kind() {
        let tree = expr::parse_source("x = y + 1;", "stat").unwrap();
        let stat = tree.root();

        let ids = XPathElement::new("ID", ElementKind::Token(ID)).evaluate(stat);
        assert_eq!(texts(&ids), vec!["x"]);

        let not_ids = XPathElement::new("ID", ElementKind::Token(ID))
            .inverted(true)
            .evaluate(stat);
        assert_eq!(texts(&not_ids), vec!["=", ";"]);

        let exprs = XPathElement::new("expr", ElementKind::Rule(RULE_EXPR)).evaluate(stat);
        assert_eq!(texts(&exprs), vec!["y+1"]);

        let not_primary = XPathElement::new("primary", ElementKind::Rule(RULE_PRIMARY))
            .inverted(true)
            .evaluate(stat);
        assert_eq!(texts(&not_primary), vec!["y+1"]);
    }

    #[test]
    fn anywhere_steps_include_context() {
        let tree = expr::parse_source("x = y + 1;", "stat").unwrap();
        let exprs = XPathElement::new("expr", ElementKind::RuleAnywhere(RULE_EXPR))
            .evaluate(tree.root().child(2).unwrap());
        assert_eq!(texts(&exprs), vec!["y+1", "y", "1"]);

        let ids = XPathElement::new("ID", ElementKind::TokenAnywhere(ID))
            .inverted(true)
            .evaluate(tree.root());
        assert_eq!(texts(&ids), vec!["x", "y"]);
    }

    #[test]
    fn wildcards() {
        let tree = expr::parse_source("x = 1;", "stat").unwrap();
        let all = XPathElement::new("*", ElementKind::Wildcard).evaluate(tree.root());
        assert_eq!(all.len(), 4);
        let none = XPathElement::new("*", ElementKind::WildcardAnywhere)
            .inverted(true)
            .evaluate(tree.root());
        assert!(none.is_empty());
        let everything = XPathElement::new("*", ElementKind::WildcardAnywhere).evaluate(tree.root());
        assert_eq!(everything.len(), tree.len());
    }

    #[test]
    fn display_shows_inversion() {
        let element = XPathElement::new("expr", ElementKind::Rule(RULE_EXPR)).inverted(true);
        assert_eq!(element.to_string(), "Rule[!expr]");
        let plain = XPathElement::new("ID", ElementKind::TokenAnywhere(ID));
        assert_eq!(plain.to_string(), "TokenAnywhere[ID]");
    }
}
