//! Generic traversal helpers over [`Node`] handles.

use crate::grammar::Vocabulary;
use crate::tree::node::{Node, NodeKind};
use crate::tree::token::{Token, TokenType};

/// Immediate children of `node`, in order.
pub fn children(node: Node<'_>) -> Vec<Node<'_>> {
    node.children().collect()
}

/// Every node of the subtree rooted at `node`, in pre-order, `node` first.
pub fn descendants(node: Node<'_>) -> Vec<Node<'_>> {
    let mut out = Vec::new();
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        out.push(current);
        stack.extend(current.children().rev());
    }
    out
}

/// Rule nodes with `rule_index` in the subtree of `node`, including `node`.
pub fn find_all_rule_nodes(node: Node<'_>, rule_index: usize) -> Vec<Node<'_>> {
    descendants(node)
        .into_iter()
        .filter(|n| n.rule_index() == Some(rule_index))
        .collect()
}

/// Terminal nodes of `token_type` in the subtree of `node`, including `node`.
pub fn find_all_token_nodes(node: Node<'_>, token_type: TokenType) -> Vec<Node<'_>> {
    descendants(node)
        .into_iter()
        .filter(|n| n.symbol().is_some_and(|s| s.token_type() == token_type))
        .collect()
}

/// Whether `ancestor` sits strictly above `node`.
pub fn is_ancestor_of(ancestor: Node<'_>, node: Node<'_>) -> bool {
    let mut current = node.parent();
    while let Some(p) = current {
        if p == ancestor {
            return true;
        }
        current = p.parent();
    }
    false
}

/// Display text for a single node: the rule name or the token text.
pub fn node_text(node: Node<'_>, vocabulary: &dyn Vocabulary) -> String {
    match node.kind() {
        NodeKind::Rule(index) => vocabulary
            .rule_name(index)
            .map(str::to_string)
            .unwrap_or_else(|| index.to_string()),
        NodeKind::Terminal(symbol) => symbol.text().into_owned(),
    }
}

/// LISP-style rendering, e.g. `(stat <ID> = (expr <expr>) ;)`.
pub fn to_string_tree(node: Node<'_>, vocabulary: &dyn Vocabulary) -> String {
    let text = escape_whitespace(&node_text(node, vocabulary));
    if node.child_count() == 0 {
        return text;
    }

    let mut out = format!("({text}");
    for child in node.children() {
        out.push(' ');
        out.push_str(&to_string_tree(child, vocabulary));
    }
    out.push(')');
    out
}

fn escape_whitespace(text: &str) -> String {
    text.replace('\t', "\\t")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::expr::{self, ExprVocabulary};
    use crate::grammar::expr::{ID, INT};

    #[test]
    fn descendants_are_preorder_and_include_self() {
        let tree = expr::parse_source("x = 1;", "stat").unwrap();
        let all = descendants(tree.root());

        assert_eq!(all[0], tree.root());
        let texts: Vec<String> = all
            .iter()
            .filter_map(|n| n.symbol().map(|s| s.text().into_owned()))
            .collect();
        assert_eq!(texts, vec!["x", "=", "1", ";"]);
    }

    #[test]
    fn find_all_token_nodes_by_type() {
        let tree = expr::parse_source("def f(a, b) { a = b + 1; }", "prog").unwrap();

        let ids = find_all_token_nodes(tree.root(), ID);
        let texts: Vec<String> = ids.iter().map(|n| n.text()).collect();
        assert_eq!(texts, vec!["f", "a", "b", "a", "b"]);

        assert_eq!(find_all_token_nodes(tree.root(), INT).len(), 1);
    }

    #[test]
    fn find_all_rule_nodes_includes_self() {
        let tree = expr::parse_source("1 + 2", "expr").unwrap();
        let exprs = find_all_rule_nodes(tree.root(), expr::RULE_EXPR);
        assert_eq!(exprs.len(), 3);
        assert_eq!(exprs[0], tree.root());
    }

    #[test]
    fn ancestor_check() {
        let tree = expr::parse_source("x = 1;", "stat").unwrap();
        let root = tree.root();
        let one = find_all_token_nodes(root, INT)[0];

        assert!(is_ancestor_of(root, one));
        assert!(!is_ancestor_of(one, root));
        assert!(!is_ancestor_of(root, root));
    }

    #[test]
    fn string_tree_rendering() {
        let tree = expr::parse_source("x = 1;", "stat").unwrap();
        let vocab = ExprVocabulary::new();
        assert_eq!(
            to_string_tree(tree.root(), &vocab),
            "(stat x = (expr (primary 1)) ;)"
        );
    }
}
