use crate::pattern::RuleTagToken;
use crate::tree::errors::TreeError;
use crate::tree::token::{Symbol, Token, EOF};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Deepest tree [`TreeBuilder`] will produce, counting the root as depth 1.
pub const MAX_DEPTH: usize = 1000;

/// Index of a node inside its owning [`ParseTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Payload {
    Rule { rule_index: usize },
    Terminal(Symbol),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeData {
    payload: Payload,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Depth of the subtree rooted here; a leaf is 1.
    height: usize,
}

/// An immutable parse tree stored as an arena of rule and terminal nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTree {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl ParseTree {
    pub fn root(&self) -> Node<'_> {
        Node {
            tree: self,
            id: self.root,
        }
    }

    pub fn node(&self, id: NodeId) -> Option<Node<'_>> {
        (id.0 < self.nodes.len()).then_some(Node { tree: self, id })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }
}

/// Bottom-up constructor for [`ParseTree`].
///
/// Leaves are created first, then wrapped by the rule node that owns them.
/// A node can be adopted by at most one parent, and no tree grows deeper
/// than [`MAX_DEPTH`].
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<NodeData>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leaf(&mut self, symbol: impl Into<Symbol>) -> NodeId {
        self.push(Payload::Terminal(symbol.into()), Vec::new())
    }

    pub fn rule(
        &mut self,
        rule_index: usize,
        children: Vec<NodeId>,
    ) -> Result<NodeId, TreeError> {
        let mut seen = HashSet::with_capacity(children.len());
        let mut height = 0;
        for &child in &children {
            let data = self
                .nodes
                .get(child.0)
                .ok_or(TreeError::UnknownNode { id: child.0 })?;
            if data.parent.is_some() || !seen.insert(child) {
                return Err(TreeError::AlreadyAttached { id: child.0 });
            }
            height = height.max(data.height);
        }
        if height >= MAX_DEPTH {
            return Err(TreeError::TooDeep { limit: MAX_DEPTH });
        }

        let id = NodeId(self.nodes.len());
        for &child in &children {
            self.nodes[child.0].parent = Some(id);
        }
        self.nodes.push(NodeData {
            payload: Payload::Rule { rule_index },
            parent: None,
            children,
            height: height + 1,
        });
        Ok(id)
    }

    /// Finish the tree rooted at `root`.
    ///
    /// Nodes not reachable from `root` stay in the arena but are never visited.
    pub fn build(self, root: NodeId) -> Result<ParseTree, TreeError> {
        let data = self
            .nodes
            .get(root.0)
            .ok_or(TreeError::UnknownNode { id: root.0 })?;
        if data.parent.is_some() {
            return Err(TreeError::RootHasParent { id: root.0 });
        }
        Ok(ParseTree {
            nodes: self.nodes,
            root,
        })
    }

    fn push(&mut self, payload: Payload, children: Vec<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            payload,
            parent: None,
            children,
            height: 1,
        });
        id
    }
}

/// What a node is: a rule invocation or a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind<'t> {
    Rule(usize),
    Terminal(&'t Symbol),
}

/// A borrowed handle to one node of a [`ParseTree`].
///
/// Equality and hashing are by identity: two handles are equal only if they
/// point at the same node of the same tree.
#[derive(Clone, Copy)]
pub struct Node<'t> {
    tree: &'t ParseTree,
    id: NodeId,
}

impl<'t> Node<'t> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'t ParseTree {
        self.tree
    }

    pub fn kind(&self) -> NodeKind<'t> {
        match &self.tree.data(self.id).payload {
            Payload::Rule { rule_index } => NodeKind::Rule(*rule_index),
            Payload::Terminal(symbol) => NodeKind::Terminal(symbol),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.kind(), NodeKind::Terminal(_))
    }

    pub fn rule_index(&self) -> Option<usize> {
        match self.kind() {
            NodeKind::Rule(index) => Some(index),
            NodeKind::Terminal(_) => None,
        }
    }

    pub fn symbol(&self) -> Option<&'t Symbol> {
        match self.kind() {
            NodeKind::Terminal(symbol) => Some(symbol),
            NodeKind::Rule(_) => None,
        }
    }

    pub fn parent(&self) -> Option<Node<'t>> {
        self.tree.data(self.id).parent.map(|id| self.with_id(id))
    }

    pub fn child_count(&self) -> usize {
        self.tree.data(self.id).children.len()
    }

    pub fn child(&self, i: usize) -> Option<Node<'t>> {
        self.tree
            .data(self.id)
            .children
            .get(i)
            .map(|&id| self.with_id(id))
    }

    pub fn children(&self) -> impl DoubleEndedIterator<Item = Node<'t>> + ExactSizeIterator + 't {
        let tree = self.tree;
        tree.data(self.id)
            .children
            .iter()
            .map(move |&id| Node { tree, id })
    }

    /// The rule tag this node stands for, if it is a `(rule <tag>)` wrapper.
    ///
    /// A pattern tree represents `<expr>` as a rule node with exactly one
    /// terminal child whose symbol is a [`RuleTagToken`].
    pub fn rule_tag(&self) -> Option<&'t RuleTagToken> {
        if self.rule_index().is_none() || self.child_count() != 1 {
            return None;
        }
        self.child(0)?.symbol()?.as_rule_tag()
    }

    /// Concatenated text of every terminal below this node, EOF excluded.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in crate::tree::trees::descendants(*self) {
            if let Some(symbol) = node.symbol() {
                if symbol.token_type() != EOF {
                    out.push_str(&symbol.text());
                }
            }
        }
        out
    }

    fn with_id(&self, id: NodeId) -> Node<'t> {
        Node {
            tree: self.tree,
            id,
        }
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl Hash for Node<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.tree, state);
        self.id.hash(state);
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            NodeKind::Rule(index) => write!(f, "Rule#{}({index})", self.id.0),
            NodeKind::Terminal(symbol) => write!(f, "Terminal#{}({:?})", self.id.0, symbol.text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::RuleTagToken;
    use crate::tree::token::CommonToken;

    fn assign_tree() -> ParseTree {
        // (0 x = (1 (2 0)) ;)
        let mut b = TreeBuilder::new();
        let x = b.leaf(CommonToken::new(1, "x"));
        let eq = b.leaf(CommonToken::new(2, "="));
        let zero = b.leaf(CommonToken::new(3, "0"));
        let primary = b.rule(2, vec![zero]).unwrap();
        let expr = b.rule(1, vec![primary]).unwrap();
        let semi = b.leaf(CommonToken::new(4, ";"));
        let stat = b.rule(0, vec![x, eq, expr, semi]).unwrap();
        b.build(stat).unwrap()
    }

    #[test]
    fn navigation() {
        let tree = assign_tree();
        let root = tree.root();

        assert_eq!(root.rule_index(), Some(0));
        assert_eq!(root.child_count(), 4);
        assert!(root.parent().is_none());

        let expr = root.child(2).unwrap();
        assert_eq!(expr.rule_index(), Some(1));
        assert_eq!(expr.parent(), Some(root));
        assert!(root.child(4).is_none());
    }

    #[test]
    fn text_concatenates_leaves() {
        let tree = assign_tree();
        assert_eq!(tree.root().text(), "x=0;");
    }

    #[test]
    fn identity_equality() {
        let a = assign_tree();
        let b = assign_tree();
        assert_eq!(a.root(), a.root());
        assert_ne!(a.root(), b.root());
    }

    #[test]
    fn rule_tag_wrapper_detected() {
        let mut b = TreeBuilder::new();
        let tag = b.leaf(RuleTagToken::new("expr", 9, None).unwrap());
        let expr = b.rule(1, vec![tag]).unwrap();
        let tree = b.build(expr).unwrap();

        let found = tree.root().rule_tag().unwrap();
        assert_eq!(found.rule_name(), "expr");
        assert!(tree.root().child(0).unwrap().rule_tag().is_none());
    }

    #[test]
    fn child_cannot_be_adopted_twice() {
        let mut b = TreeBuilder::new();
        let leaf = b.leaf(CommonToken::new(1, "x"));
        b.rule(0, vec![leaf]).unwrap();
        let err = b.rule(0, vec![leaf]).unwrap_err();
        assert!(matches!(err, TreeError::AlreadyAttached { .. }));
    }

    #[test]
    fn child_listed_twice_is_rejected() {
        let mut b = TreeBuilder::new();
        let leaf = b.leaf(CommonToken::new(1, "x"));
        let err = b.rule(0, vec![leaf, leaf]).unwrap_err();
        assert_eq!(err, TreeError::AlreadyAttached { id: leaf.index() });

        let rule = b.rule(0, vec![leaf]).unwrap();
        assert_eq!(b.build(rule).unwrap().root().child_count(), 1);
    }

    #[test]
    fn depth_is_capped() {
        let mut b = TreeBuilder::new();
        let mut top = b.leaf(CommonToken::new(1, "x"));
        for _ in 1..MAX_DEPTH {
            top = b.rule(0, vec![top]).unwrap();
        }
        let err = b.rule(0, vec![top]).unwrap_err();
        assert_eq!(err, TreeError::TooDeep { limit: MAX_DEPTH });
        assert!(b.build(top).is_ok());
    }

    #[test]
    fn root_must_be_detached() {
        let mut b = TreeBuilder::new();
        let leaf = b.leaf(CommonToken::new(1, "x"));
        b.rule(0, vec![leaf]).unwrap();
        let err = b.build(leaf).unwrap_err();
        assert!(matches!(err, TreeError::RootHasParent { .. }));
    }
}
