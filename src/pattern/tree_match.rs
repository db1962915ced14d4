use crate::pattern::compiled::ParseTreePattern;
use crate::tree::Node;
use indexmap::IndexMap;
use std::fmt;

/// Label to captured-nodes multimap, in first-capture order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMap<'t> {
    entries: IndexMap<String, Vec<Node<'t>>>,
}

impl<'t> LabelMap<'t> {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn map(&mut self, label: &str, node: Node<'t>) {
        self.entries.entry(label.to_string()).or_default().push(node);
    }

    pub fn get(&self, label: &str) -> Option<&[Node<'t>]> {
        self.entries.get(label).map(Vec::as_slice)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Node<'t>])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of matching one subject tree against a [`ParseTreePattern`].
///
/// Captures are recorded under the tag name (`ID`, `expr`) and, when present,
/// the tag's label. A failed match may still carry the captures made before
/// the first mismatch.
#[derive(Debug, Clone)]
pub struct ParseTreeMatch<'t> {
    tree: Node<'t>,
    pattern: ParseTreePattern,
    labels: LabelMap<'t>,
    mismatched_node: Option<Node<'t>>,
}

impl<'t> ParseTreeMatch<'t> {
    pub fn new(
        tree: Node<'t>,
        pattern: ParseTreePattern,
        labels: LabelMap<'t>,
        mismatched_node: Option<Node<'t>>,
    ) -> Self {
        Self {
            tree,
            pattern,
            labels,
            mismatched_node,
        }
    }

    /// The last node captured under `label`.
    pub fn get(&self, label: &str) -> Option<Node<'t>> {
        self.labels.get(label).and_then(|nodes| nodes.last().copied())
    }

    /// Every node captured under `label`, in capture order.
    pub fn get_all(&self, label: &str) -> Vec<Node<'t>> {
        self.labels
            .get(label)
            .map(<[Node<'t>]>::to_vec)
            .unwrap_or_default()
    }

    pub fn labels(&self) -> &LabelMap<'t> {
        &self.labels
    }

    pub fn mismatched_node(&self) -> Option<Node<'t>> {
        self.mismatched_node
    }

    pub fn succeeded(&self) -> bool {
        self.mismatched_node.is_none()
    }

    pub fn pattern(&self) -> &ParseTreePattern {
        &self.pattern
    }

    pub fn tree(&self) -> Node<'t> {
        self.tree
    }
}

impl fmt::Display for ParseTreeMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = if self.succeeded() { "succeeded" } else { "failed" };
        write!(
            f,
            "Match {outcome}; found {} labels",
            self.labels.len()
        )
    }
}
