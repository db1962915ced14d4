use crate::grammar::Vocabulary;
use crate::tree::Node;
use crate::xpath::element::{Context, ElementKind, XPathElement};
use crate::xpath::errors::XPathError;
use crate::xpath::lexer::{self, PathToken, PathTokenKind};
use indexmap::IndexSet;
use std::fmt;
use tracing::{debug, trace};

/// A compiled path such as `//func/body//ID` or `/prog/func/!'def'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XPath {
    path: String,
    elements: Vec<XPathElement>,
}

impl XPath {
    pub const WILDCARD: &'static str = "*";
    pub const NOT: &'static str = "!";

    pub fn compile(path: &str, vocabulary: &dyn Vocabulary) -> Result<Self, XPathError> {
        let tokens = lexer::tokenize(path)?;
        if tokens.is_empty() {
            return Err(XPathError::MissingElement);
        }

        let mut elements = Vec::new();
        let mut i = 0;
        while let Some(token) = tokens.get(i) {
            let anywhere = token.kind == PathTokenKind::Anywhere;
            let mut word_at = if token.kind.is_separator() { i + 1 } else { i };
            let invert = tokens
                .get(word_at)
                .is_some_and(|t| t.kind == PathTokenKind::Bang);
            if invert {
                word_at += 1;
            }

            let word = tokens.get(word_at);
            if token.kind == PathTokenKind::Bang && !word.is_some_and(|w| w.kind.is_word()) {
                return Err(XPathError::UnknownElement {
                    element: token.text.clone(),
                });
            }

            elements.push(element(word, anywhere, vocabulary)?.inverted(invert));
            i = word_at + 1;
        }

        debug!(path, elements = elements.len(), "compiled path");
        Ok(Self {
            path: path.to_string(),
            elements,
        })
    }

    /// Compile `path` and evaluate it against `tree` in one step.
    pub fn find_all<'t>(
        tree: Node<'t>,
        path: &str,
        vocabulary: &dyn Vocabulary,
    ) -> Result<IndexSet<Node<'t>>, XPathError> {
        Ok(Self::compile(path, vocabulary)?.evaluate(tree))
    }

    /// Every node the path selects, in first-reached order without
    /// duplicates.
    pub fn evaluate<'t>(&self, tree: Node<'t>) -> IndexSet<Node<'t>> {
        let mut frontier = vec![Context::AboveRoot(tree)];
        let mut selected = IndexSet::new();

        for element in &self.elements {
            selected = IndexSet::new();
            for context in frontier.iter().copied().filter(|c| c.has_children()) {
                selected.extend(element.evaluate_in(context));
            }
            trace!(step = %element, selected = selected.len(), "evaluated path step");
            frontier = selected.iter().copied().map(Context::Node).collect();
        }

        selected
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn elements(&self) -> &[XPathElement] {
        &self.elements
    }
}

impl fmt::Display for XPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Resolve the word after a separator (or a bare leading word).
fn element(
    word: Option<&PathToken>,
    anywhere: bool,
    vocabulary: &dyn Vocabulary,
) -> Result<XPathElement, XPathError> {
    let word = word.ok_or(XPathError::MissingElement)?;
    let name = word.text.as_str();

    let kind = match word.kind {
        PathTokenKind::Wildcard if anywhere => ElementKind::WildcardAnywhere,
        PathTokenKind::Wildcard => ElementKind::Wildcard,
        PathTokenKind::TokenRef | PathTokenKind::Literal => {
            let token_type = vocabulary
                .token_type(name)
                .ok_or_else(|| XPathError::InvalidTokenName {
                    name: name.to_string(),
                    index: word.index,
                })?;
            if anywhere {
                ElementKind::TokenAnywhere(token_type)
            } else {
                ElementKind::Token(token_type)
            }
        }
        _ => {
            let rule_index = vocabulary
                .rule_index(name)
                .ok_or_else(|| XPathError::InvalidRuleName {
                    name: name.to_string(),
                    index: word.index,
                })?;
            if anywhere {
                ElementKind::RuleAnywhere(rule_index)
            } else {
                ElementKind::Rule(rule_index)
            }
        }
    };

    Ok(XPathElement::new(name, kind))
}
