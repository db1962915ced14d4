use crate::config::schema::{RuleDefinition, ScanConfig};
use crate::grammar::{BypassParser, Tokenizer};
use crate::pattern::{ParseTreeMatch, ParseTreePatternMatcher, PatternError};
use crate::tree::{trees, Node, Token};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{info, warn};

/// Outcome of running one rule against one tree.
#[derive(Debug, Clone, Serialize)]
pub struct RuleReport {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub path: String,
    pub matches: Vec<MatchSummary>,
    /// Set when the rule could not run; `matches` is then empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RuleReport {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub line: u32,
    pub column: i32,
    pub text: String,
    pub labels: IndexMap<String, Vec<String>>,
}

impl MatchSummary {
    pub fn from_match(m: &ParseTreeMatch<'_>) -> Self {
        let first_token = trees::descendants(m.tree())
            .into_iter()
            .find_map(|node| node.symbol());
        let labels = m
            .labels()
            .iter()
            .map(|(label, nodes)| {
                (
                    label.to_string(),
                    nodes.iter().map(Node::text).collect(),
                )
            })
            .collect();

        Self {
            line: first_token.map_or(0, |t| t.line()),
            column: first_token.map_or(-1, |t| t.column()),
            text: m.tree().text(),
            labels,
        }
    }
}

/// Run every rule of `config` against `tree`.
///
/// The configured delimiters are installed on `matcher` first. A rule that
/// fails to compile or whose path is invalid yields a report carrying the
/// error; the remaining rules still run.
pub fn scan<L: Tokenizer, P: BypassParser>(
    config: &ScanConfig,
    matcher: &mut ParseTreePatternMatcher<L, P>,
    tree: Node<'_>,
) -> Result<Vec<RuleReport>, PatternError> {
    let delimiters = config.delimiters()?;
    let d = &delimiters;
    matcher.set_delimiters(d.start(), d.stop(), d.escape())?;

    Ok(config
        .rules
        .iter()
        .map(|rule| run_rule(rule, matcher, tree))
        .collect())
}

fn run_rule<L: Tokenizer, P: BypassParser>(
    rule: &RuleDefinition,
    matcher: &mut ParseTreePatternMatcher<L, P>,
    tree: Node<'_>,
) -> RuleReport {
    let path = rule.path();
    let mut report = RuleReport {
        id: rule.id.clone(),
        description: rule.description.clone(),
        path: path.clone(),
        matches: Vec::new(),
        error: None,
    };

    let vocabulary = matcher.parser().vocabulary();
    let Some(rule_index) = vocabulary.rule_index(&rule.rule) else {
        warn!(rule = %rule.id, start_rule = %rule.rule, "unknown start rule");
        report.error = Some(format!("unknown rule '{}'", rule.rule));
        return report;
    };

    match matcher.find_all(tree, &rule.pattern, rule_index, &path) {
        Ok(found) => {
            info!(rule = %rule.id, matches = found.len(), "rule scanned");
            report.matches = found.iter().map(MatchSummary::from_match).collect();
        }
        Err(err) => {
            warn!(rule = %rule.id, error = %err, "rule failed");
            report.error = Some(err.to_string());
        }
    }
    report
}
