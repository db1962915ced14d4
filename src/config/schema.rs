use crate::grammar::Vocabulary;
use crate::pattern::{Delimiters, PatternError};
use crate::xpath::XPath;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScanConfig {
    #[serde(default)]
    pub meta: Metadata,
    #[serde(default)]
    pub delimiters: Option<DelimiterConfig>,
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

impl ScanConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.rules.is_empty() {
            issues.push(ValidationIssue::EmptyRuleList);
        }

        if let Some(delimiters) = &self.delimiters {
            if let Err(err) = delimiters.to_delimiters() {
                issues.push(ValidationIssue::InvalidDelimiters {
                    message: err.to_string(),
                });
            }
        }

        let mut seen = HashSet::new();
        for rule in &self.rules {
            if rule.id.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    rule_id: None,
                    field: "id",
                });
            } else if !seen.insert(rule.id.as_str()) {
                issues.push(ValidationIssue::DuplicateId {
                    rule_id: rule.id.clone(),
                });
            }
            if rule.pattern.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    rule_id: Some(rule.id.clone()),
                    field: "pattern",
                });
            }
            if rule.rule.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    rule_id: Some(rule.id.clone()),
                    field: "rule",
                });
            }
            if rule.path.as_deref().is_some_and(|p| p.trim().is_empty()) {
                issues.push(ValidationIssue::MissingField {
                    rule_id: Some(rule.id.clone()),
                    field: "path",
                });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Problems that only show up once rules meet a grammar: unknown start
    /// rules, paths that don't compile, and patterns that don't split.
    pub fn grammar_issues(&self, vocabulary: &dyn Vocabulary) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let delimiters = self.delimiters().unwrap_or_default();

        for rule in &self.rules {
            if vocabulary.rule_index(&rule.rule).is_none() {
                issues.push(ValidationIssue::UnknownStartRule {
                    rule_id: rule.id.clone(),
                    rule: rule.rule.clone(),
                });
                continue;
            }
            if let Err(err) = XPath::compile(&rule.path(), vocabulary) {
                issues.push(ValidationIssue::InvalidPath {
                    rule_id: rule.id.clone(),
                    message: err.to_string(),
                });
            }
            if let Err(err) = delimiters.split(&rule.pattern) {
                issues.push(ValidationIssue::InvalidPattern {
                    rule_id: rule.id.clone(),
                    message: err.to_string(),
                });
            }
        }
        issues
    }

    /// Configured delimiters, or the defaults when the table is absent.
    pub fn delimiters(&self) -> Result<Delimiters, PatternError> {
        match &self.delimiters {
            Some(config) => config.to_delimiters(),
            None => Ok(Delimiters::default()),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DelimiterConfig {
    #[serde(default = "default_start")]
    pub start: String,
    #[serde(default = "default_stop")]
    pub stop: String,
    #[serde(default = "default_escape")]
    pub escape: String,
}

impl DelimiterConfig {
    pub fn to_delimiters(&self) -> Result<Delimiters, PatternError> {
        Delimiters::new(&*self.start, &*self.stop, &*self.escape)
    }
}

fn default_start() -> String {
    "<".to_string()
}

fn default_stop() -> String {
    ">".to_string()
}

fn default_escape() -> String {
    "\\".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct RuleDefinition {
    pub id: String,
    pub pattern: String,
    /// Start rule the pattern is compiled as.
    pub rule: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl RuleDefinition {
    /// The path that selects candidate subtrees; `//<rule>` unless set.
    pub fn path(&self) -> String {
        match &self.path {
            Some(path) => path.clone(),
            None => format!("//{}", self.rule),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    EmptyRuleList,
    MissingField {
        rule_id: Option<String>,
        field: &'static str,
    },
    DuplicateId {
        rule_id: String,
    },
    InvalidDelimiters {
        message: String,
    },
    UnknownStartRule {
        rule_id: String,
        rule: String,
    },
    InvalidPath {
        rule_id: String,
        message: String,
    },
    InvalidPattern {
        rule_id: String,
        message: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyRuleList => write!(f, "rule config contains no rules"),
            ValidationIssue::MissingField { rule_id, field } => match rule_id {
                Some(id) => write!(f, "rule '{id}' missing required field '{field}'"),
                None => write!(f, "rule missing required field '{field}'"),
            },
            ValidationIssue::DuplicateId { rule_id } => {
                write!(f, "rule id '{rule_id}' is defined more than once")
            }
            ValidationIssue::InvalidDelimiters { message } => {
                write!(f, "invalid delimiters: {message}")
            }
            ValidationIssue::UnknownStartRule { rule_id, rule } => {
                write!(f, "rule '{rule_id}' names unknown start rule '{rule}'")
            }
            ValidationIssue::InvalidPath { rule_id, message } => {
                write!(f, "rule '{rule_id}' has an invalid path: {message}")
            }
            ValidationIssue::InvalidPattern { rule_id, message } => {
                write!(f, "rule '{rule_id}' has an invalid pattern: {message}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: &str, pattern: &str, rule: &str) -> RuleDefinition {
        RuleDefinition {
            id: id.to_string(),
            pattern: pattern.to_string(),
            rule: rule.to_string(),
            path: None,
            description: None,
        }
    }

    #[test]
    fn empty_config_is_invalid() {
        let err = ScanConfig::default().validate().unwrap_err();
        assert_eq!(err.issues, vec![ValidationIssue::EmptyRuleList]);
    }

    #[test]
    fn missing_fields_and_duplicates() {
        let config = ScanConfig {
            rules: vec![
                rule("a", "<ID> = <expr>;", "stat"),
                rule("a", "", "stat"),
                rule("", "<expr>", ""),
            ],
            ..ScanConfig::default()
        };
        let issues = config.validate().unwrap_err().issues;
        assert!(issues.contains(&ValidationIssue::DuplicateId {
            rule_id: "a".to_string()
        }));
        assert!(issues.contains(&ValidationIssue::MissingField {
            rule_id: Some("a".to_string()),
            field: "pattern"
        }));
        assert!(issues.contains(&ValidationIssue::MissingField {
            rule_id: None,
            field: "id"
        }));
        assert!(issues.contains(&ValidationIssue::MissingField {
            rule_id: Some(String::new()),
            field: "rule"
        }));
    }

    #[test]
    fn empty_delimiter_is_invalid() {
        let config = ScanConfig {
            delimiters: Some(DelimiterConfig {
                start: String::new(),
                stop: ">".to_string(),
                escape: "\\".to_string(),
            }),
            rules: vec![rule("a", "<expr>", "expr")],
            ..ScanConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid delimiters: start cannot be null or empty"
        );
    }

    #[test]
    fn default_path_follows_rule() {
        let mut definition = rule("a", "<expr>", "expr");
        assert_eq!(definition.path(), "//expr");
        definition.path = Some("/prog/func".to_string());
        assert_eq!(definition.path(), "/prog/func");
    }
}
