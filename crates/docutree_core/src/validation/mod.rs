//! Rule-based structural validation.
//!
//! # Responsibility
//! - Run a fixed, ordered battery of rules over the whole tree.
//! - Report severity-tagged issues, optionally with a patch that fixes them.
//!
//! # Invariants
//! - Validation never mutates the tree and never fails; it only reports.
//! - Suggested fixes use the same `{targetId, patch}` shape the store's
//!   `patch` consumes.
//! - Issue order is rule order, then pre-order within each rule.

pub mod rules;

use crate::config::CoreConfig;
use crate::model::node::{Node, NodeId};
use crate::model::patch::NodePatch;
use crate::tree::path::walk;
use log::info;
use rules::{NodeVisit, ValidationRule};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Issue severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Optimization,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Optimization => "optimization",
        }
    }
}

/// Patch proposed to resolve an issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedFix {
    pub target_id: NodeId,
    pub patch: NodePatch,
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Deterministic `<rule>:<nodeId>`.
    pub id: String,
    pub rule: String,
    pub node_id: NodeId,
    pub node_name: String,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<SuggestedFix>,
}

impl Issue {
    pub fn new(rule: &str, severity: Severity, node: &Node, message: impl Into<String>) -> Self {
        Self {
            id: format!("{rule}:{}", node.id),
            rule: rule.to_string(),
            node_id: node.id.clone(),
            node_name: node.name.clone(),
            severity,
            message: message.into(),
            suggested_fix: None,
        }
    }

    pub fn critical(rule: &str, node: &Node, message: impl Into<String>) -> Self {
        Self::new(rule, Severity::Critical, node, message)
    }

    pub fn warning(rule: &str, node: &Node, message: impl Into<String>) -> Self {
        Self::new(rule, Severity::Warning, node, message)
    }

    pub fn optimization(rule: &str, node: &Node, message: impl Into<String>) -> Self {
        Self::new(rule, Severity::Optimization, node, message)
    }

    /// Attaches a fix targeting this issue's node.
    pub fn with_fix(mut self, patch: NodePatch) -> Self {
        self.suggested_fix = Some(SuggestedFix {
            target_id: self.node_id.clone(),
            patch,
        });
        self
    }
}

/// Issues plus per-severity counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
    pub critical: usize,
    pub warning: usize,
    pub optimization: usize,
}

impl ValidationReport {
    fn from_issues(issues: Vec<Issue>) -> Self {
        let count = |severity| {
            issues
                .iter()
                .filter(|issue| issue.severity == severity)
                .count()
        };
        Self {
            critical: count(Severity::Critical),
            warning: count(Severity::Warning),
            optimization: count(Severity::Optimization),
            issues,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues reported for one node.
    pub fn for_node<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Issue> + 'a {
        self.issues
            .iter()
            .filter(move |issue| issue.node_id == node_id)
    }
}

/// Ordered set of rules.
pub struct RuleRegistry {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl RuleRegistry {
    /// Registry with every built-in rule in fixed order.
    pub fn new() -> Self {
        Self {
            rules: rules::builtin_rules(),
        }
    }

    /// Registry with no rules.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends a rule after the existing ones.
    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Box<dyn ValidationRule>] {
        &self.rules
    }

    /// Runs every rule over the tree under `root`.
    pub fn run(&self, root: &Arc<Node>, config: &CoreConfig) -> ValidationReport {
        let visits = walk(root)
            .map(|(node, depth)| NodeVisit {
                node: node.as_ref(),
                depth,
            })
            .collect::<Vec<_>>();

        let mut issues = Vec::new();
        for rule in &self.rules {
            for visit in &visits {
                issues.extend(rule.check_node(visit, config));
            }
        }

        let report = ValidationReport::from_issues(issues);
        info!(
            "event=validation_run module=validation status=ok nodes={} critical={} warning={} \
             optimization={}",
            visits.len(),
            report.critical,
            report.warning,
            report.optimization
        );
        report
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self.rules.iter().map(|rule| rule.name()).collect::<Vec<_>>();
        f.debug_struct("RuleRegistry").field("rules", &names).finish()
    }
}

/// Runs the built-in rules with default settings.
pub fn run_validation(root: &Arc<Node>) -> Vec<Issue> {
    validate(root, &CoreConfig::default()).issues
}

/// Runs the built-in rules with `config`.
pub fn validate(root: &Arc<Node>, config: &CoreConfig) -> ValidationReport {
    RuleRegistry::new().run(root, config)
}
