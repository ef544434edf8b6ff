use super::{NodeVisit, ValidationRule};
use crate::config::CoreConfig;
use crate::model::node::{is_blank, NodeKind};
use crate::model::patch::NodePatch;
use crate::validation::Issue;

/// Item and field nodes need a value.
pub struct BlankValueRule;

impl ValidationRule for BlankValueRule {
    fn name(&self) -> &'static str {
        "blank-value"
    }

    fn description(&self) -> &'static str {
        "Item and field nodes should carry a value"
    }

    fn check_node(&self, visit: &NodeVisit<'_>, config: &CoreConfig) -> Vec<Issue> {
        let node = visit.node;
        if !matches!(node.kind, NodeKind::Item | NodeKind::Field) || !is_blank(&node.value) {
            return Vec::new();
        }
        vec![
            Issue::warning(self.name(), node, format!("\"{}\" has no value", node.name))
                .with_fix(NodePatch::value(config.placeholder_value.clone())),
        ]
    }
}

/// Menu items need a price.
pub struct MissingPriceRule;

impl ValidationRule for MissingPriceRule {
    fn name(&self) -> &'static str {
        "missing-price"
    }

    fn description(&self) -> &'static str {
        "Menu items should have a price"
    }

    fn check_node(&self, visit: &NodeVisit<'_>, _config: &CoreConfig) -> Vec<Issue> {
        let node = visit.node;
        if node.kind != NodeKind::MenuItem || node.price.is_some() {
            return Vec::new();
        }
        vec![Issue::warning(
            self.name(),
            node,
            format!("Menu item \"{}\" has no price", node.name),
        )]
    }
}

/// Q&A pairs without an answer are useless to consumers.
pub struct BlankAnswerRule;

impl ValidationRule for BlankAnswerRule {
    fn name(&self) -> &'static str {
        "blank-answer"
    }

    fn description(&self) -> &'static str {
        "Q&A pairs must have an answer"
    }

    fn check_node(&self, visit: &NodeVisit<'_>, _config: &CoreConfig) -> Vec<Issue> {
        let node = visit.node;
        if node.kind != NodeKind::QaPair || !is_blank(&node.answer) {
            return Vec::new();
        }
        vec![Issue::critical(
            self.name(),
            node,
            format!("Question \"{}\" has no answer", node.name),
        )]
    }
}
