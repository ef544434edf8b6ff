mod content;
mod naming;
mod structure;

pub use content::{BlankAnswerRule, BlankValueRule, MissingPriceRule};
pub use naming::NodeNameRule;
pub use structure::{DuplicateSiblingNameRule, FieldWithChildrenRule, NestingDepthRule};

use crate::config::CoreConfig;
use crate::model::node::Node;
use crate::validation::Issue;

/// One node as seen by a rule. `depth` counts the root as 1.
#[derive(Debug, Clone, Copy)]
pub struct NodeVisit<'a> {
    pub node: &'a Node,
    pub depth: usize,
}

/// A single validation rule.
pub trait ValidationRule {
    /// Stable identifier, used as the issue id prefix.
    fn name(&self) -> &'static str;

    /// Human-readable description.
    fn description(&self) -> &'static str;

    /// Checks one node. Rules that compare siblings inspect the node's
    /// children.
    fn check_node(&self, visit: &NodeVisit<'_>, config: &CoreConfig) -> Vec<Issue>;
}

/// Built-in rules in their fixed run order.
pub(crate) fn builtin_rules() -> Vec<Box<dyn ValidationRule>> {
    vec![
        Box::new(NodeNameRule),
        Box::new(BlankValueRule),
        Box::new(MissingPriceRule),
        Box::new(BlankAnswerRule),
        Box::new(NestingDepthRule),
        Box::new(FieldWithChildrenRule),
        Box::new(DuplicateSiblingNameRule),
    ]
}
