use super::{NodeVisit, ValidationRule};
use crate::config::CoreConfig;
use crate::model::node::NodeKind;
use crate::model::patch::NodePatch;
use crate::validation::Issue;
use std::collections::HashMap;

/// Flags nodes nested deeper than `CoreConfig::max_depth`.
pub struct NestingDepthRule;

impl ValidationRule for NestingDepthRule {
    fn name(&self) -> &'static str {
        "max-depth"
    }

    fn description(&self) -> &'static str {
        "Deep nesting makes content hard to navigate"
    }

    fn check_node(&self, visit: &NodeVisit<'_>, config: &CoreConfig) -> Vec<Issue> {
        if visit.depth <= config.max_depth {
            return Vec::new();
        }
        vec![Issue::optimization(
            self.name(),
            visit.node,
            format!(
                "Nested {} levels deep (limit {}); consider flattening",
                visit.depth, config.max_depth
            ),
        )]
    }
}

/// Field nodes are leaves; one with children is probably a container.
pub struct FieldWithChildrenRule;

impl ValidationRule for FieldWithChildrenRule {
    fn name(&self) -> &'static str {
        "field-with-children"
    }

    fn description(&self) -> &'static str {
        "Field nodes should not contain children"
    }

    fn check_node(&self, visit: &NodeVisit<'_>, _config: &CoreConfig) -> Vec<Issue> {
        let node = visit.node;
        if node.kind != NodeKind::Field || !node.has_children() {
            return Vec::new();
        }
        vec![Issue::warning(
            self.name(),
            node,
            format!(
                "Field \"{}\" has children; should this be a container kind?",
                node.name
            ),
        )
        .with_fix(NodePatch::kind(NodeKind::Category))]
    }
}

/// Siblings whose trimmed, case-folded names collide.
///
/// Runs on the parent and reports every member of each collision group.
/// Blank names are left to the naming rule.
pub struct DuplicateSiblingNameRule;

impl ValidationRule for DuplicateSiblingNameRule {
    fn name(&self) -> &'static str {
        "duplicate-name"
    }

    fn description(&self) -> &'static str {
        "Sibling nodes must have distinct names"
    }

    fn check_node(&self, visit: &NodeVisit<'_>, _config: &CoreConfig) -> Vec<Issue> {
        let children = visit.node.children();
        if children.len() < 2 {
            return Vec::new();
        }

        let keys = children
            .iter()
            .map(|child| child.name.trim().to_lowercase())
            .collect::<Vec<_>>();
        let mut group_sizes: HashMap<&str, usize> = HashMap::new();
        for key in keys.iter().filter(|key| !key.is_empty()) {
            *group_sizes.entry(key.as_str()).or_default() += 1;
        }

        children
            .iter()
            .zip(&keys)
            .filter(|(_, key)| group_sizes.get(key.as_str()).copied().unwrap_or(0) > 1)
            .map(|(child, key)| {
                let size = group_sizes.get(key.as_str()).copied().unwrap_or(0);
                Issue::critical(
                    self.name(),
                    child,
                    format!(
                        "\"{}\" shares its name with {} sibling(s) under \"{}\"",
                        child.name,
                        size - 1,
                        visit.node.name
                    ),
                )
            })
            .collect()
    }
}
