use super::{NodeVisit, ValidationRule};
use crate::config::CoreConfig;
use crate::validation::Issue;
use once_cell::sync::Lazy;
use regex::Regex;

static TRAILING_COUNTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\(?\d+\)?$").expect("valid counter regex"));

/// Blank names are critical; default-looking names are warnings.
pub struct NodeNameRule;

impl ValidationRule for NodeNameRule {
    fn name(&self) -> &'static str {
        "node-name"
    }

    fn description(&self) -> &'static str {
        "Every node needs a meaningful name"
    }

    fn check_node(&self, visit: &NodeVisit<'_>, config: &CoreConfig) -> Vec<Issue> {
        let name = visit.node.name.trim();
        if name.is_empty() {
            return vec![Issue::critical(
                self.name(),
                visit.node,
                "Node has no name",
            )];
        }

        let base = TRAILING_COUNTER_RE.replace(name, "");
        if config.is_placeholder_name(&base) {
            return vec![Issue::warning(
                self.name(),
                visit.node,
                format!("Name \"{name}\" looks like a default placeholder"),
            )];
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::{Node, NodeKind};
    use crate::validation::Severity;

    fn check(name: &str) -> Vec<Issue> {
        let node = Node::with_id("n", NodeKind::Category, name);
        NodeNameRule.check_node(&NodeVisit { node: &node, depth: 2 }, &CoreConfig::default())
    }

    #[test]
    fn blank_name_is_critical() {
        let issues = check("   ");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
    }

    #[test]
    fn placeholder_names_with_counters_warn() {
        for name in ["Untitled", "new item", "New Item 2", "Untitled (3)"] {
            let issues = check(name);
            assert_eq!(issues.len(), 1, "{name}");
            assert_eq!(issues[0].severity, Severity::Warning);
        }
    }

    #[test]
    fn real_names_pass() {
        assert!(check("Dining").is_empty());
        assert!(check("Room 101").is_empty());
    }
}
