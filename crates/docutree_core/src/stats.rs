//! Document completion and health counters.
//!
//! # Invariants
//! - One pre-order pass; the root counts as depth 1.
//! - `completion_rate` is 100 when the document has no fillable nodes.

use crate::model::node::Node;
use crate::tree::path::walk;
use serde::Serialize;
use std::sync::Arc;

/// Aggregate counters for one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeStats {
    pub total_nodes: usize,
    pub container_count: usize,
    pub fillable_count: usize,
    pub empty_count: usize,
    pub max_depth: usize,
    /// Rounded percentage of fillable nodes that carry content.
    pub completion_rate: u8,
}

/// Computes stats for the tree under `root`.
pub fn analyze_stats(root: &Arc<Node>) -> TreeStats {
    let mut stats = TreeStats {
        total_nodes: 0,
        container_count: 0,
        fillable_count: 0,
        empty_count: 0,
        max_depth: 0,
        completion_rate: 100,
    };

    for (node, depth) in walk(root) {
        stats.total_nodes += 1;
        stats.max_depth = stats.max_depth.max(depth);
        if node.kind.is_container() {
            stats.container_count += 1;
            continue;
        }
        stats.fillable_count += 1;
        if node.is_empty_content() {
            stats.empty_count += 1;
        }
    }

    stats.completion_rate = completion_rate(stats.fillable_count, stats.empty_count);
    stats
}

fn completion_rate(fillable: usize, empty: usize) -> u8 {
    if fillable == 0 {
        return 100;
    }
    let filled = fillable.saturating_sub(empty) as f64;
    (filled / fillable as f64 * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::NodeKind;

    #[test]
    fn containers_only_yield_full_completion() {
        let root = Arc::new(
            Node::new(NodeKind::Root, "Hotel")
                .with_children([Node::new(NodeKind::Category, "Dining")]),
        );
        let stats = analyze_stats(&root);
        assert_eq!(stats.total_nodes, 2);
        assert_eq!(stats.container_count, 2);
        assert_eq!(stats.fillable_count, 0);
        assert_eq!(stats.completion_rate, 100);
        assert_eq!(stats.max_depth, 2);
    }

    #[test]
    fn counts_kind_specific_emptiness() {
        let root = Arc::new(Node::new(NodeKind::Root, "Hotel").with_children([
            Node::new(NodeKind::Menu, "Bar").with_children([
                Node::new(NodeKind::MenuItem, "Negroni").with_price(14.0),
                Node::new(NodeKind::MenuItem, "Spritz"),
            ]),
            Node::new(NodeKind::QaPair, "Pets allowed?").with_answer("Yes"),
        ]));
        let stats = analyze_stats(&root);
        assert_eq!(stats.fillable_count, 3);
        assert_eq!(stats.empty_count, 1);
        assert_eq!(stats.max_depth, 3);
        assert_eq!(stats.completion_rate, 67);
    }

    #[test]
    fn rate_rounds_half_up() {
        assert_eq!(completion_rate(8, 1), 88);
        assert_eq!(completion_rate(2, 1), 50);
        assert_eq!(completion_rate(3, 3), 0);
    }
}
