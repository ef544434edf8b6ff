//! Ancestry-preserving substring filter.
//!
//! # Invariants
//! - An empty query returns the input node itself.
//! - A node survives when it matches or any descendant survives, so every
//!   surviving node keeps its full ancestor chain.
//! - Subtrees that survive untouched are returned by reference.

use crate::model::node::Node;
use std::sync::Arc;

/// Returns the pruned tree, or `None` when nothing under `node` matches.
///
/// Matching is a case-insensitive substring test against name, value and
/// tags.
pub fn filter(node: &Arc<Node>, query: &str) -> Option<Arc<Node>> {
    if query.is_empty() {
        return Some(Arc::clone(node));
    }
    let needle = query.to_lowercase();
    filter_node(node, needle.as_str())
}

/// Returns `true` when the node itself matches an already-lowercased needle.
pub fn is_self_match(node: &Node, needle: &str) -> bool {
    contains_folded(&node.name, needle)
        || node
            .value
            .as_deref()
            .is_some_and(|value| contains_folded(value, needle))
        || node.tags.iter().any(|tag| contains_folded(tag, needle))
}

/// Post-order pass with an explicit frame stack; each frame collects the
/// surviving children of one node.
fn filter_node(root: &Arc<Node>, needle: &str) -> Option<Arc<Node>> {
    let mut frames = vec![FilterFrame::new(root, needle)];
    while let Some(frame) = frames.last_mut() {
        let node = frame.node;
        if let Some(child) = node.children().get(frame.cursor) {
            frame.cursor += 1;
            frames.push(FilterFrame::new(child, needle));
            continue;
        }

        let kept = frames.pop().and_then(FilterFrame::finish);
        match frames.last_mut() {
            Some(parent) => parent.survivors.extend(kept),
            None => return kept,
        }
    }
    None
}

struct FilterFrame<'a> {
    node: &'a Arc<Node>,
    self_match: bool,
    cursor: usize,
    survivors: Vec<Arc<Node>>,
}

impl<'a> FilterFrame<'a> {
    fn new(node: &'a Arc<Node>, needle: &str) -> Self {
        Self {
            node,
            self_match: is_self_match(node, needle),
            cursor: 0,
            survivors: Vec::new(),
        }
    }

    fn finish(self) -> Option<Arc<Node>> {
        let node = self.node;
        if !node.has_children() {
            return self.self_match.then(|| Arc::clone(node));
        }
        if self.survivors.is_empty() && !self.self_match {
            return None;
        }

        let untouched = self.survivors.len() == node.children().len()
            && self
                .survivors
                .iter()
                .zip(node.children())
                .all(|(kept, original)| Arc::ptr_eq(kept, original));
        if untouched {
            return Some(Arc::clone(node));
        }

        let mut pruned = Node::clone(node);
        pruned.children = Some(self.survivors);
        Some(Arc::new(pruned))
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
