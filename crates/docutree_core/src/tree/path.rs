//! Node lookup and ancestry resolution.
//!
//! # Responsibility
//! - Locate nodes by id in pre-order.
//! - Compute root-to-node ancestry chains.
//!
//! # Invariants
//! - Traversals use an explicit work stack; stack usage does not grow with
//!   tree depth.
//! - With colliding ids, the first match in pre-order wins.

use crate::model::node::Node;
use std::ops::ControlFlow;
use std::sync::Arc;

/// Position of a node as child indexes from the root. Empty for the root.
pub type IndexPath = Vec<usize>;

/// Pre-order iterator yielding `(node, depth)`, root at depth 1.
pub struct PreOrder<'a> {
    stack: Vec<(&'a Arc<Node>, usize)>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (&'a Arc<Node>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        self.stack
            .extend(node.children().iter().rev().map(|child| (child, depth + 1)));
        Some((node, depth))
    }
}

/// Walks the whole tree in pre-order.
pub fn walk(root: &Arc<Node>) -> PreOrder<'_> {
    PreOrder {
        stack: vec![(root, 1)],
    }
}

/// Returns the first node with `id` in pre-order.
pub fn find_by_id<'a>(root: &'a Arc<Node>, id: &str) -> Option<&'a Arc<Node>> {
    walk(root).map(|(node, _)| node).find(|node| node.id == id)
}

/// Returns the ancestry chain from `root` through the target, inclusive.
pub fn find_path<'a>(root: &'a Arc<Node>, id: &str) -> Option<Vec<&'a Arc<Node>>> {
    let path = locate(root, id)?;
    Some(resolve_chain(root, &path))
}

/// Returns the index path of the first node with `id`.
pub fn locate(root: &Arc<Node>, id: &str) -> Option<IndexPath> {
    let mut found = None;
    visit_with_path(root, |node, path| {
        if node.id == id {
            found = Some(path.to_vec());
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    found
}

/// Resolves an index path into the node chain it addresses.
///
/// Stops early if the path leaves the tree.
pub fn resolve_chain<'a>(root: &'a Arc<Node>, path: &[usize]) -> Vec<&'a Arc<Node>> {
    let mut chain = Vec::with_capacity(path.len() + 1);
    chain.push(root);
    let mut current = root;
    for &index in path {
        let Some(child) = current.children().get(index) else {
            break;
        };
        chain.push(child);
        current = child;
    }
    chain
}

/// Pre-order visit that exposes each node's index path.
pub(crate) fn visit_with_path<'a, F>(root: &'a Arc<Node>, mut visit: F)
where
    F: FnMut(&'a Arc<Node>, &[usize]) -> ControlFlow<()>,
{
    let mut path: IndexPath = Vec::new();
    if visit(root, &path).is_break() {
        return;
    }

    let mut frames: Vec<(&'a Arc<Node>, usize)> = vec![(root, 0)];
    while let Some(frame) = frames.last_mut() {
        let (node, cursor) = (frame.0, frame.1);
        frame.1 += 1;

        let Some(child) = node.children().get(cursor) else {
            frames.pop();
            path.pop();
            continue;
        };

        path.push(cursor);
        if visit(child, &path).is_break() {
            return;
        }
        frames.push((child, 0));
    }
}
