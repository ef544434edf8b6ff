//! Persistent tree mutations with structural sharing.
//!
//! # Responsibility
//! - Provide the single mutation surface: insert child, patch, delete.
//! - Report the outcome explicitly instead of relying on identity checks.
//!
//! # Invariants
//! - Only nodes on the root-to-target path get new identity; every other
//!   subtree in the result is the same `Arc` as in the input.
//! - Any outcome other than `Applied` returns the input root `Arc` itself.
//! - The root node can never be deleted through `delete`.

use crate::model::node::{Node, NodeId};
use crate::model::patch::{EditAction, NodePatch};
use crate::tree::index::IdIndex;
use crate::tree::path::{locate, resolve_chain, walk};
use std::collections::HashSet;
use std::sync::Arc;

/// Why a mutation was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefusalReason {
    /// The target is the document root.
    RootDeletion,
    /// The inserted subtree carries an id already present in the document.
    DuplicateId(NodeId),
}

/// Outcome of one mutation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationStatus {
    Applied,
    NotFound,
    Refused(RefusalReason),
}

/// Resulting root plus outcome.
#[derive(Debug, Clone)]
pub struct Mutation {
    /// New root when applied, otherwise the input root itself.
    pub root: Arc<Node>,
    pub status: MutationStatus,
}

impl Mutation {
    fn applied(root: Arc<Node>) -> Self {
        Self {
            root,
            status: MutationStatus::Applied,
        }
    }

    fn unchanged(root: &Arc<Node>, status: MutationStatus) -> Self {
        Self {
            root: Arc::clone(root),
            status,
        }
    }

    pub fn is_applied(&self) -> bool {
        self.status == MutationStatus::Applied
    }

    pub fn into_root(self) -> Arc<Node> {
        self.root
    }
}

/// Merges `fields` into the node with `id`.
pub fn patch(root: &Arc<Node>, id: &str, fields: &NodePatch) -> Mutation {
    let Some(path) = locate(root, id) else {
        return Mutation::unchanged(root, MutationStatus::NotFound);
    };
    Mutation::applied(rebuild(root, &path, |node| fields.apply_to(node)))
}

/// Appends `child` to the children of `parent_id`.
///
/// Does not check id uniqueness; see [`insert_child_unique`].
pub fn insert_child(root: &Arc<Node>, parent_id: &str, child: impl Into<Arc<Node>>) -> Mutation {
    let Some(path) = locate(root, parent_id) else {
        return Mutation::unchanged(root, MutationStatus::NotFound);
    };
    let child = child.into();
    Mutation::applied(rebuild(root, &path, move |parent| {
        parent.children.get_or_insert_with(Vec::new).push(child);
    }))
}

/// Like [`insert_child`], but refuses subtrees whose ids collide with the
/// document or with each other.
pub fn insert_child_unique(
    root: &Arc<Node>,
    parent_id: &str,
    child: impl Into<Arc<Node>>,
) -> Mutation {
    let child = child.into();
    if let Some(id) = first_colliding_id(root, &child) {
        return Mutation::unchanged(
            root,
            MutationStatus::Refused(RefusalReason::DuplicateId(id)),
        );
    }
    insert_child(root, parent_id, child)
}

fn first_colliding_id(root: &Arc<Node>, incoming: &Arc<Node>) -> Option<NodeId> {
    let index = IdIndex::build(root);
    let mut seen = HashSet::new();
    walk(incoming)
        .map(|(node, _)| node.id.as_str())
        .find(|id| index.contains(id) || !seen.insert(*id))
        .map(str::to_string)
}

/// Removes the node with `target_id` from its parent.
pub fn delete(root: &Arc<Node>, target_id: &str) -> Mutation {
    if root.id == target_id {
        return Mutation::unchanged(root, MutationStatus::Refused(RefusalReason::RootDeletion));
    }
    let Some(mut path) = locate(root, target_id) else {
        return Mutation::unchanged(root, MutationStatus::NotFound);
    };
    let Some(position) = path.pop() else {
        return Mutation::unchanged(root, MutationStatus::Refused(RefusalReason::RootDeletion));
    };
    Mutation::applied(rebuild(root, &path, |parent| {
        if let Some(children) = parent.children.as_mut() {
            children.remove(position);
        }
    }))
}

/// Routes one edit action through the matching store operation.
pub fn apply_action(root: &Arc<Node>, action: &EditAction) -> Mutation {
    match action {
        EditAction::Add { target_id, data } => insert_child(root, target_id, data.clone()),
        EditAction::Update { target_id, data } => patch(root, target_id, data),
        EditAction::Delete { target_id } => delete(root, target_id),
    }
}

/// Applies actions in order, threading each resulting root into the next.
pub fn apply_actions(root: &Arc<Node>, actions: &[EditAction]) -> (Arc<Node>, Vec<MutationStatus>) {
    let mut current = Arc::clone(root);
    let mut statuses = Vec::with_capacity(actions.len());
    for action in actions {
        let mutation = apply_action(&current, action);
        statuses.push(mutation.status);
        current = mutation.root;
    }
    (current, statuses)
}

/// Copies the nodes along `path` and applies `edit` to the last one.
///
/// Each copy is shallow: its children vector holds the same `Arc`s except
/// for the one slot replaced on the way back up.
fn rebuild<F>(root: &Arc<Node>, path: &[usize], edit: F) -> Arc<Node>
where
    F: FnOnce(&mut Node),
{
    let chain = resolve_chain(root, path);
    let Some(target) = chain.last() else {
        return Arc::clone(root);
    };

    let mut updated = Node::clone(target);
    edit(&mut updated);
    let mut current = Arc::new(updated);

    for (depth, &index) in path.iter().enumerate().rev() {
        let mut parent = Node::clone(chain[depth]);
        if let Some(slot) = parent
            .children
            .as_mut()
            .and_then(|children| children.get_mut(index))
        {
            *slot = current;
        }
        current = Arc::new(parent);
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::NodeKind;
    use crate::tree::path::find_by_id;

    fn sample() -> Arc<Node> {
        Arc::new(
            Node::with_id("root", NodeKind::Root, "Hotel").with_children([
                Node::with_id("dining", NodeKind::Category, "Dining")
                    .with_children([Node::with_id("steak", NodeKind::Item, "Steakhouse")]),
                Node::with_id("spa", NodeKind::Item, "Spa"),
            ]),
        )
    }

    #[test]
    fn patch_copies_only_the_target_path() {
        let root = sample();
        let result = patch(&root, "steak", &NodePatch::value("Open 6pm"));

        assert!(result.is_applied());
        assert!(!Arc::ptr_eq(&result.root, &root));
        assert!(!Arc::ptr_eq(&result.root.children()[0], &root.children()[0]));
        assert!(Arc::ptr_eq(&result.root.children()[1], &root.children()[1]));
        let steak = find_by_id(&result.root, "steak").unwrap();
        assert_eq!(steak.value.as_deref(), Some("Open 6pm"));
        assert!(find_by_id(&root, "steak").unwrap().value.is_none());
    }

    #[test]
    fn patch_on_root_replaces_only_root() {
        let root = sample();
        let result = patch(&root, "root", &NodePatch::name("Resort"));
        assert_eq!(result.root.name, "Resort");
        assert!(Arc::ptr_eq(&result.root.children()[0], &root.children()[0]));
        assert!(Arc::ptr_eq(&result.root.children()[1], &root.children()[1]));
    }

    #[test]
    fn insert_creates_children_for_leaf_parent() {
        let root = sample();
        let result = insert_child(&root, "spa", Node::with_id("sauna", NodeKind::Item, "Sauna"));
        let spa = find_by_id(&result.root, "spa").unwrap();
        assert_eq!(spa.children().len(), 1);
        assert!(Arc::ptr_eq(&result.root.children()[0], &root.children()[0]));
    }

    #[test]
    fn delete_removes_from_parent() {
        let root = sample();
        let result = delete(&root, "steak");
        assert!(result.is_applied());
        assert!(find_by_id(&result.root, "steak").is_none());
        assert!(Arc::ptr_eq(&result.root.children()[1], &root.children()[1]));
    }

    #[test]
    fn insert_unique_refuses_colliding_ids() {
        let root = sample();
        let result = insert_child_unique(
            &root,
            "dining",
            Node::with_id("spa", NodeKind::Item, "Spa 2"),
        );
        assert_eq!(
            result.status,
            MutationStatus::Refused(RefusalReason::DuplicateId("spa".to_string()))
        );
        assert!(Arc::ptr_eq(&result.root, &root));
    }
}
