//! Id index and uniqueness checks.
//!
//! # Responsibility
//! - Collect every id of a document in one pre-order pass.
//! - Surface id collisions instead of silently accepting them.

use crate::model::node::{Node, NodeId};
use crate::tree::path::walk;
use log::warn;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Ids that occur more than once in one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateIdError {
    /// Colliding ids in first-seen order.
    pub ids: Vec<NodeId>,
}

impl Display for DuplicateIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "duplicate node ids: {}", self.ids.join(", "))
    }
}

impl Error for DuplicateIdError {}

/// Companion id set, built once per root.
#[derive(Debug, Clone, Default)]
pub struct IdIndex {
    ids: HashSet<NodeId>,
    duplicates: Vec<NodeId>,
}

impl IdIndex {
    /// Indexes every node under `root`, recording repeated ids once each.
    pub fn build(root: &Arc<Node>) -> Self {
        let mut index = Self::default();
        for (node, _) in walk(root) {
            if !index.ids.insert(node.id.clone()) && !index.duplicates.contains(&node.id) {
                index.duplicates.push(node.id.clone());
            }
        }
        index
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of distinct ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn duplicates(&self) -> &[NodeId] {
        &self.duplicates
    }
}

/// Fails when any id occurs more than once under `root`.
pub fn ensure_unique_ids(root: &Arc<Node>) -> Result<(), DuplicateIdError> {
    let index = IdIndex::build(root);
    if index.duplicates.is_empty() {
        return Ok(());
    }
    warn!(
        "event=id_collision module=tree status=error count={}",
        index.duplicates.len()
    );
    Err(DuplicateIdError {
        ids: index.duplicates,
    })
}
