//! Single-owner document use-case service.
//!
//! # Responsibility
//! - Hold the current root and replace it with each mutation result.
//! - Turn store outcomes into typed errors for callers.
//! - Enforce invariants the raw store leaves to callers: root kind, id
//!   uniqueness, non-empty patches.
//!
//! # Invariants
//! - The held root is always a `NodeKind::Root` node with unique ids.
//! - A failed call leaves the held root untouched.
//! - Editor edits, edit actions and validation fixes all go through the
//!   same store operations.

use crate::config::CoreConfig;
use crate::model::node::{Node, NodeId, NodeKind};
use crate::model::patch::{EditAction, NodePatch};
use crate::stats::{analyze_stats, TreeStats};
use crate::tree::index::{ensure_unique_ids, DuplicateIdError};
use crate::tree::store::{self, Mutation, MutationStatus, RefusalReason};
use crate::validation::{validate, SuggestedFix, ValidationReport};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Errors from document service operations.
#[derive(Debug)]
pub enum DocumentServiceError {
    /// The document root is not `NodeKind::Root`.
    InvalidRoot(NodeKind),
    /// Target node does not exist.
    NodeNotFound(NodeId),
    /// Parent node for an insert does not exist.
    ParentNotFound(NodeId),
    /// The root can not be deleted.
    RootDeletionRefused,
    /// The operation would introduce a duplicate id.
    DuplicateId(NodeId),
    /// Patch carries no fields.
    EmptyPatch,
    /// The initial document already contains duplicate ids.
    DuplicateIds(DuplicateIdError),
}

impl Display for DocumentServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRoot(kind) => write!(f, "document root must be of kind root, got {kind}"),
            Self::NodeNotFound(id) => write!(f, "node not found: {id}"),
            Self::ParentNotFound(id) => write!(f, "parent node not found: {id}"),
            Self::RootDeletionRefused => write!(f, "the document root can not be deleted"),
            Self::DuplicateId(id) => write!(f, "node id already exists: {id}"),
            Self::EmptyPatch => write!(f, "patch must set at least one field"),
            Self::DuplicateIds(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DocumentServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DuplicateIds(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DuplicateIdError> for DocumentServiceError {
    fn from(value: DuplicateIdError) -> Self {
        Self::DuplicateIds(value)
    }
}

/// Document facade owning the current root.
#[derive(Debug, Clone)]
pub struct DocumentService {
    root: Arc<Node>,
    config: CoreConfig,
}

impl DocumentService {
    /// Takes ownership of a document after checking root kind and ids.
    pub fn new(root: impl Into<Arc<Node>>) -> Result<Self, DocumentServiceError> {
        Self::with_config(root, CoreConfig::default())
    }

    pub fn with_config(
        root: impl Into<Arc<Node>>,
        config: CoreConfig,
    ) -> Result<Self, DocumentServiceError> {
        let root = root.into();
        if root.kind != NodeKind::Root {
            return Err(DocumentServiceError::InvalidRoot(root.kind.clone()));
        }
        ensure_unique_ids(&root)?;
        Ok(Self { root, config })
    }

    /// Current root. Earlier roots stay valid snapshots.
    pub fn root(&self) -> &Arc<Node> {
        &self.root
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Appends `child` under `parent_id` and returns the new node's id.
    pub fn insert_child(
        &mut self,
        parent_id: &str,
        child: Node,
    ) -> Result<NodeId, DocumentServiceError> {
        let child_id = child.id.clone();
        let mutation = store::insert_child_unique(&self.root, parent_id, child);
        self.commit("insert_child", parent_id, mutation, |id| {
            DocumentServiceError::ParentNotFound(id)
        })?;
        Ok(child_id)
    }

    /// Merges `fields` into node `id`.
    pub fn patch(&mut self, id: &str, fields: &NodePatch) -> Result<(), DocumentServiceError> {
        if fields.is_empty() {
            return Err(DocumentServiceError::EmptyPatch);
        }
        let mutation = store::patch(&self.root, id, fields);
        self.commit("patch", id, mutation, DocumentServiceError::NodeNotFound)
    }

    /// Removes node `id` and its subtree.
    pub fn delete(&mut self, id: &str) -> Result<(), DocumentServiceError> {
        let mutation = store::delete(&self.root, id);
        self.commit("delete", id, mutation, DocumentServiceError::NodeNotFound)
    }

    /// Routes an edit action through the matching operation.
    pub fn apply_action(&mut self, action: &EditAction) -> Result<(), DocumentServiceError> {
        match action {
            EditAction::Add { target_id, data } => {
                self.insert_child(target_id, data.clone()).map(|_| ())
            }
            EditAction::Update { target_id, data } => self.patch(target_id, data),
            EditAction::Delete { target_id } => self.delete(target_id),
        }
    }

    /// Applies a validation fix.
    pub fn apply_fix(&mut self, fix: &SuggestedFix) -> Result<(), DocumentServiceError> {
        self.patch(&fix.target_id, &fix.patch)
    }

    pub fn stats(&self) -> TreeStats {
        analyze_stats(&self.root)
    }

    pub fn validate(&self) -> ValidationReport {
        validate(&self.root, &self.config)
    }

    fn commit<F>(
        &mut self,
        action: &str,
        target_id: &str,
        mutation: Mutation,
        not_found: F,
    ) -> Result<(), DocumentServiceError>
    where
        F: FnOnce(NodeId) -> DocumentServiceError,
    {
        match mutation.status {
            MutationStatus::Applied => {
                debug!(
                    "event=document_mutation module=service status=ok action={} node_id={}",
                    action, target_id
                );
                self.root = mutation.root;
                Ok(())
            }
            MutationStatus::NotFound => {
                warn!(
                    "event=document_mutation module=service status=not_found action={} node_id={}",
                    action, target_id
                );
                Err(not_found(target_id.to_string()))
            }
            MutationStatus::Refused(reason) => {
                warn!(
                    "event=document_mutation module=service status=refused action={} node_id={}",
                    action, target_id
                );
                Err(match reason {
                    RefusalReason::RootDeletion => DocumentServiceError::RootDeletionRefused,
                    RefusalReason::DuplicateId(id) => DocumentServiceError::DuplicateId(id),
                })
            }
        }
    }
}
