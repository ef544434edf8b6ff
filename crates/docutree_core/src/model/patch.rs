//! Partial node updates and edit action records.
//!
//! # Responsibility
//! - Describe the field subset a `patch` mutation merges into a node.
//! - Describe add/update/delete requests from any producer (editor UI or
//!   model-proposed edits) in one shape.
//!
//! # Invariants
//! - A patch never touches `id` or `children`.
//! - Absent patch fields leave the target field untouched.

use crate::model::node::{Attribute, Availability, Node, NodeId, NodeKind, SchemaData, UiState};
use serde::{Deserialize, Serialize};

/// Field subset merged into a node by `tree::store::patch`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<Attribute>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_data: Option<SchemaData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<UiState>,
}

impl NodePatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn kind(kind: NodeKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Returns `true` when no field would change.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merges present fields into `node`.
    pub fn apply_to(&self, node: &mut Node) {
        if let Some(kind) = &self.kind {
            node.kind = kind.clone();
        }
        if let Some(name) = &self.name {
            node.name = name.clone();
        }
        if let Some(value) = &self.value {
            node.value = Some(value.clone());
        }
        if let Some(answer) = &self.answer {
            node.answer = Some(answer.clone());
        }
        if let Some(description) = &self.description {
            node.description = Some(description.clone());
        }
        if let Some(price) = self.price {
            node.price = Some(price);
        }
        if let Some(attributes) = &self.attributes {
            node.attributes = attributes.clone();
        }
        if let Some(tags) = &self.tags {
            node.tags = tags.clone();
        }
        if let Some(availability) = &self.availability {
            node.availability = Some(availability.clone());
        }
        if let Some(schema) = &self.schema_data {
            node.schema_data = Some(schema.clone());
        }
        if let Some(ui) = self.ui {
            node.ui = Some(ui);
        }
    }
}

/// One mutation request: `{type: add|update|delete, targetId, data?}`.
///
/// For `add`, `targetId` names the parent receiving `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum EditAction {
    Add { target_id: NodeId, data: Node },
    Update { target_id: NodeId, data: NodePatch },
    Delete { target_id: NodeId },
}

impl EditAction {
    pub fn target_id(&self) -> &str {
        match self {
            Self::Add { target_id, .. }
            | Self::Update { target_id, .. }
            | Self::Delete { target_id } => target_id.as_str(),
        }
    }

    /// Short action label for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }
}
