//! Core engine for hierarchical content documents.
//! This crate owns the tree invariants; callers own loading and saving.

pub mod config;
pub mod export;
pub mod logging;
pub mod model;
pub mod search;
pub mod service;
pub mod stats;
pub mod tree;
pub mod validation;

pub use config::{ConfigError, CoreConfig};
pub use export::{
    export_lines, export_semantic, export_tabular, flatten, CancellationToken, ExportContext,
    ExportError, FlatEntry,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig};
pub use model::node::{
    new_node_id, Attribute, AttributeType, Availability, DiningRecord, EventRecord, Node, NodeId,
    NodeKind, Recurrence, RoomRecord, SchemaData, UiState, Weekday,
};
pub use model::patch::{EditAction, NodePatch};
pub use search::filter::filter;
pub use service::document_service::{DocumentService, DocumentServiceError};
pub use stats::{analyze_stats, TreeStats};
pub use tree::index::{ensure_unique_ids, DuplicateIdError, IdIndex};
pub use tree::path::{find_by_id, find_path, walk};
pub use tree::store::{
    apply_action, apply_actions, delete, insert_child, insert_child_unique, patch, Mutation,
    MutationStatus, RefusalReason,
};
pub use validation::rules::{NodeVisit, ValidationRule};
pub use validation::{
    run_validation, validate, Issue, RuleRegistry, Severity, SuggestedFix, ValidationReport,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
