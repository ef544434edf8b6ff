//! Content document domain model.
//!
//! # Responsibility
//! - Define the node record, its typed payloads and partial updates.
//! - Keep one node shape for every kind; the kind tag selects which fields
//!   are meaningful.
//!
//! # Invariants
//! - A document is rooted at exactly one `NodeKind::Root` node.
//! - Ids are unique across a document; core checks this on demand only
//!   (see `tree::index`).

pub mod node;
pub mod patch;
