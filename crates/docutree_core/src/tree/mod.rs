//! Tree lookup and persistent mutation.
//!
//! # Responsibility
//! - `path`: find nodes and ancestry chains.
//! - `store`: the only mutation surface (insert child, patch, delete).
//! - `index`: id → position index and uniqueness checks.
//!
//! # Invariants
//! - Every operation is a pure function over an `Arc<Node>` root.
//! - No traversal recurses per tree level.

pub mod index;
pub mod path;
pub mod store;
