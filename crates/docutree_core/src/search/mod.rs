//! Text search over the content tree.
//!
//! # Responsibility
//! - Prune a tree to the nodes matching a query while keeping ancestry.
//! - Keep matching rules inside core so every caller filters the same way.

pub mod filter;
