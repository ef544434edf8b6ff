//! Core use-case services.
//!
//! # Responsibility
//! - Wrap the pure tree functions for callers that own one live document.
//! - Keep CLI and other front ends decoupled from store outcome handling.

pub mod document_service;
