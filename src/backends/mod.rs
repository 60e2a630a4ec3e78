//! Backends module - External collaborator bindings
//!
//! Provides:
//! - fetch: resolving a source locator over HTTP or from disk

pub mod fetch;
