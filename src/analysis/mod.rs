//! Analysis module - The document-level audit passes
//!
//! Provides:
//! - links: internal link scanning and broken link detection
//! - letters: raw and normalized letter counting

pub mod letters;
pub mod links;
