//! Flows module - Pipeline runs combining fetch, parse, analysis and
//! rendering
//!
//! Provides:
//! - report: the full audit pipeline and the per-stage command handlers

pub mod report;
