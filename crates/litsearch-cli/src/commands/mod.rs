//! CLI command handlers

pub mod analyze;
pub mod query;
pub mod summarize;
