//! Request orchestration
//!
//! One orchestrator per task, each a single request/response unit with no
//! state shared across calls. The only suspension point is the model call.

mod confidence;
mod query;
mod summarize;

pub use confidence::{confidence_result_schema, ConfidenceAnalyzer, ANALYSIS_TEMPERATURE};
pub use query::{
    lint_boolean_query, QueryGenerator, QueryIssue, QueryMode, RequestShape, QUERY_MAX_TOKENS,
    QUERY_TEMPERATURE,
};
pub use summarize::{
    QuerySummarizer, MAX_SUMMARY_WORDS, SUMMARY_MAX_TOKENS, SUMMARY_TEMPERATURE,
};
