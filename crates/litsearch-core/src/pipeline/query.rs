//! Boolean query generation and refinement
//!
//! No deterministic fallback exists for "what is a good Boolean query", so
//! a failed model call fails the operation.

use crate::error::{LitSearchError, Result};
use crate::llm::{CompletionOptions, ProviderResolver};
use crate::prompts::{query_generation_prompt, query_refinement_prompt};
use crate::sanitize::sanitize;
use crate::types::{BooleanQueryRequest, QueryAction};
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

pub const QUERY_TEMPERATURE: f32 = 0.3;
pub const QUERY_MAX_TOKENS: u32 = 300;

lazy_static! {
    static ref QUOTED_PHRASE: Regex = Regex::new(r#""[^"]*""#).unwrap();
    static ref FIELD_PREFIX: Regex = Regex::new(r"(?:^|[\s(])([A-Za-z][A-Za-z_]*):").unwrap();
}

/// The three request shapes a caller can send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestShape {
    Generate,
    Refine,
    /// `action = refine` with no usable existing query; served as Generate
    RefineWithoutExisting,
}

impl RequestShape {
    pub fn of(request: &BooleanQueryRequest) -> Self {
        let has_existing = request
            .existing_query
            .as_deref()
            .is_some_and(|q| !q.trim().is_empty());

        match (request.action, has_existing) {
            (Some(QueryAction::Refine), true) => RequestShape::Refine,
            (Some(QueryAction::Refine), false) => RequestShape::RefineWithoutExisting,
            _ => RequestShape::Generate,
        }
    }
}

/// Prompt mode chosen for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode<'a> {
    Generate {
        description: &'a str,
    },
    Refine {
        existing_query: &'a str,
        feedback: &'a str,
    },
}

impl<'a> QueryMode<'a> {
    pub fn from_request(request: &'a BooleanQueryRequest) -> Self {
        let description = request.description.trim();
        match RequestShape::of(request) {
            RequestShape::Refine => QueryMode::Refine {
                existing_query: request.existing_query.as_deref().unwrap_or_default().trim(),
                feedback: description,
            },
            RequestShape::RefineWithoutExisting => {
                tracing::warn!(
                    "Refine requested without an existing query; generating a new query instead"
                );
                QueryMode::Generate { description }
            }
            RequestShape::Generate => QueryMode::Generate { description },
        }
    }

    pub fn prompt(&self) -> String {
        match self {
            QueryMode::Generate { description } => query_generation_prompt(description),
            QueryMode::Refine {
                existing_query,
                feedback,
            } => query_refinement_prompt(existing_query, feedback),
        }
    }
}

/// Generates and refines Boolean queries
pub struct QueryGenerator {
    resolver: Arc<ProviderResolver>,
}

impl QueryGenerator {
    pub fn new(resolver: Arc<ProviderResolver>) -> Self {
        Self { resolver }
    }

    /// Generate (or refine) a Boolean query
    pub async fn generate(&self, request: &BooleanQueryRequest) -> Result<String> {
        if request.description.trim().is_empty() {
            return Err(LitSearchError::InvalidInput(
                "description is required".to_string(),
            ));
        }

        let mode = QueryMode::from_request(request);

        let selection = self.resolver.select(
            &self.resolver.config().defaults.query,
            request.provider.as_deref(),
            request.model.as_deref(),
        )?;
        let handle = self.resolver.resolve(&selection)?;

        let options = CompletionOptions::default()
            .with_temperature(QUERY_TEMPERATURE)
            .with_max_tokens(QUERY_MAX_TOKENS);

        let raw = handle.complete_text(mode.prompt(), &options).await?;
        let query = sanitize(&raw);

        if query.is_empty() {
            tracing::debug!("Raw LLM response: {}", raw);
            return Err(LitSearchError::Validation(
                "model returned an empty query".to_string(),
            ));
        }

        let issues = lint_boolean_query(&query);
        if !issues.is_empty() {
            tracing::debug!("Raw LLM response: {}", raw);
            let details: Vec<String> = issues.iter().map(ToString::to_string).collect();
            return Err(LitSearchError::Validation(format!(
                "generated query {}",
                details.join(", ")
            )));
        }

        Ok(query)
    }
}

/// Output contract violations in a generated query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryIssue {
    /// `word:` token outside a quoted phrase
    FieldPrefix(String),
    UnbalancedParentheses,
    UnbalancedQuotes,
}

impl std::fmt::Display for QueryIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryIssue::FieldPrefix(prefix) => write!(f, "contains field prefix '{}:'", prefix),
            QueryIssue::UnbalancedParentheses => f.write_str("has unbalanced parentheses"),
            QueryIssue::UnbalancedQuotes => f.write_str("has an unterminated quoted phrase"),
        }
    }
}

/// Check a query against the output contract
pub fn lint_boolean_query(query: &str) -> Vec<QueryIssue> {
    let mut issues = Vec::new();

    if query.matches('"').count() % 2 != 0 {
        issues.push(QueryIssue::UnbalancedQuotes);
    }

    let unquoted = QUOTED_PHRASE.replace_all(query, " ");

    for capture in FIELD_PREFIX.captures_iter(&unquoted) {
        issues.push(QueryIssue::FieldPrefix(capture[1].to_string()));
    }

    let mut depth: i64 = 0;
    for c in unquoted.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    break;
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        issues.push(QueryIssue::UnbalancedParentheses);
    }

    issues
}
