//! Query summarization
//!
//! A title must never block display of a query the user already has, so a
//! failed model call degrades to the keyword heuristic in `fallback`.

use crate::error::{LitSearchError, Result};
use crate::fallback::summarize_query_keywords;
use crate::llm::{CompletionOptions, ModelHandle, ProviderResolver};
use crate::prompts::summarization_prompt;
use crate::sanitize::{sanitize, strip_trailing_period};
use crate::types::{QuerySummary, SummaryRequest, SummarySource};
use std::sync::Arc;

pub const SUMMARY_TEMPERATURE: f32 = 0.3;
pub const SUMMARY_MAX_TOKENS: u32 = 20;
pub const MAX_SUMMARY_WORDS: usize = 5;

/// Produces short titles for Boolean queries
pub struct QuerySummarizer {
    resolver: Arc<ProviderResolver>,
}

impl QuerySummarizer {
    pub fn new(resolver: Arc<ProviderResolver>) -> Self {
        Self { resolver }
    }

    /// Summarize a query into a title of at most five words
    ///
    /// Input and configuration errors are returned; model failures are not.
    pub async fn summarize(&self, request: &SummaryRequest) -> Result<QuerySummary> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(LitSearchError::InvalidInput("query is required".to_string()));
        }

        let selection = self.resolver.select(
            &self.resolver.config().defaults.summary,
            request.provider.as_deref(),
            request.model.as_deref(),
        )?;
        let handle = self.resolver.resolve(&selection)?;

        match summarize_with_model(&handle, query).await {
            Ok(summary) => Ok(QuerySummary {
                summary,
                source: SummarySource::Model,
            }),
            Err(e) => {
                tracing::warn!("Summarization failed ({}), using keyword fallback", e);
                Ok(QuerySummary {
                    summary: summarize_query_keywords(query),
                    source: SummarySource::Fallback,
                })
            }
        }
    }
}

async fn summarize_with_model(handle: &ModelHandle, query: &str) -> Result<String> {
    let options = CompletionOptions::default()
        .with_temperature(SUMMARY_TEMPERATURE)
        .with_max_tokens(SUMMARY_MAX_TOKENS);

    let raw = handle
        .complete_text(summarization_prompt(query), &options)
        .await?;

    let summary = limit_words(&sanitize(&raw), MAX_SUMMARY_WORDS);
    if summary.is_empty() {
        return Err(LitSearchError::Validation(
            "model returned an empty summary".to_string(),
        ));
    }
    Ok(summary)
}

/// Keep at most `max` words, re-stripping a period exposed by the cut
fn limit_words(text: &str, max: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max {
        return words.join(" ");
    }
    strip_trailing_period(&words[..max].join(" ")).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_words() {
        assert_eq!(limit_words("Gene Editing in Cancer", 5), "Gene Editing in Cancer");
        assert_eq!(
            limit_words("One two three four five six seven", 5),
            "One two three four five"
        );
        assert_eq!(limit_words("a b c d e. f", 5), "a b c d e");
        assert_eq!(limit_words("   ", 5), "");
    }
}
