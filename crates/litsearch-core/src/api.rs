//! JSON operation envelope
//!
//! Each operation takes a raw JSON request and answers with a status code
//! and a JSON body, so transports (CLI, MCP) share one error policy:
//! 400 for bad input, 500 for everything else, details only in the log.

use crate::error::{ErrorKind, LitSearchError, Result};
use crate::llm::ProviderResolver;
use crate::pipeline::{ConfidenceAnalyzer, QueryGenerator, QuerySummarizer};
use crate::types::{AnalysisRequest, BooleanQueryRequest, SummaryRequest};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

pub const ANALYSIS_FAILED: &str = "Failed to analyze confidence";
pub const GENERATION_FAILED: &str = "Failed to generate query";
pub const SUMMARY_FAILED: &str = "Failed to summarize query";

/// Status + body pair returned by every operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// Map a failure onto the envelope, hiding model-side details
    fn from_error(error: &LitSearchError, generic: &str) -> Self {
        match error.kind() {
            ErrorKind::Input => Self::error(400, error.to_string()),
            ErrorKind::Configuration => {
                tracing::warn!("{}: {}", generic, error);
                Self::error(500, error.to_string())
            }
            ErrorKind::Provider | ErrorKind::Validation => {
                tracing::warn!("{}: {}", generic, error);
                Self::error(500, generic)
            }
        }
    }
}

fn parse_request<T: DeserializeOwned>(request: Value) -> Result<T> {
    serde_json::from_value(request)
        .map_err(|e| LitSearchError::InvalidInput(format!("malformed request: {}", e)))
}

/// `{sourceText, extractedFields, provider?, model?}` → `{analysis, timestamp}`
pub async fn analyze_confidence(resolver: &Arc<ProviderResolver>, request: Value) -> ApiResponse {
    let outcome = async {
        let request: AnalysisRequest = parse_request(request)?;
        ConfidenceAnalyzer::new(resolver.clone())
            .analyze(&request)
            .await
    }
    .await;

    match outcome.and_then(|report| Ok(serde_json::to_value(report)?)) {
        Ok(body) => ApiResponse::ok(body),
        Err(e) => ApiResponse::from_error(&e, ANALYSIS_FAILED),
    }
}

/// `{description, existingQuery?, action?}` → `{query}`
pub async fn generate_query(resolver: &Arc<ProviderResolver>, request: Value) -> ApiResponse {
    let outcome = async {
        let request: BooleanQueryRequest = parse_request(request)?;
        QueryGenerator::new(resolver.clone())
            .generate(&request)
            .await
    }
    .await;

    match outcome {
        Ok(query) => ApiResponse::ok(json!({ "query": query })),
        Err(e) => ApiResponse::from_error(&e, GENERATION_FAILED),
    }
}

/// `{query}` → `{summary}`; model failures still answer 200 via the fallback
pub async fn summarize_query(resolver: &Arc<ProviderResolver>, request: Value) -> ApiResponse {
    let outcome = async {
        let request: SummaryRequest = parse_request(request)?;
        QuerySummarizer::new(resolver.clone())
            .summarize(&request)
            .await
    }
    .await;

    match outcome {
        Ok(summary) => ApiResponse::ok(json!({ "summary": summary.summary })),
        Err(e) => ApiResponse::from_error(&e, SUMMARY_FAILED),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::collections::HashMap;

    fn resolver_without_keys() -> Arc<ProviderResolver> {
        Arc::new(
            ProviderResolver::new(Config::default())
                .with_credentials(Arc::new(HashMap::<String, String>::new())),
        )
    }

    #[tokio::test]
    async fn test_malformed_request_is_400() {
        let resolver = resolver_without_keys();
        let response = generate_query(&resolver, json!("not an object")).await;
        assert_eq!(response.status, 400);
        assert!(response.body["error"]
            .as_str()
            .unwrap()
            .contains("malformed request"));
    }

    #[tokio::test]
    async fn test_missing_fields_are_400() {
        let resolver = resolver_without_keys();

        let response = analyze_confidence(&resolver, json!({})).await;
        assert_eq!(response.status, 400);

        let response = generate_query(&resolver, json!({"action": "refine"})).await;
        assert_eq!(response.status, 400);

        let response = summarize_query(&resolver, json!({"query": "  "})).await;
        assert_eq!(response.status, 400);
    }

    #[tokio::test]
    async fn test_missing_credential_is_500_with_config_message() {
        let resolver = resolver_without_keys();
        let response = generate_query(&resolver, json!({"description": "CRISPR"})).await;
        assert_eq!(response.status, 500);
        assert!(response.body["error"]
            .as_str()
            .unwrap()
            .contains("OPENAI_API_KEY"));
        assert!(!response.is_success());
    }

    #[test]
    fn test_model_errors_are_generic() {
        let response = ApiResponse::from_error(
            &LitSearchError::Provider("upstream said: secret detail".into()),
            GENERATION_FAILED,
        );
        assert_eq!(response.status, 500);
        assert_eq!(response.body, json!({ "error": GENERATION_FAILED }));
    }
}
