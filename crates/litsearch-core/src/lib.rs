//! Litsearch Core Library
//!
//! LLM-assisted tooling for literature search.
//!
//! # Features
//! - Boolean query generation and refinement from a research description
//! - Short query titles with a deterministic keyword fallback
//! - Confidence scoring of extracted paper fields against the source text,
//!   validated against a declared result schema
//! - Provider selection between a direct API and a gateway

pub mod api;
pub mod config;
pub mod error;
pub mod fallback;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod sanitize;
pub mod types;

pub use api::ApiResponse;
pub use config::{Config, ModelSelection, ProviderSettings, TaskDefaults};
pub use error::{ErrorKind, Error, LitSearchError, Result};
pub use llm::{
    ChatMessage, ClientFactory, CompletionOptions, CredentialSource, Endpoint, LLMClient,
    ModelHandle, Provider, ProviderResolver, ResultSchema,
};
pub use pipeline::{ConfidenceAnalyzer, QueryGenerator, QuerySummarizer};
pub use types::{
    AnalysisReport, AnalysisRequest, BooleanQueryRequest, ConfidenceAnalysisResult,
    EvidenceStrength, ExtractedField, FieldConfidenceScore, QueryAction, QuerySummary,
    SummaryRequest, SummarySource,
};

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "litsearch";

/// Attribution sent to gateway providers
pub const ATTRIBUTION_URL: &str = "https://github.com/litsearch/litsearch";
pub const ATTRIBUTION_TITLE: &str = "litsearch";
