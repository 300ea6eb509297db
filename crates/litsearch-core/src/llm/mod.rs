//! LLM integration
//!
//! Provides:
//! - An OpenAI-compatible chat completions client
//! - Provider resolution (credential lookup, endpoint selection)
//! - Declared result schemas and validation for structured completions

mod client;
mod provider;
mod schema;

pub use client::{
    ChatMessage, CompletionOptions, JsonSchemaFormat, LLMClient, OpenAiCompatibleClient,
    ResponseFormat,
};
pub use provider::{
    ClientFactory, CredentialSource, Endpoint, EnvCredentials, HttpClientFactory, ModelHandle,
    Provider, ProviderResolver,
};
pub use schema::{extract_json_object, ResultSchema, SchemaField, SchemaType};
