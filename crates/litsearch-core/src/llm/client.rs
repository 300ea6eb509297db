//! HTTP client for OpenAI-compatible chat completion services

use super::provider::{Endpoint, Provider};
use crate::error::{LitSearchError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Trait for LLM service clients
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate chat completion
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        options: &CompletionOptions,
    ) -> Result<String>;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// Chat message for completion requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Sampling and output-shape settings for one completion call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub response_format: Option<ResponseFormat>,
}

impl CompletionOptions {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }
}

/// OpenAI `response_format` payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    JsonSchema { json_schema: JsonSchemaFormat },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonSchemaFormat {
    pub name: String,
    pub strict: bool,
    pub schema: serde_json::Value,
}

/// OpenAI-compatible chat completions client (OpenAI, OpenRouter)
pub struct OpenAiCompatibleClient {
    http_client: reqwest::Client,
    endpoint: Endpoint,
}

impl OpenAiCompatibleClient {
    /// Create new client bound to a resolved endpoint
    pub fn new(endpoint: Endpoint, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LitSearchError::Http)?;

        Ok(Self {
            http_client,
            endpoint,
        })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.endpoint.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl LLMClient for OpenAiCompatibleClient {
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        options: &CompletionOptions,
    ) -> Result<String> {
        #[derive(Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: Vec<ChatMessage>,
            #[serde(skip_serializing_if = "Option::is_none")]
            temperature: Option<f32>,
            #[serde(skip_serializing_if = "Option::is_none")]
            max_tokens: Option<u32>,
            #[serde(skip_serializing_if = "Option::is_none")]
            response_format: Option<&'a ResponseFormat>,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<ChatChoice>,
        }

        #[derive(Deserialize)]
        struct ChatChoice {
            message: ChoiceMessage,
        }

        #[derive(Deserialize)]
        struct ChoiceMessage {
            content: Option<String>,
        }

        let start = Instant::now();

        let request = ChatRequest {
            model: &self.endpoint.model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            response_format: options.response_format.as_ref(),
        };

        let mut req = self
            .http_client
            .post(self.completions_url())
            .bearer_auth(&self.endpoint.api_key)
            .json(&request);

        if self.endpoint.provider == Provider::OpenRouter {
            req = req
                .header("HTTP-Referer", crate::ATTRIBUTION_URL)
                .header("X-Title", crate::ATTRIBUTION_TITLE);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                LitSearchError::Provider(format!(
                    "{} request timed out after {:?}",
                    self.endpoint.provider,
                    start.elapsed()
                ))
            } else {
                LitSearchError::Http(e)
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LitSearchError::Provider(format!(
                "LLM service error (HTTP {}): {}",
                status, body
            )));
        }

        let chat_response: ChatResponse = response.json().await?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LitSearchError::Provider("No response from LLM".to_string()))?;

        tracing::debug!(
            "{} completion from {} in {} ms ({} chars)",
            self.endpoint.provider,
            self.endpoint.model,
            start.elapsed().as_millis(),
            content.len()
        );

        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.endpoint.model
    }
}
