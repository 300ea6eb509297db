//! Provider resolution
//!
//! Maps a logical provider name plus model id onto a ready-to-call model
//! handle. Resolution is pure configuration lookup: a missing credential is
//! reported before any client is built or any request is sent.

use super::client::{ChatMessage, CompletionOptions, LLMClient, OpenAiCompatibleClient};
use super::schema::{extract_json_object, ResultSchema};
use crate::config::{Config, ModelSelection};
use crate::error::{LitSearchError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Supported provider identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Direct API access with a vendor key
    OpenAi,
    /// Gateway serving the same model family behind another endpoint and key
    OpenRouter,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::OpenAi, Provider::OpenRouter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::OpenRouter => "openrouter",
        }
    }

    /// Model used when a caller picks this provider without naming a model
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4o-mini",
            Provider::OpenRouter => "openai/gpt-4o-mini",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = LitSearchError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        Provider::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| {
                LitSearchError::Config(format!(
                    "Unknown provider '{}' (expected one of: {})",
                    s,
                    Provider::ALL.map(|p| p.as_str()).join(", ")
                ))
            })
    }
}

/// Source of API credentials
pub trait CredentialSource: Send + Sync {
    /// Look up a credential by variable name; blank values count as absent
    fn lookup(&self, var: &str) -> Option<String>;
}

/// Reads credentials from the process environment
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn lookup(&self, var: &str) -> Option<String> {
        std::env::var(var).ok().filter(|v| !v.trim().is_empty())
    }
}

impl CredentialSource for HashMap<String, String> {
    fn lookup(&self, var: &str) -> Option<String> {
        self.get(var).filter(|v| !v.trim().is_empty()).cloned()
    }
}

/// Fully resolved provider endpoint
#[derive(Clone)]
pub struct Endpoint {
    pub provider: Provider,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

/// Builds model clients for resolved endpoints
pub trait ClientFactory: Send + Sync {
    fn build(&self, endpoint: Endpoint, timeout: Duration) -> Result<Arc<dyn LLMClient>>;
}

/// Default factory producing HTTP clients
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpClientFactory;

impl ClientFactory for HttpClientFactory {
    fn build(&self, endpoint: Endpoint, timeout: Duration) -> Result<Arc<dyn LLMClient>> {
        let client: Arc<dyn LLMClient> = Arc::new(OpenAiCompatibleClient::new(endpoint, timeout)?);
        Ok(client)
    }
}

/// Resolves provider selections into model handles
#[derive(Clone)]
pub struct ProviderResolver {
    config: Config,
    credentials: Arc<dyn CredentialSource>,
    factory: Arc<dyn ClientFactory>,
}

impl ProviderResolver {
    /// Create resolver using environment credentials and HTTP clients
    pub fn new(config: Config) -> Self {
        Self {
            config,
            credentials: Arc::new(EnvCredentials),
            factory: Arc::new(HttpClientFactory),
        }
    }

    /// Create from the config file and environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Config::load()?))
    }

    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialSource>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_factory(mut self, factory: Arc<dyn ClientFactory>) -> Self {
        self.factory = factory;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Turn an optional caller selection into a concrete one
    ///
    /// No provider means the task default. A provider without a model uses
    /// the task default model when the provider matches, otherwise the
    /// provider's own default model.
    pub fn select(
        &self,
        task_default: &ModelSelection,
        provider: Option<&str>,
        model: Option<&str>,
    ) -> Result<ModelSelection> {
        let provider = match provider.map(str::trim).filter(|p| !p.is_empty()) {
            Some(name) => name.parse::<Provider>()?,
            None => task_default.provider,
        };

        let model = match model.map(str::trim).filter(|m| !m.is_empty()) {
            Some(m) => m.to_string(),
            None if provider == task_default.provider => task_default.model.clone(),
            None => provider.default_model().to_string(),
        };

        Ok(ModelSelection { provider, model })
    }

    /// Resolve a selection into a callable model handle
    pub fn resolve(&self, selection: &ModelSelection) -> Result<ModelHandle> {
        let settings = self.config.providers.settings(selection.provider);

        let api_key = self
            .credentials
            .lookup(&settings.api_key_env)
            .ok_or_else(|| {
                LitSearchError::Config(format!(
                    "{} is not set; required for provider '{}'",
                    settings.api_key_env, selection.provider
                ))
            })?;

        let endpoint = Endpoint {
            provider: selection.provider,
            base_url: settings.base_url.clone(),
            api_key,
            model: selection.model.clone(),
        };

        tracing::debug!(
            "Resolved provider {} (model {}) at {}",
            endpoint.provider,
            endpoint.model,
            endpoint.base_url
        );

        let client = self
            .factory
            .build(endpoint, Duration::from_secs(self.config.timeout_secs))?;

        Ok(ModelHandle {
            selection: selection.clone(),
            client,
        })
    }
}

/// Model client bound to a provider credential
#[derive(Clone)]
pub struct ModelHandle {
    selection: ModelSelection,
    client: Arc<dyn LLMClient>,
}

impl ModelHandle {
    pub fn new(selection: ModelSelection, client: Arc<dyn LLMClient>) -> Self {
        Self { selection, client }
    }

    pub fn selection(&self) -> &ModelSelection {
        &self.selection
    }

    /// Unconstrained completion returning raw text
    pub async fn complete_text(
        &self,
        prompt: String,
        options: &CompletionOptions,
    ) -> Result<String> {
        tracing::debug!(
            "Text completion via {} ({} prompt chars)",
            self.selection.provider,
            prompt.len()
        );
        self.client
            .chat_completion(vec![ChatMessage::user(prompt)], options)
            .await
    }

    /// Schema-constrained completion
    ///
    /// Returns a value conforming to `schema` or a validation error; text
    /// that violates the declared shape never reaches the caller.
    pub async fn complete_structured<T: DeserializeOwned>(
        &self,
        prompt: String,
        options: &CompletionOptions,
        schema: &ResultSchema,
    ) -> Result<T> {
        let options = options.clone().with_response_format(schema.response_format());

        tracing::debug!(
            "Structured completion '{}' via {} ({} prompt chars)",
            schema.name,
            self.selection.provider,
            prompt.len()
        );

        let response = self
            .client
            .chat_completion(vec![ChatMessage::user(prompt)], &options)
            .await?;

        parse_structured(&response, schema)
    }
}

fn parse_structured<T: DeserializeOwned>(response: &str, schema: &ResultSchema) -> Result<T> {
    let json_str = extract_json_object(response).ok_or_else(|| {
        tracing::debug!("Raw LLM response: {}", response);
        LitSearchError::Validation(format!("No JSON object in '{}' response", schema.name))
    })?;

    let value: serde_json::Value = serde_json::from_str(json_str).map_err(|e| {
        tracing::debug!("Raw LLM response: {}", response);
        LitSearchError::Validation(format!("Invalid JSON in '{}' response: {}", schema.name, e))
    })?;

    schema.validate(&value)?;

    serde_json::from_value(value).map_err(|e| {
        LitSearchError::Validation(format!("'{}' response does not decode: {}", schema.name, e))
    })
}
