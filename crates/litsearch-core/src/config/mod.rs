//! Configuration management

use crate::error::Result;
use crate::llm::Provider;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable pointing at an alternate config file
pub const CONFIG_PATH_ENV: &str = "LITSEARCH_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider endpoints and credential variable names
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Default provider/model per task
    #[serde(default)]
    pub defaults: TaskDefaults,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            providers: ProvidersConfig::default(),
            defaults: TaskDefaults::default(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Endpoint settings for every supported provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_openai")]
    pub openai: ProviderSettings,

    #[serde(default = "default_openrouter")]
    pub openrouter: ProviderSettings,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            openai: default_openai(),
            openrouter: default_openrouter(),
        }
    }
}

impl ProvidersConfig {
    /// Settings for a provider
    pub fn settings(&self, provider: Provider) -> &ProviderSettings {
        match provider {
            Provider::OpenAi => &self.openai,
            Provider::OpenRouter => &self.openrouter,
        }
    }
}

/// Endpoint configuration for one provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Base URL of the OpenAI-compatible API (without `/chat/completions`)
    pub base_url: String,

    /// Name of the environment variable holding the API key
    pub api_key_env: String,
}

fn default_openai() -> ProviderSettings {
    ProviderSettings {
        base_url: std::env::var("LITSEARCH_OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
        api_key_env: "OPENAI_API_KEY".to_string(),
    }
}

fn default_openrouter() -> ProviderSettings {
    ProviderSettings {
        base_url: std::env::var("LITSEARCH_OPENROUTER_BASE_URL")
            .unwrap_or_else(|_| "https://openrouter.ai/api/v1".to_string()),
        api_key_env: "OPENROUTER_API_KEY".to_string(),
    }
}

/// Provider + model pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSelection {
    pub provider: Provider,
    pub model: String,
}

impl ModelSelection {
    pub fn new(provider: Provider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

/// Default model selection for each task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDefaults {
    /// Confidence analysis goes through the gateway provider
    #[serde(default = "default_analysis")]
    pub analysis: ModelSelection,

    #[serde(default = "default_query")]
    pub query: ModelSelection,

    #[serde(default = "default_query")]
    pub summary: ModelSelection,
}

impl Default for TaskDefaults {
    fn default() -> Self {
        Self {
            analysis: default_analysis(),
            query: default_query(),
            summary: default_query(),
        }
    }
}

fn default_analysis() -> ModelSelection {
    ModelSelection::new(Provider::OpenRouter, "openai/gpt-4o-mini")
}

fn default_query() -> ModelSelection {
    ModelSelection::new(Provider::OpenAi, "gpt-4o-mini")
}

fn default_timeout() -> u64 {
    60
}

impl Config {
    /// Load config from `LITSEARCH_CONFIG` or the default path
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_path());
        Self::load_from(&path)
    }

    /// Load config from a file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            tracing::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.defaults.analysis.provider, Provider::OpenRouter);
        assert_eq!(config.defaults.query.provider, Provider::OpenAi);
        assert_eq!(config.providers.openai.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.providers.openrouter.api_key_env, "OPENROUTER_API_KEY");
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.yml")).unwrap();
        assert_eq!(config.defaults.summary.model, "gpt-4o-mini");
    }

    #[test]
    fn test_partial_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(
            &path,
            "timeout_secs: 5\ndefaults:\n  query:\n    provider: openrouter\n    model: anthropic/claude-3.5-haiku\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.defaults.query.provider, Provider::OpenRouter);
        assert_eq!(config.defaults.query.model, "anthropic/claude-3.5-haiku");
        assert_eq!(config.defaults.analysis, default_analysis());
    }

    #[test]
    fn test_unknown_provider_in_yaml_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(
            &path,
            "defaults:\n  query:\n    provider: mystery\n    model: x\n",
        )
        .unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yml");
        let mut config = Config::default();
        config.timeout_secs = 12;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.timeout_secs, 12);
    }
}
