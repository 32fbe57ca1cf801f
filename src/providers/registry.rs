use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::analyzer::llm_client::LlmProvider;
use crate::error::BrandCheckError;
use crate::providers::{AnthropicProvider, GeminiProvider, OpenAiProvider, ProviderId};

const DEFAULT_MAX_TOKENS: u32 = 6000;
const DEFAULT_TEMPERATURE: f64 = 0.3;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct ProviderConfig {
    pub id: ProviderId,
    api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub base_url: String,
}

impl ProviderConfig {
    pub fn new(id: ProviderId) -> Self {
        Self {
            id,
            api_key: None,
            model: id.default_model().to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            base_url: id.default_base_url().to_string(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = if temperature.is_nan() {
            DEFAULT_TEMPERATURE
        } else {
            temperature.clamp(0.0, 1.0)
        };
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim().trim_end_matches('/').to_string();
        self
    }

    /// Reads credential, model and base URL overrides through `lookup`.
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(id: ProviderId, lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::new(id);
        if let Some(key) = non_blank(id.credential_env()) {
            config = config.with_api_key(key.trim());
        }
        if let Some(model) = non_blank(id.model_env()) {
            config = config.with_model(model.trim());
        }
        if let Some(url) = non_blank(id.base_url_env()) {
            config = config.with_base_url(url);
        }
        config
    }

    pub fn is_configured(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false)
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("id", &self.id)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderStatus {
    pub id: ProviderId,
    pub model: String,
    pub configured: bool,
}

struct RegistryEntry {
    config: ProviderConfig,
    backend: Arc<dyn LlmProvider>,
}

/// Immutable map from provider id to its configuration and backend.
pub struct ProviderRegistry {
    entries: HashMap<ProviderId, RegistryEntry>,
}

impl ProviderRegistry {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn from_env() -> Result<Self, BrandCheckError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, BrandCheckError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let configs = ProviderId::ALL
            .iter()
            .map(|id| ProviderConfig::from_lookup(*id, &lookup))
            .collect();
        Self::with_configs(configs)
    }

    /// Registers the stock HTTP backend for each config, sharing one
    /// connection pool.
    pub fn with_configs(configs: Vec<ProviderConfig>) -> Result<Self, BrandCheckError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| {
                BrandCheckError::ConfigError(format!("Failed to build HTTP client: {}", e))
            })?;

        let mut registry = Self::empty();
        for config in configs {
            let backend: Arc<dyn LlmProvider> = match config.id {
                ProviderId::Anthropic => Arc::new(AnthropicProvider::new(client.clone())),
                ProviderId::OpenAi => Arc::new(OpenAiProvider::new(client.clone())),
                ProviderId::Gemini => Arc::new(GeminiProvider::new(client.clone())),
            };

            tracing::debug!(
                provider = %config.id,
                model = %config.model,
                configured = config.is_configured(),
                "Registered provider"
            );
            registry = registry.register(config, backend);
        }
        Ok(registry)
    }

    /// Adds or replaces the entry for `config.id`.
    pub fn register(mut self, config: ProviderConfig, backend: Arc<dyn LlmProvider>) -> Self {
        self.entries
            .insert(config.id, RegistryEntry { config, backend });
        self
    }

    pub fn is_configured(&self, id: ProviderId) -> bool {
        self.entries
            .get(&id)
            .map(|entry| entry.config.is_configured())
            .unwrap_or(false)
    }

    pub fn get_config(&self, id: ProviderId) -> Result<&ProviderConfig, BrandCheckError> {
        self.entry(id).map(|entry| &entry.config)
    }

    pub fn backend(&self, id: ProviderId) -> Result<Arc<dyn LlmProvider>, BrandCheckError> {
        self.entry(id).map(|entry| Arc::clone(&entry.backend))
    }

    pub fn statuses(&self) -> Vec<ProviderStatus> {
        let mut statuses: Vec<ProviderStatus> = self
            .entries
            .values()
            .map(|entry| ProviderStatus {
                id: entry.config.id,
                model: entry.config.model.clone(),
                configured: entry.config.is_configured(),
            })
            .collect();
        statuses.sort_by_key(|status| status.id);
        statuses
    }

    fn entry(&self, id: ProviderId) -> Result<&RegistryEntry, BrandCheckError> {
        self.entries.get(&id).ok_or_else(|| {
            BrandCheckError::ConfigError(format!("Provider '{}' is not registered", id))
        })
    }
}
