use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::error::BrandCheckError;
use crate::providers::{ProviderConfig, ProviderId, ProviderRegistry};

pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const MIN_TIMEOUT_SECS: u64 = 10;
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// A completion backend. Implementations send `prompt` as a single user
/// turn and return the completion text unchanged.
pub trait LlmProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    fn complete<'a>(
        &'a self,
        config: &'a ProviderConfig,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, BrandCheckError>>;
}

/// Dispatches prompts to the backend registered for a provider.
#[derive(Clone)]
pub struct ProviderInvoker {
    registry: Arc<ProviderRegistry>,
    timeout: Duration,
}

impl ProviderInvoker {
    pub fn new(registry: Arc<ProviderRegistry>, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fails with `ProviderNotConfigured` before any network traffic when
    /// the provider has no credential. No retries.
    pub async fn invoke(&self, provider: ProviderId, prompt: &str) -> Result<String, BrandCheckError> {
        if !self.registry.is_configured(provider) {
            return Err(BrandCheckError::ProviderNotConfigured {
                provider,
                credential_env: provider.credential_env(),
            });
        }

        let config = self.registry.get_config(provider)?;
        let backend = self.registry.backend(provider)?;

        tracing::info!(
            provider = %provider,
            model = %config.model,
            prompt_length = prompt.len(),
            "Invoking provider"
        );

        let start_time = Instant::now();
        let completion = timeout(self.timeout, backend.complete(config, prompt))
            .await
            .map_err(|_| {
                tracing::error!(
                    provider = %provider,
                    timeout_secs = self.timeout.as_secs(),
                    "Provider request timed out"
                );
                BrandCheckError::invocation(
                    provider,
                    None,
                    format!("request timed out after {}s", self.timeout.as_secs()),
                )
            })??;

        tracing::info!(
            provider = %provider,
            duration_ms = start_time.elapsed().as_millis() as u64,
            completion_length = completion.len(),
            "Provider responded"
        );

        Ok(completion)
    }
}
