use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::analyzer::llm_client::{
    ProviderInvoker, DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS, MIN_TIMEOUT_SECS,
};
use crate::analyzer::AnalysisOrchestrator;
use crate::error::BrandCheckError;
use crate::models::GuidelineDocument;
use crate::providers::ProviderRegistry;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Process-wide settings, fixed at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub timeout: Duration,
    pub bind: SocketAddr,
    pub guidelines_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            guidelines_path: None,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), BrandCheckError> {
        let secs = self.timeout.as_secs();
        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&secs) {
            return Err(BrandCheckError::ConfigError(format!(
                "Timeout must be between {} and {} seconds",
                MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS
            )));
        }
        Ok(())
    }

    /// Wires the registry and guidelines into a ready orchestrator.
    pub fn build_orchestrator(
        &self,
        registry: ProviderRegistry,
    ) -> Result<AnalysisOrchestrator, BrandCheckError> {
        self.validate()?;
        let guidelines = GuidelineDocument::load(self.guidelines_path.as_deref())?;
        let invoker = ProviderInvoker::new(Arc::new(registry), self.timeout);
        Ok(AnalysisOrchestrator::new(invoker, Arc::new(guidelines)))
    }
}
