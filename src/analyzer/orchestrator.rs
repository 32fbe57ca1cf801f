use std::fmt;
use std::sync::Arc;
use tracing::Instrument;

use crate::analyzer::extractor::JsonExtractor;
use crate::analyzer::llm_client::ProviderInvoker;
use crate::analyzer::prompts::PromptTemplate;
use crate::error::BrandCheckError;
use crate::models::{AnalysisResult, ContentRecommendation, GuidelineDocument};
use crate::providers::{ProviderId, ProviderRegistry};

/// Per-request progress, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    CheckingProvider,
    Prompting,
    Invoking,
    Extracting,
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validating => "validating",
            Stage::CheckingProvider => "checking_provider",
            Stage::Prompting => "prompting",
            Stage::Invoking => "invoking",
            Stage::Extracting => "extracting",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runs content through prompt building, provider invocation and JSON
/// extraction. Each call is independent and all-or-nothing.
pub struct AnalysisOrchestrator {
    invoker: ProviderInvoker,
    guidelines: Arc<GuidelineDocument>,
    extractor: JsonExtractor,
}

impl AnalysisOrchestrator {
    pub fn new(invoker: ProviderInvoker, guidelines: Arc<GuidelineDocument>) -> Self {
        Self {
            invoker,
            guidelines,
            extractor: JsonExtractor::new(),
        }
    }

    pub fn with_extractor(mut self, extractor: JsonExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        self.invoker.registry()
    }

    pub fn guidelines(&self) -> &GuidelineDocument {
        &self.guidelines
    }

    /// Brand-alignment report for `content`. Recommendations are never
    /// part of this result, even if the model volunteers them.
    pub async fn run_analysis(
        &self,
        content: &str,
        platform: &str,
        provider: ProviderId,
    ) -> Result<AnalysisResult, BrandCheckError> {
        let span = tracing::info_span!("analysis", provider = %provider, platform = %platform.trim());
        async move {
            log_stage(Stage::Validating);
            validate_inputs(content, platform)?;

            self.check_provider(provider)?;

            log_stage(Stage::Prompting);
            let prompt = PromptTemplate::build_analysis_prompt(content, platform.trim(), &self.guidelines);

            let raw = self.invoke(provider, &prompt).await?;

            log_stage(Stage::Extracting);
            let analysis: AnalysisResult = self.extractor.extract_as(&raw)?;

            log_stage(Stage::Done);
            tracing::info!(overall_score = analysis.overall.score, "Analysis complete");
            Ok(analysis.without_recommendations())
        }
        .instrument(span)
        .await
    }

    /// Rewrite recommendations targeting the weak spots of `analysis`.
    /// Examples whose `original` is not found in `content` are dropped.
    pub async fn run_recommendations(
        &self,
        content: &str,
        platform: &str,
        analysis: Option<&AnalysisResult>,
        provider: ProviderId,
    ) -> Result<Vec<ContentRecommendation>, BrandCheckError> {
        let span = tracing::info_span!("recommendations", provider = %provider, platform = %platform.trim());
        async move {
            log_stage(Stage::Validating);
            validate_inputs(content, platform)?;
            let analysis = analysis.ok_or_else(|| {
                BrandCheckError::InvalidRequest("An analysis result is required".to_string())
            })?;

            self.check_provider(provider)?;

            log_stage(Stage::Prompting);
            let prompt = PromptTemplate::build_recommendations_prompt(
                content,
                platform.trim(),
                analysis,
                &self.guidelines,
            );

            let raw = self.invoke(provider, &prompt).await?;

            log_stage(Stage::Extracting);
            let mut recommendations: Vec<ContentRecommendation> = self.extractor.extract_as(&raw)?;

            let mut dropped = 0;
            for recommendation in &mut recommendations {
                let removed = recommendation.retain_grounded_examples(content);
                if removed > 0 {
                    tracing::warn!(
                        title = %recommendation.title,
                        removed,
                        "Dropped rewrite examples not found in the content"
                    );
                }
                dropped += removed;
            }

            log_stage(Stage::Done);
            tracing::info!(
                count = recommendations.len(),
                dropped_examples = dropped,
                "Recommendations complete"
            );
            Ok(recommendations)
        }
        .instrument(span)
        .await
    }

    /// Analysis followed by recommendations from the same provider.
    pub async fn run_full(
        &self,
        content: &str,
        platform: &str,
        provider: ProviderId,
    ) -> Result<AnalysisResult, BrandCheckError> {
        let analysis = self.run_analysis(content, platform, provider).await?;
        let recommendations = self
            .run_recommendations(content, platform, Some(&analysis), provider)
            .await?;
        Ok(analysis.with_recommendations(recommendations))
    }

    fn check_provider(&self, provider: ProviderId) -> Result<(), BrandCheckError> {
        log_stage(Stage::CheckingProvider);
        if self.invoker.registry().is_configured(provider) {
            Ok(())
        } else {
            tracing::warn!(credential_env = provider.credential_env(), "Provider is not configured");
            Err(BrandCheckError::ProviderNotConfigured {
                provider,
                credential_env: provider.credential_env(),
            })
        }
    }

    async fn invoke(&self, provider: ProviderId, prompt: &str) -> Result<String, BrandCheckError> {
        log_stage(Stage::Invoking);
        self.invoker.invoke(provider, prompt).await.map_err(|e| {
            tracing::error!(error = %e, "Provider invocation failed");
            e
        })
    }
}

fn log_stage(stage: Stage) {
    tracing::debug!(stage = %stage, "Stage");
}

fn validate_inputs(content: &str, platform: &str) -> Result<(), BrandCheckError> {
    if content.trim().is_empty() {
        return Err(BrandCheckError::InvalidRequest(
            "Content cannot be empty".to_string(),
        ));
    }
    if platform.trim().is_empty() {
        return Err(BrandCheckError::InvalidRequest(
            "Platform cannot be empty".to_string(),
        ));
    }
    Ok(())
}
