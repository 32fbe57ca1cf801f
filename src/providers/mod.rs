//! LLM backends and the registry that maps provider ids to them.
//!
//! Each backend speaks its vendor's native HTTP API and returns only the
//! completion text; the invoker in `analyzer::llm_client` adds timeouts
//! and configuration checks on top.

pub mod anthropic;
pub mod gemini;
pub mod openai;
pub mod registry;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use registry::{ProviderConfig, ProviderRegistry, ProviderStatus};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::BrandCheckError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Anthropic,
    OpenAi,
    Gemini,
}

impl ProviderId {
    pub const ALL: [ProviderId; 3] = [ProviderId::Anthropic, ProviderId::OpenAi, ProviderId::Gemini];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Anthropic => "anthropic",
            ProviderId::OpenAi => "openai",
            ProviderId::Gemini => "gemini",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderId::Anthropic => "Anthropic",
            ProviderId::OpenAi => "OpenAI",
            ProviderId::Gemini => "Google Gemini",
        }
    }

    /// Environment variable holding the API key.
    pub fn credential_env(&self) -> &'static str {
        match self {
            ProviderId::Anthropic => "ANTHROPIC_API_KEY",
            ProviderId::OpenAi => "OPENAI_API_KEY",
            ProviderId::Gemini => "GOOGLE_GENERATIVE_AI_API_KEY",
        }
    }

    pub fn model_env(&self) -> &'static str {
        match self {
            ProviderId::Anthropic => "BRANDCHECK_ANTHROPIC_MODEL",
            ProviderId::OpenAi => "BRANDCHECK_OPENAI_MODEL",
            ProviderId::Gemini => "BRANDCHECK_GEMINI_MODEL",
        }
    }

    pub fn base_url_env(&self) -> &'static str {
        match self {
            ProviderId::Anthropic => "ANTHROPIC_BASE_URL",
            ProviderId::OpenAi => "OPENAI_BASE_URL",
            ProviderId::Gemini => "GEMINI_BASE_URL",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderId::Anthropic => "claude-3-7-sonnet-latest",
            ProviderId::OpenAi => "gpt-4o",
            ProviderId::Gemini => "gemini-2.5-pro",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderId::Anthropic => "https://api.anthropic.com",
            ProviderId::OpenAi => "https://api.openai.com",
            ProviderId::Gemini => "https://generativelanguage.googleapis.com",
        }
    }
}

impl Default for ProviderId {
    fn default() -> Self {
        ProviderId::Anthropic
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = BrandCheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ProviderId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == wanted)
            .ok_or_else(|| {
                BrandCheckError::ConfigError(format!(
                    "Unsupported provider '{}'. Use one of: anthropic, openai, gemini",
                    s
                ))
            })
    }
}

/// Sends a prepared request and decodes the vendor's response envelope.
///
/// Transport failures, non-2xx statuses and undecodable bodies all become
/// `ProviderInvocation` errors tagged with `provider`.
pub(crate) async fn send_json<T: DeserializeOwned>(
    provider: ProviderId,
    request: reqwest::RequestBuilder,
) -> Result<T, BrandCheckError> {
    let resp = request.send().await.map_err(|e| {
        BrandCheckError::invocation(provider, None, format!("request failed: {}", e))
    })?;

    let status = resp.status();
    let body = resp.text().await.map_err(|e| {
        BrandCheckError::invocation(
            provider,
            Some(status.as_u16()),
            format!("failed to read response body: {}", e),
        )
    })?;

    if !status.is_success() {
        tracing::error!(
            provider = %provider,
            status = %status,
            "Provider request failed"
        );
        tracing::debug!(provider = %provider, body = %body, "Provider error body");

        let message = upstream_error_message(&body).unwrap_or_else(|| truncate(&body, 300));
        return Err(BrandCheckError::invocation(
            provider,
            Some(status.as_u16()),
            format!("HTTP {}: {}", status.as_u16(), message),
        ));
    }

    serde_json::from_str(&body).map_err(|e| {
        BrandCheckError::invocation(
            provider,
            Some(status.as_u16()),
            format!("malformed response envelope: {}", e),
        )
    })
}

/// Pulls the human-readable message out of a vendor error envelope.
/// All three vendors nest it as `{"error": {"message": ...}}`.
fn upstream_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;
    match error {
        Value::String(message) => Some(message.clone()),
        Value::Object(_) => error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(max_chars).collect();
    format!("{}...", cut)
}
