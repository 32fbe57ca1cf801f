use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::analyzer::llm_client::LlmProvider;
use crate::error::BrandCheckError;
use crate::providers::{send_json, ProviderConfig, ProviderId};

const API_VERSION: &str = "2023-06-01";

/// Anthropic Messages API backend.
pub struct AnthropicProvider {
    client: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl LlmProvider for AnthropicProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    fn complete<'a>(
        &'a self,
        config: &'a ProviderConfig,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, BrandCheckError>> {
        Box::pin(async move {
            let body = MessagesRequest {
                model: &config.model,
                max_tokens: config.max_tokens,
                temperature: config.temperature,
                messages: [Message {
                    role: "user",
                    content: prompt,
                }],
            };

            let request = self
                .client
                .post(config.endpoint("/v1/messages"))
                .header("x-api-key", config.api_key().unwrap_or_default())
                .header("anthropic-version", API_VERSION)
                .json(&body);

            let response: MessagesResponse = send_json(ProviderId::Anthropic, request).await?;

            let text: String = response
                .content
                .iter()
                .filter(|block| block.kind == "text")
                .filter_map(|block| block.text.as_deref())
                .collect();

            if text.trim().is_empty() {
                return Err(BrandCheckError::invocation(
                    ProviderId::Anthropic,
                    None,
                    format!(
                        "empty completion (stop_reason: {})",
                        response.stop_reason.as_deref().unwrap_or("unknown")
                    ),
                ));
            }

            if response.stop_reason.as_deref() == Some("max_tokens") {
                tracing::warn!(
                    provider = "anthropic",
                    max_tokens = config.max_tokens,
                    "Completion truncated at the token limit"
                );
            }

            Ok(text)
        })
    }
}
