use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::analyzer::llm_client::LlmProvider;
use crate::error::BrandCheckError;
use crate::providers::{send_json, ProviderConfig, ProviderId};

/// OpenAI Chat Completions backend.
pub struct OpenAiProvider {
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Reasoning models reject `temperature` and take `max_completion_tokens`.
fn is_reasoning_model(model: &str) -> bool {
    let candidate = model.strip_prefix("openai/").unwrap_or(model);
    candidate.starts_with("gpt-5")
        || candidate.starts_with("o1")
        || candidate.starts_with("o3")
        || candidate.starts_with("o4")
}

fn build_request<'a>(config: &'a ProviderConfig, prompt: &'a str) -> ChatRequest<'a> {
    let reasoning = is_reasoning_model(&config.model);
    ChatRequest {
        model: &config.model,
        messages: [ChatMessage {
            role: "user",
            content: prompt,
        }],
        max_tokens: (!reasoning).then_some(config.max_tokens),
        max_completion_tokens: reasoning.then_some(config.max_tokens),
        temperature: (!reasoning).then_some(config.temperature),
    }
}

impl LlmProvider for OpenAiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    fn complete<'a>(
        &'a self,
        config: &'a ProviderConfig,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, BrandCheckError>> {
        Box::pin(async move {
            let request = self
                .client
                .post(config.endpoint("/v1/chat/completions"))
                .bearer_auth(config.api_key().unwrap_or_default())
                .json(&build_request(config, prompt));

            let response: ChatResponse = send_json(ProviderId::OpenAi, request).await?;

            let choice = response.choices.into_iter().next().ok_or_else(|| {
                BrandCheckError::invocation(ProviderId::OpenAi, None, "response contained no choices")
            })?;

            let text = choice.message.content.unwrap_or_default();
            if text.trim().is_empty() {
                return Err(BrandCheckError::invocation(
                    ProviderId::OpenAi,
                    None,
                    format!(
                        "empty completion (finish_reason: {})",
                        choice.finish_reason.as_deref().unwrap_or("unknown")
                    ),
                ));
            }

            Ok(text)
        })
    }
}
