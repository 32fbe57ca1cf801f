use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::analyzer::llm_client::LlmProvider;
use crate::error::BrandCheckError;
use crate::providers::{send_json, ProviderConfig, ProviderId};

/// Google Generative Language (`generateContent`) backend.
pub struct GeminiProvider {
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl LlmProvider for GeminiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    fn complete<'a>(
        &'a self,
        config: &'a ProviderConfig,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, BrandCheckError>> {
        Box::pin(async move {
            let body = GenerateRequest {
                contents: [Content {
                    role: "user",
                    parts: [Part { text: prompt }],
                }],
                generation_config: GenerationConfig {
                    max_output_tokens: config.max_tokens,
                    temperature: config.temperature,
                },
            };

            let path = format!("/v1beta/models/{}:generateContent", config.model);
            let request = self
                .client
                .post(config.endpoint(&path))
                .header("x-goog-api-key", config.api_key().unwrap_or_default())
                .json(&body);

            let response: GenerateResponse = send_json(ProviderId::Gemini, request).await?;

            let Some(candidate) = response.candidates.into_iter().next() else {
                let message = match response
                    .prompt_feedback
                    .and_then(|feedback| feedback.block_reason)
                {
                    Some(reason) => format!("prompt was blocked: {}", reason),
                    None => "response contained no candidates".to_string(),
                };
                return Err(BrandCheckError::invocation(ProviderId::Gemini, None, message));
            };

            let text: String = candidate
                .content
                .map(|content| content.parts)
                .unwrap_or_default()
                .into_iter()
                .filter_map(|part| part.text)
                .collect();

            if text.trim().is_empty() {
                return Err(BrandCheckError::invocation(
                    ProviderId::Gemini,
                    None,
                    format!(
                        "empty completion (finish_reason: {})",
                        candidate.finish_reason.as_deref().unwrap_or("unknown")
                    ),
                ));
            }

            Ok(text)
        })
    }
}
