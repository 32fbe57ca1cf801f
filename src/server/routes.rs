use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{BrandCheckError, ErrorKind};
use crate::models::{AnalysisResult, ContentRecommendation};
use crate::providers::{ProviderId, ProviderStatus};
use crate::server::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnalyzeRequest {
    pub content: String,
    pub platform: String,
    pub provider: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RecommendRequest {
    pub content: String,
    pub platform: String,
    pub analysis: Option<AnalysisResult>,
    pub provider: Option<String>,
}

/// Error response: `{"error": message, "kind": classification}`.
#[derive(Debug)]
pub struct ApiError(pub BrandCheckError);

impl From<BrandCheckError> for ApiError {
    fn from(err: BrandCheckError) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(BrandCheckError::InvalidRequest(rejection.body_text()))
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorKind::ProviderNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::ProviderInvocation | ErrorKind::UnparsableResponse => StatusCode::BAD_GATEWAY,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = status_for(kind);
        if status.is_server_error() {
            tracing::error!(error = %self.0, kind = kind.as_str(), "Request failed");
        } else {
            tracing::warn!(error = %self.0, kind = kind.as_str(), "Request rejected");
        }

        (
            status,
            Json(json!({ "error": self.0.to_string(), "kind": kind })),
        )
            .into_response()
    }
}

/// Missing provider means the default; an unknown name is the caller's
/// mistake, not a server fault.
fn resolve_provider(provider: Option<&str>) -> Result<ProviderId, ApiError> {
    match provider.map(str::trim).filter(|p| !p.is_empty()) {
        None => Ok(ProviderId::default()),
        Some(name) => name.parse::<ProviderId>().map_err(|e| {
            ApiError(BrandCheckError::InvalidRequest(match e {
                BrandCheckError::ConfigError(message) => message,
                other => other.to_string(),
            }))
        }),
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn list_providers(State(state): State<AppState>) -> Json<Vec<ProviderStatus>> {
    Json(state.orchestrator.registry().statuses())
}

pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Json(request) = payload?;
    let provider = resolve_provider(request.provider.as_deref())?;

    let analysis = state
        .orchestrator
        .run_analysis(&request.content, &request.platform, provider)
        .await?;
    Ok(Json(analysis))
}

pub async fn recommend(
    State(state): State<AppState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<Vec<ContentRecommendation>>, ApiError> {
    let Json(request) = payload?;
    let provider = resolve_provider(request.provider.as_deref())?;

    let recommendations = state
        .orchestrator
        .run_recommendations(
            &request.content,
            &request.platform,
            request.analysis.as_ref(),
            provider,
        )
        .await?;
    Ok(Json(recommendations))
}
