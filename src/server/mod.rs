pub mod routes;

use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::analyzer::AnalysisOrchestrator;
use crate::error::BrandCheckError;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<AnalysisOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: AnalysisOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health))
        .route("/api/providers", get(routes::list_providers))
        .route("/api/analyze", post(routes::analyze))
        .route("/api/recommendations", post(routes::recommend))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serves until Ctrl-C.
pub async fn serve(state: AppState, bind: SocketAddr) -> Result<(), BrandCheckError> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    let local_addr = listener.local_addr()?;

    for status in state.orchestrator.registry().statuses() {
        tracing::info!(
            provider = %status.id,
            model = %status.model,
            configured = status.configured,
            "Provider status"
        );
    }
    tracing::info!(addr = %local_addr, "HTTP server listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            signal::ctrl_c().await.ok();
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
