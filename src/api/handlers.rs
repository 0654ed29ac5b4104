//! API Handlers
//!
//! HTTP request handlers for each endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::{ApiError, Result};
use crate::models::{
    CacheStatsResponse, HealthResponse, MetricsResponse, RecommendRequest, UserId,
};
use crate::orchestrator::{IdentityStats, Orchestrator, Outcome};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

/// Maps an outcome to the HTTP status it is served with.
pub fn outcome_status(outcome: &Outcome) -> StatusCode {
    match outcome {
        Outcome::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        Outcome::Failed { .. } => StatusCode::BAD_GATEWAY,
        Outcome::NoKeywords | Outcome::NoResults | Outcome::Success { .. } => StatusCode::OK,
    }
}

/// Handler for POST /recommend
///
/// Runs one message through the orchestrator. The body is always an
/// outcome; only the status code varies.
pub async fn recommend_handler(
    State(state): State<AppState>,
    Json(req): Json<RecommendRequest>,
) -> Result<(StatusCode, Json<Outcome>)> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let outcome = state
        .orchestrator
        .handle_message(req.identity, &req.text)
        .await;

    Ok((outcome_status(&outcome), Json(outcome)))
}

/// Handler for GET /stats/:identity
pub async fn identity_stats_handler(
    State(state): State<AppState>,
    Path(identity): Path<UserId>,
) -> Json<IdentityStats> {
    Json(state.orchestrator.get_stats(identity))
}

/// Handler for GET /cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    Json(CacheStatsResponse {
        lookup: state.orchestrator.get_cache_stats().await,
        extraction: state.orchestrator.extraction_cache_stats().await,
    })
}

/// Handler for GET /metrics
pub async fn metrics_handler(State(state): State<AppState>) -> Json<MetricsResponse> {
    Json(MetricsResponse {
        service: state.orchestrator.metrics(),
        recent_errors: state.orchestrator.recent_errors(),
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
