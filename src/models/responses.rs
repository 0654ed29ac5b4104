//! Response DTOs for the recommendation API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::orchestrator::{ErrorRecord, MetricsSnapshot};

/// Response body for `GET /cache/stats`
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    /// Recommendation lookup cache
    pub lookup: CacheStats,
    /// Keyword extraction cache
    pub extraction: CacheStats,
}

/// Response body for `GET /metrics`
#[derive(Debug, Clone, Serialize)]
pub struct MetricsResponse {
    pub service: MetricsSnapshot,
    /// Most recent provider failures, oldest first
    pub recent_errors: Vec<ErrorRecord>,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }

    #[test]
    fn test_cache_stats_response_serialize() {
        let resp = CacheStatsResponse {
            lookup: CacheStats::default(),
            extraction: CacheStats::default(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json["lookup"].get("utilization").is_some());
        assert!(json["extraction"].get("entries").is_some());
    }
}
