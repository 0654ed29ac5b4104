//! Domain and transport models
//!
//! Tracks returned by the catalog plus the DTOs used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;
mod track;

/// Chat-platform user identifier
pub type UserId = u64;

// Re-export commonly used types
pub use requests::RecommendRequest;
pub use responses::{CacheStatsResponse, ErrorResponse, HealthResponse, MetricsResponse};
pub use track::Track;
