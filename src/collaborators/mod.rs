//! External Collaborators
//!
//! The two providers the service depends on, as traits, plus the HTTP
//! adapters used in production and the retry policy they share.
//!
//! # Providers
//! - [`KeywordExtractor`]: turns a chat message into music keywords
//! - [`RecommendationLookup`]: turns a [`SeedSpec`] into tracks

mod openrouter;
mod retry;
mod spotify;

use async_trait::async_trait;

use crate::error::CollaboratorError;
use crate::models::Track;
use crate::seed::SeedSpec;

pub use openrouter::{parse_keywords, OpenRouterConfig, OpenRouterExtractor, MAX_EXTRACTED_KEYWORDS};
pub use retry::RetryPolicy;
pub use spotify::{
    parse_tracks, recommendation_query, RecommendationsResponse, SpotifyConfig, SpotifyLookup,
};

/// Extracts music-related keywords from free text.
#[async_trait]
pub trait KeywordExtractor: Send + Sync {
    async fn extract(&self, message: &str) -> Result<Vec<String>, CollaboratorError>;
}

/// Looks up recommended tracks for a seed.
///
/// An empty list is a valid answer, not an error.
#[async_trait]
pub trait RecommendationLookup: Send + Sync {
    async fn lookup(&self, seed: &SeedSpec) -> Result<Vec<Track>, CollaboratorError>;
}

/// Turns a non-success response into an error, consuming the body for the log.
async fn check_status(
    provider: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, CollaboratorError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::error!(provider, status = status.as_u16(), body = %body, "Provider request failed");
    Err(CollaboratorError::from_status(status.as_u16()))
}
