//! Spotify recommendations lookup.
//!
//! Authenticates with the client-credentials flow and keeps the access
//! token in a single-slot [`SharedCache`] so it expires on its own.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cache::SharedCache;
use crate::collaborators::{check_status, RecommendationLookup};
use crate::error::CollaboratorError;
use crate::models::Track;
use crate::seed::SeedSpec;

/// Tokens live an hour; refresh a little early
const TOKEN_TTL: Duration = Duration::from_secs(3500);
const TOKEN_KEY: &str = "access_token";

// == Config ==
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub market: String,
    pub limit: u32,
    /// Seed used when no keyword mapped to a genre
    pub default_genre: String,
    pub api_base: String,
    pub accounts_base: String,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            market: "US".to_string(),
            limit: 5,
            default_genre: "pop".to_string(),
            api_base: "https://api.spotify.com/v1".to_string(),
            accounts_base: "https://accounts.spotify.com/api".to_string(),
        }
    }
}

// == Wire Types ==
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationsResponse {
    #[serde(default)]
    tracks: Vec<ApiTrack>,
}

#[derive(Debug, Deserialize)]
struct ApiTrack {
    name: String,
    #[serde(default)]
    artists: Vec<ApiArtist>,
    album: ApiAlbum,
    #[serde(default)]
    external_urls: ExternalUrls,
    #[serde(default)]
    popularity: u32,
    #[serde(default)]
    duration_ms: u64,
    preview_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiAlbum {
    name: String,
    release_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ExternalUrls {
    #[serde(default)]
    spotify: String,
}

// == Lookup ==
pub struct SpotifyLookup {
    client: reqwest::Client,
    config: SpotifyConfig,
    token_cache: SharedCache<String>,
    /// Keeps concurrent misses from fetching several tokens at once
    token_lock: Mutex<()>,
}

impl SpotifyLookup {
    pub fn new(config: SpotifyConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            token_cache: SharedCache::new(1, TOKEN_TTL),
            token_lock: Mutex::new(()),
        }
    }

    async fn access_token(&self) -> Result<String, CollaboratorError> {
        if let Some(token) = self.token_cache.get(TOKEN_KEY).await {
            return Ok(token);
        }

        let _guard = self.token_lock.lock().await;
        // Another task may have refreshed it while we waited
        if let Some(token) = self.token_cache.get(TOKEN_KEY).await {
            return Ok(token);
        }

        let response = self
            .client
            .post(format!("{}/token", self.config.accounts_base))
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;
        let response = check_status("spotify-auth", response).await?;
        let token: TokenResponse = response.json().await?;

        info!("Obtained catalog access token");
        self.token_cache
            .set(TOKEN_KEY, token.access_token.clone())
            .await;
        Ok(token.access_token)
    }
}

#[async_trait]
impl RecommendationLookup for SpotifyLookup {
    async fn lookup(&self, seed: &SeedSpec) -> Result<Vec<Track>, CollaboratorError> {
        let token = self.access_token().await?;
        let query = recommendation_query(seed, &self.config);

        let response = self
            .client
            .get(format!("{}/recommendations", self.config.api_base))
            .bearer_auth(token)
            .query(&query)
            .send()
            .await?;

        let response = match check_status("spotify", response).await {
            Ok(response) => response,
            Err(CollaboratorError::Unauthorized) => {
                // Force a fresh token on the next attempt
                self.token_cache.clear().await;
                return Err(CollaboratorError::Unauthorized);
            }
            Err(err) => return Err(err),
        };

        let body: RecommendationsResponse = response.json().await?;
        let tracks = parse_tracks(body);
        debug!(count = tracks.len(), "Catalog returned tracks");
        Ok(tracks)
    }
}

// == Query Building ==
/// Query parameters for the recommendations endpoint.
///
/// Falls back to the configured default genre when the seed has none,
/// since the endpoint requires at least one seed.
pub fn recommendation_query(seed: &SeedSpec, config: &SpotifyConfig) -> Vec<(String, String)> {
    let genres = if seed.genres.is_empty() {
        config.default_genre.clone()
    } else {
        seed.genres.join(",")
    };

    let mut params = vec![
        ("limit".to_string(), config.limit.to_string()),
        ("market".to_string(), config.market.clone()),
        ("seed_genres".to_string(), genres),
    ];

    for (name, feature) in seed.features() {
        params.push((format!("target_{}", name), feature.target.to_string()));
        if let Some(min) = feature.min {
            params.push((format!("min_{}", name), min.to_string()));
        }
        if let Some(max) = feature.max {
            params.push((format!("max_{}", name), max.to_string()));
        }
    }

    params
}

/// Projects the catalog payload onto [`Track`] values.
pub fn parse_tracks(response: RecommendationsResponse) -> Vec<Track> {
    response
        .tracks
        .into_iter()
        .map(|track| {
            let artist = track
                .artists
                .into_iter()
                .next()
                .map(|a| a.name)
                .unwrap_or_else(|| "Unknown Artist".to_string());

            Track::new(
                track.name,
                artist,
                track.album.name,
                track.external_urls.spotify,
                track.popularity,
                track.duration_ms,
            )
            .with_preview_url(track.preview_url)
            .with_release_date(track.album.release_date)
        })
        .collect()
}
