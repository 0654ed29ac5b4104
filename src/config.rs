//! Configuration Module
//!
//! Loads service settings from environment variables and converts them into
//! the per-component configs.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::collaborators::{OpenRouterConfig, RetryPolicy, SpotifyConfig};
use crate::orchestrator::OrchestratorConfig;
use crate::rate_limit::RateLimitConfig;

/// Service configuration.
///
/// Every value can be set through an environment variable; anything
/// missing or unparsable falls back to its default.
#[derive(Debug, Clone)]
pub struct Config {
    // Cache
    pub cache_max_size: usize,
    pub lookup_cache_ttl: u64,
    pub extraction_cache_ttl: u64,
    pub cache_cleanup_interval: u64,

    // Rate limiting
    pub max_requests_per_minute: usize,
    pub rate_limit_window: u64,
    pub burst_limit: usize,
    pub burst_window: u64,

    // Provider calls
    pub api_timeout: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,

    // Behavior
    pub fallback_extraction: bool,
    pub serialize_per_user: bool,

    pub server_port: u16,

    // Providers
    pub openrouter_api_key: String,
    pub openrouter_model: String,
    pub openrouter_max_tokens: u32,
    pub openrouter_temperature: f32,
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub spotify_market: String,
    pub spotify_recommendation_limit: u32,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

fn env_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_SIZE` - Entries per cache (default: 1000)
    /// - `LOOKUP_CACHE_TTL` - Lookup cache TTL in seconds (default: 1800)
    /// - `EXTRACTION_CACHE_TTL` - Extraction cache TTL in seconds (default: 3600)
    /// - `CACHE_CLEANUP_INTERVAL` - Seconds between cache clears (default: 3600)
    /// - `MAX_REQUESTS_PER_MINUTE` - Requests per window (default: 15)
    /// - `RATE_LIMIT_WINDOW` - Window length in seconds (default: 60)
    /// - `BURST_LIMIT` - Requests per burst window, 0 disables (default: 5)
    /// - `BURST_WINDOW` - Burst window in seconds (default: 10)
    /// - `API_TIMEOUT` - Per-attempt timeout in seconds (default: 30)
    /// - `MAX_RETRIES` - Attempts per provider call (default: 3)
    /// - `RETRY_DELAY_MS` - Base backoff delay (default: 1000)
    /// - `FALLBACK_EXTRACTION` - Heuristic keywords on extractor failure (default: true)
    /// - `SERIALIZE_PER_USER` - Queue requests per user (default: true)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `OPENROUTER_*`, `SPOTIFY_*` - Provider credentials and settings
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            cache_max_size: env_or("CACHE_MAX_SIZE", defaults.cache_max_size),
            lookup_cache_ttl: env_or("LOOKUP_CACHE_TTL", defaults.lookup_cache_ttl),
            extraction_cache_ttl: env_or("EXTRACTION_CACHE_TTL", defaults.extraction_cache_ttl),
            cache_cleanup_interval: env_or(
                "CACHE_CLEANUP_INTERVAL",
                defaults.cache_cleanup_interval,
            ),
            max_requests_per_minute: env_or(
                "MAX_REQUESTS_PER_MINUTE",
                defaults.max_requests_per_minute,
            ),
            rate_limit_window: env_or("RATE_LIMIT_WINDOW", defaults.rate_limit_window),
            burst_limit: env_or("BURST_LIMIT", defaults.burst_limit),
            burst_window: env_or("BURST_WINDOW", defaults.burst_window),
            api_timeout: env_or("API_TIMEOUT", defaults.api_timeout),
            max_retries: env_or("MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("RETRY_DELAY_MS", defaults.retry_delay_ms),
            fallback_extraction: env_flag("FALLBACK_EXTRACTION", defaults.fallback_extraction),
            serialize_per_user: env_flag("SERIALIZE_PER_USER", defaults.serialize_per_user),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            openrouter_api_key: env_string("OPENROUTER_API_KEY", ""),
            openrouter_model: env_string("OPENROUTER_MODEL", &defaults.openrouter_model),
            openrouter_max_tokens: env_or("OPENROUTER_MAX_TOKENS", defaults.openrouter_max_tokens),
            openrouter_temperature: env_or(
                "OPENROUTER_TEMPERATURE",
                defaults.openrouter_temperature,
            ),
            spotify_client_id: env_string("SPOTIFY_CLIENT_ID", ""),
            spotify_client_secret: env_string("SPOTIFY_CLIENT_SECRET", ""),
            spotify_market: env_string("SPOTIFY_MARKET", &defaults.spotify_market),
            spotify_recommendation_limit: env_or(
                "SPOTIFY_RECOMMENDATION_LIMIT",
                defaults.spotify_recommendation_limit,
            ),
        }
    }

    // == Validation ==
    /// Lists settings that are missing or unusable. Empty means usable.
    ///
    /// Zero-length intervals and windows are rejected: they would spin the
    /// maintenance loop or make the rate limiter refuse everything.
    pub fn validate(&self) -> Vec<&'static str> {
        let mut invalid = Vec::new();
        if self.openrouter_api_key.trim().is_empty() {
            invalid.push("OPENROUTER_API_KEY");
        }
        if self.spotify_client_id.trim().is_empty() {
            invalid.push("SPOTIFY_CLIENT_ID");
        }
        if self.spotify_client_secret.trim().is_empty() {
            invalid.push("SPOTIFY_CLIENT_SECRET");
        }
        if self.cache_cleanup_interval == 0 {
            invalid.push("CACHE_CLEANUP_INTERVAL");
        }
        if self.max_requests_per_minute == 0 {
            invalid.push("MAX_REQUESTS_PER_MINUTE");
        }
        if self.rate_limit_window == 0 {
            invalid.push("RATE_LIMIT_WINDOW");
        }
        if self.burst_limit > 0 && self.burst_window == 0 {
            invalid.push("BURST_WINDOW");
        }
        if self.api_timeout == 0 {
            invalid.push("API_TIMEOUT");
        }
        invalid
    }

    // == Component Configs ==
    pub fn lookup_cache(&self) -> CacheConfig {
        CacheConfig::new(self.cache_max_size, Duration::from_secs(self.lookup_cache_ttl))
    }

    pub fn extraction_cache(&self) -> CacheConfig {
        CacheConfig::new(
            self.cache_max_size,
            Duration::from_secs(self.extraction_cache_ttl),
        )
    }

    pub fn rate_limit(&self) -> RateLimitConfig {
        RateLimitConfig {
            max_requests: self.max_requests_per_minute,
            window: Duration::from_secs(self.rate_limit_window),
            burst_limit: self.burst_limit,
            burst_window: Duration::from_secs(self.burst_window),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_retries.max(1),
            base_delay: Duration::from_millis(self.retry_delay_ms),
            timeout: Duration::from_secs(self.api_timeout),
            ..RetryPolicy::default()
        }
    }

    pub fn orchestrator(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            retry: self.retry_policy(),
            fallback_extraction: self.fallback_extraction,
            serialize_per_user: self.serialize_per_user,
        }
    }

    pub fn openrouter(&self) -> OpenRouterConfig {
        OpenRouterConfig {
            api_key: self.openrouter_api_key.clone(),
            model: self.openrouter_model.clone(),
            max_tokens: self.openrouter_max_tokens,
            temperature: self.openrouter_temperature,
            ..OpenRouterConfig::default()
        }
    }

    pub fn spotify(&self) -> SpotifyConfig {
        SpotifyConfig {
            client_id: self.spotify_client_id.clone(),
            client_secret: self.spotify_client_secret.clone(),
            market: self.spotify_market.clone(),
            limit: self.spotify_recommendation_limit,
            ..SpotifyConfig::default()
        }
    }

    /// Never shorter than one second.
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cache_cleanup_interval.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        let openrouter = OpenRouterConfig::default();
        let spotify = SpotifyConfig::default();

        Self {
            cache_max_size: 1000,
            lookup_cache_ttl: 1800,
            extraction_cache_ttl: 3600,
            cache_cleanup_interval: 3600,
            max_requests_per_minute: 15,
            rate_limit_window: 60,
            burst_limit: 5,
            burst_window: 10,
            api_timeout: 30,
            max_retries: 3,
            retry_delay_ms: 1000,
            fallback_extraction: true,
            serialize_per_user: true,
            server_port: 3000,
            openrouter_api_key: String::new(),
            openrouter_model: openrouter.model,
            openrouter_max_tokens: openrouter.max_tokens,
            openrouter_temperature: openrouter.temperature,
            spotify_client_id: String::new(),
            spotify_client_secret: String::new(),
            spotify_market: spotify.market,
            spotify_recommendation_limit: spotify.limit,
        }
    }
}
