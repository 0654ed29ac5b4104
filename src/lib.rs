//! moodtunes - Mood-driven music recommendations
//!
//! Turns free-text chat messages into track recommendations by chaining a
//! keyword extractor and a catalog lookup, behind a TTL/LRU cache and a
//! sliding-window rate limiter.

pub mod api;
pub mod cache;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod rate_limit;
pub mod seed;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use orchestrator::{Orchestrator, OrchestratorConfig, Outcome, ServiceState};
pub use tasks::{spawn_maintenance_task, spawn_metrics_task};
