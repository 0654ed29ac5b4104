//! API Module
//!
//! HTTP handlers and routing for the recommendation service.
//!
//! # Endpoints
//! - `POST /recommend` - Recommend tracks for a chat message
//! - `GET /stats/:identity` - Rate-limit window and totals for a user
//! - `GET /cache/stats` - Lookup and extraction cache statistics
//! - `GET /metrics` - Service counters and recent provider failures
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
