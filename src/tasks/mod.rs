//! Background Tasks Module
//!
//! Tasks that run on their own schedule for the lifetime of the server.
//!
//! # Tasks
//! - Maintenance: clears both caches and purges idle rate-limit windows
//! - Metrics log: periodic summary of cache and service metrics

mod maintenance;
mod metrics_log;

pub use maintenance::{run_maintenance, spawn_maintenance_task};
pub use metrics_log::{log_metrics, spawn_metrics_task, METRICS_LOG_INTERVAL};
