//! Worker configuration.

use std::time::Duration;

/// Rate-limit caller name for the submit worker.
pub const SUBMIT_CALLER: &str = "submit-worker";

/// Rate-limit caller name for the poll worker.
pub const POLL_CALLER: &str = "poll-worker";

/// Configuration shared by both workers.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Max pending jobs considered per submit run
    pub submit_batch: usize,
    /// Max active jobs considered per poll run
    pub poll_batch: usize,
    /// Rate-limit API name both callers draw against
    pub rate_limit_api: String,
    /// Interval between scheduler ticks (floor of 60s, cron granularity)
    pub tick_interval: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            submit_batch: 5,
            poll_batch: 10,
            rate_limit_api: "creatify".to_string(),
            tick_interval: Duration::from_secs(60),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let tick_secs: u64 = std::env::var("WORKER_TICK_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);

        Self {
            submit_batch: std::env::var("SUBMIT_BATCH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            poll_batch: std::env::var("POLL_BATCH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            rate_limit_api: std::env::var("RATE_LIMIT_API")
                .unwrap_or_else(|_| "creatify".to_string()),
            // Cron granularity is one minute; never tick faster
            tick_interval: Duration::from_secs(tick_secs.max(60)),
        }
    }
}
