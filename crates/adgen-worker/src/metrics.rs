//! Worker batch metrics.

use metrics::counter;

/// Metric name constants for consistency.
pub mod names {
    pub const JOBS_SUBMITTED_TOTAL: &str = "adgen_jobs_submitted_total";
    pub const JOBS_COMPLETED_TOTAL: &str = "adgen_jobs_completed_total";
    pub const JOBS_FAILED_TOTAL: &str = "adgen_jobs_failed_total";
    pub const JOBS_POLLED_TOTAL: &str = "adgen_jobs_polled_total";
    pub const RATE_LIMITED_RUNS_TOTAL: &str = "adgen_rate_limited_runs_total";
    pub const PROVIDER_429_TOTAL: &str = "adgen_provider_429_total";
}

pub fn record_submitted(count: u32) {
    counter!(names::JOBS_SUBMITTED_TOTAL).increment(count as u64);
}

pub fn record_completed(count: u32) {
    counter!(names::JOBS_COMPLETED_TOTAL).increment(count as u64);
}

pub fn record_failed(worker: &str, count: u32) {
    counter!(names::JOBS_FAILED_TOTAL, "worker" => worker.to_string()).increment(count as u64);
}

pub fn record_polled(count: u32) {
    counter!(names::JOBS_POLLED_TOTAL).increment(count as u64);
}

pub fn record_rate_limited_run(worker: &str) {
    counter!(names::RATE_LIMITED_RUNS_TOTAL, "worker" => worker.to_string()).increment(1);
}

pub fn record_provider_429(worker: &str) {
    counter!(names::PROVIDER_429_TOTAL, "worker" => worker.to_string()).increment(1);
}
