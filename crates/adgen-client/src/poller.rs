//! Adaptive status poller.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use adgen_models::JobStatus;

use crate::error::{ClientError, ClientResult};

/// The adaptive schedule: reads start quickly while a render is likely to
/// finish, then back off as it ages.
#[derive(Debug, Clone)]
pub struct PollSchedule {
    /// Delay before the first read
    pub initial_delay: Duration,
    /// Interval for the first three minutes
    pub fast_interval: Duration,
    /// Interval from three to ten minutes
    pub medium_interval: Duration,
    /// Interval after ten minutes
    pub slow_interval: Duration,
    /// Hard cap on total polls before giving up
    pub max_polls: u32,
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(10),
            fast_interval: Duration::from_secs(15),
            medium_interval: Duration::from_secs(30),
            slow_interval: Duration::from_secs(60),
            max_polls: 60,
        }
    }
}

impl PollSchedule {
    /// Interval to wait before the next read, given how long polling has
    /// been going on.
    pub fn interval_after(&self, elapsed: Duration) -> Duration {
        if elapsed < Duration::from_secs(3 * 60) {
            self.fast_interval
        } else if elapsed < Duration::from_secs(10 * 60) {
            self.medium_interval
        } else {
            self.slow_interval
        }
    }
}

/// One status read, mirroring the `/job-status` response body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusView {
    pub job_id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub credits_used: Option<i32>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl JobStatusView {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// HTTP client for the status endpoint.
pub struct StatusClient {
    http: reqwest::Client,
    base_url: String,
    schedule: PollSchedule,
}

impl StatusClient {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            schedule: PollSchedule::default(),
        })
    }

    pub fn with_schedule(mut self, schedule: PollSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Single status read.
    pub async fn get_status(&self, job_id: &str) -> ClientResult<JobStatusView> {
        let url = format!("{}/jobs/{job_id}", self.base_url.trim_end_matches('/'));
        let response = self.http.get(&url).send().await?;

        match response.status().as_u16() {
            200 => Ok(response.json().await?),
            404 => Err(ClientError::NotFound(job_id.to_string())),
            status => Err(ClientError::Api {
                status,
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }

    /// Poll until the job reaches a terminal status.
    ///
    /// Transient read errors are swallowed and retried on the next tick;
    /// the schedule keeps advancing either way.
    pub async fn poll_until_terminal(&self, job_id: &str) -> ClientResult<JobStatusView> {
        tokio::time::sleep(self.schedule.initial_delay).await;
        let started = std::time::Instant::now();

        for _poll in 0..self.schedule.max_polls {
            match self.get_status(job_id).await {
                Ok(view) if view.is_terminal() => {
                    debug!(job_id, status = %view.status, "Job reached terminal status");
                    return Ok(view);
                }
                Ok(view) => {
                    debug!(job_id, status = %view.status, "Job still in flight");
                }
                Err(e) if e.is_transient() => {
                    warn!(job_id, error = %e, "Transient status read failure, retrying");
                }
                Err(e) => return Err(e),
            }

            tokio::time::sleep(self.schedule.interval_after(started.elapsed())).await;
        }

        Err(ClientError::Exhausted(self.schedule.max_polls))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_tiers() {
        let schedule = PollSchedule::default();
        assert_eq!(schedule.initial_delay, Duration::from_secs(10));
        assert_eq!(
            schedule.interval_after(Duration::from_secs(0)),
            Duration::from_secs(15)
        );
        assert_eq!(
            schedule.interval_after(Duration::from_secs(179)),
            Duration::from_secs(15)
        );
        assert_eq!(
            schedule.interval_after(Duration::from_secs(180)),
            Duration::from_secs(30)
        );
        assert_eq!(
            schedule.interval_after(Duration::from_secs(599)),
            Duration::from_secs(30)
        );
        assert_eq!(
            schedule.interval_after(Duration::from_secs(600)),
            Duration::from_secs(60)
        );
        assert_eq!(
            schedule.interval_after(Duration::from_secs(3600)),
            Duration::from_secs(60)
        );
    }

    #[test]
    fn test_status_view_terminal_detection() {
        let view: JobStatusView = serde_json::from_str(
            r#"{"jobId":"j1","status":"completed","videoUrl":"https://v/1.mp4"}"#,
        )
        .unwrap();
        assert!(view.is_terminal());
        assert_eq!(view.video_url.as_deref(), Some("https://v/1.mp4"));

        let view: JobStatusView =
            serde_json::from_str(r#"{"jobId":"j1","status":"rendering"}"#).unwrap();
        assert!(!view.is_terminal());
    }
}
