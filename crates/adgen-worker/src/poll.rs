//! Poll worker: advances in-flight renders to terminal states.

use std::sync::Arc;

use tracing::{info, warn};

use adgen_models::{JobPatch, JobStatus};
use adgen_provider::VideoProvider;
use adgen_store::{JobStore, SlotLimiter};

use crate::config::{WorkerConfig, POLL_CALLER};
use crate::error::WorkerResult;
use crate::metrics;
use crate::report::PollReport;

/// One cron invocation's worth of status polls.
///
/// `select_active` orders by `updated_at` ascending, so a polled job moves
/// to the tail and every active job gets a turn within
/// `ceil(active / batch)` ticks.
pub struct PollWorker {
    store: Arc<dyn JobStore>,
    limiter: Arc<dyn SlotLimiter>,
    provider: Arc<dyn VideoProvider>,
    config: WorkerConfig,
}

impl PollWorker {
    pub fn new(
        store: Arc<dyn JobStore>,
        limiter: Arc<dyn SlotLimiter>,
        provider: Arc<dyn VideoProvider>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            store,
            limiter,
            provider,
            config,
        }
    }

    /// Run a single bounded batch.
    pub async fn run_once(&self) -> WorkerResult<PollReport> {
        let candidates = self
            .store
            .select_active(self.config.poll_batch as i64)
            .await?;

        if candidates.is_empty() {
            return Ok(PollReport::idle());
        }

        let granted = self
            .limiter
            .acquire_slots(
                &self.config.rate_limit_api,
                POLL_CALLER,
                candidates.len() as u32,
            )
            .await?;

        if granted == 0 {
            info!(
                active = candidates.len(),
                "Poll window exhausted, deferring batch"
            );
            metrics::record_rate_limited_run(POLL_CALLER);
            return Ok(PollReport::rate_limited());
        }

        let mut polled = 0u32;
        let mut completed = 0u32;
        let mut failed = 0u32;

        for job in candidates.into_iter().take(granted as usize) {
            let Some(provider_job_id) = job.provider_job_id.as_deref() else {
                // Active without a provider id should be impossible; leave
                // the row alone rather than guessing.
                warn!(job_id = %job.id, status = %job.status, "Active job missing provider id, skipping");
                continue;
            };

            match self.provider.check_job_status(provider_job_id).await {
                Ok(status) => {
                    let mut patch = JobPatch::default().with_status(status.status);
                    if let Some(url) = status.video_url {
                        patch = patch.with_video_url(url);
                    }
                    if let Some(url) = status.thumbnail_url {
                        patch = patch.with_thumbnail_url(url);
                    }
                    if let Some(credits) = status.credits_used {
                        patch = patch.with_credits_used(credits);
                    }
                    if let Some(msg) = status.error_message {
                        patch = patch.with_error_message(msg);
                    }

                    self.store.update(&job.id, patch).await?;
                    polled += 1;

                    match status.status {
                        JobStatus::Completed => {
                            info!(job_id = %job.id, "Render completed");
                            completed += 1;
                        }
                        JobStatus::Failed => {
                            info!(job_id = %job.id, "Render failed upstream");
                            failed += 1;
                        }
                        _ => {}
                    }
                }
                Err(e) => {
                    // Every poll error is transient from this side: the job
                    // keeps its state and is retried next tick.
                    if e.is_rate_limited() {
                        metrics::record_provider_429(POLL_CALLER);
                    }
                    warn!(job_id = %job.id, error = %e, "Status poll failed, will retry next tick");
                }
            }
        }

        metrics::record_polled(polled);
        metrics::record_completed(completed);
        metrics::record_failed(POLL_CALLER, failed);
        info!(polled, completed, failed, slots = granted, "Poll run complete");

        Ok(PollReport {
            polled,
            completed,
            failed,
            slots: granted,
            reason: None,
        })
    }
}
