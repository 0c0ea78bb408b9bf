//! Submit worker: promotes pending jobs into provider renders.

use std::sync::Arc;

use tracing::{info, warn};

use adgen_models::JobPatch;
use adgen_provider::VideoProvider;
use adgen_store::{JobStore, SlotLimiter};

use crate::config::{WorkerConfig, SUBMIT_CALLER};
use crate::error::WorkerResult;
use crate::metrics;
use crate::report::SubmitReport;

/// One cron invocation's worth of submissions.
///
/// Slot discipline: the worker first observes its workload, then requests
/// exactly that many slots. Requesting the batch size unconditionally would
/// burn window capacity that polls (or the next run) could have used.
pub struct SubmitWorker {
    store: Arc<dyn JobStore>,
    limiter: Arc<dyn SlotLimiter>,
    provider: Arc<dyn VideoProvider>,
    config: WorkerConfig,
}

impl SubmitWorker {
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
    pub async fn run_once(&self) -> WorkerResult<SubmitReport> {
        let candidates = self
            .store
            .select_pending(self.config.submit_batch as i64)
            .await?;

        if candidates.is_empty() {
            return Ok(SubmitReport::idle());
        }

        let granted = self
            .limiter
            .acquire_slots(
                &self.config.rate_limit_api,
                SUBMIT_CALLER,
                candidates.len() as u32,
            )
            .await?;

        if granted == 0 {
            info!(
                pending = candidates.len(),
                "Submit window exhausted, deferring batch"
            );
            metrics::record_rate_limited_run(SUBMIT_CALLER);
            return Ok(SubmitReport::rate_limited());
        }

        let mut submitted = 0u32;
        let mut failed = 0u32;

        // Sequential on purpose: the grant already reserved the quota, and
        // per-job error isolation stays trivial at this throughput.
        for job in candidates.into_iter().take(granted as usize) {
            match self.provider.create_job(&job.request).await {
                Ok(created) => {
                    info!(
                        job_id = %job.id,
                        provider_job_id = %created.provider_job_id,
                        status = %created.status,
                        "Submitted job to provider"
                    );
                    self.store
                        .update(
                            &job.id,
                            JobPatch::submitted(created.provider_job_id, created.status),
                        )
                        .await?;
                    submitted += 1;
                }
                Err(e) if e.is_rate_limited() => {
                    // Remaining slots are lost for this window; the jobs
                    // stay pending and the next tick picks them up.
                    warn!(job_id = %job.id, "Provider rate limited mid-batch, stopping run");
                    metrics::record_provider_429(SUBMIT_CALLER);
                    break;
                }
                Err(e) => {
                    // No provider id is known, so a blind retry could
                    // double-create; the job is failed with the provider's
                    // message instead (timeouts included).
                    warn!(job_id = %job.id, error = %e, "Submission failed, marking job failed");
                    self.store
                        .update(&job.id, JobPatch::failed(e.to_string()))
                        .await?;
                    failed += 1;
                }
            }
        }

        metrics::record_submitted(submitted);
        metrics::record_failed(SUBMIT_CALLER, failed);
        info!(submitted, failed, slots = granted, "Submit run complete");

        Ok(SubmitReport {
            submitted,
            failed,
            slots: granted,
            reason: None,
        })
    }
}
