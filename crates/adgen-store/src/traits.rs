//! Store seams.
//!
//! Workers and handlers depend on these traits rather than on a concrete
//! backend, so tests can run against the in-memory implementations.

use async_trait::async_trait;

use adgen_models::{JobId, JobPatch, VideoJob};

use crate::error::StoreResult;

/// Durable job records.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a freshly created job (intake writes `pending` rows only).
    async fn insert(&self, job: &VideoJob) -> StoreResult<()>;

    /// Up to `limit` rows awaiting submission, oldest `created_at` first.
    /// Matches legacy `created` rows as well as `pending`.
    async fn select_pending(&self, limit: i64) -> StoreResult<Vec<VideoJob>>;

    /// Up to `limit` rows in flight with the provider
    /// (`submitted`/`queued`/`rendering`), oldest `updated_at` first so no
    /// job starves under a bounded batch.
    async fn select_active(&self, limit: i64) -> StoreResult<Vec<VideoJob>>;

    /// Apply a patch. Always bumps `updated_at`; stamps `completed_at`
    /// exactly when the patch moves the job to `completed`. Refuses to
    /// touch terminal rows.
    async fn update(&self, id: &JobId, patch: JobPatch) -> StoreResult<VideoJob>;

    /// Direct read by id.
    async fn get(&self, id: &JobId) -> StoreResult<Option<VideoJob>>;

    /// All jobs for one user, newest first.
    async fn list_by_user(&self, user_id: &str, limit: i64) -> StoreResult<Vec<VideoJob>>;
}

/// Atomic rate-limit slot grants.
#[async_trait]
pub trait SlotLimiter: Send + Sync {
    /// Grant up to `requested` call slots from the `(api, caller)` window.
    ///
    /// Executes as one serializable step: under concurrent callers the sum
    /// of grants within a window never exceeds the configured ceiling.
    /// Returns 0 when the bucket row does not exist or the window is
    /// exhausted.
    async fn acquire_slots(&self, api: &str, caller: &str, requested: u32) -> StoreResult<u32>;
}
