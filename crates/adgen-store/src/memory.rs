//! In-memory store implementations.
//!
//! Mirror the Postgres semantics (including terminal immutability and the
//! window grant arithmetic) behind a mutex, for tests and local development
//! without a database.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use adgen_models::{JobId, JobPatch, VideoJob};

use crate::error::{StoreError, StoreResult};
use crate::traits::{JobStore, SlotLimiter};
use crate::window::RateLimitWindow;

/// Job store held in a process-local map.
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: Mutex<HashMap<String, VideoJob>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every job, for test assertions.
    pub fn all(&self) -> Vec<VideoJob> {
        self.jobs.lock().unwrap().values().cloned().collect()
    }

    /// Insert a job bypassing state checks, for test seeding.
    pub fn seed(&self, job: VideoJob) {
        self.jobs.lock().unwrap().insert(job.id.0.clone(), job);
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn insert(&self, job: &VideoJob) -> StoreResult<()> {
        self.jobs
            .lock()
            .unwrap()
            .insert(job.id.0.clone(), job.clone());
        Ok(())
    }

    async fn select_pending(&self, limit: i64) -> StoreResult<Vec<VideoJob>> {
        let jobs = self.jobs.lock().unwrap();
        let mut pending: Vec<VideoJob> = jobs
            .values()
            .filter(|j| j.status == adgen_models::JobStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        pending.truncate(limit.max(0) as usize);
        Ok(pending)
    }

    async fn select_active(&self, limit: i64) -> StoreResult<Vec<VideoJob>> {
        let jobs = self.jobs.lock().unwrap();
        let mut active: Vec<VideoJob> = jobs
            .values()
            .filter(|j| j.status.is_active())
            .cloned()
            .collect();
        active.sort_by(|a, b| a.updated_at.cmp(&b.updated_at));
        active.truncate(limit.max(0) as usize);
        Ok(active)
    }

    async fn update(&self, id: &JobId, patch: JobPatch) -> StoreResult<VideoJob> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs
            .get_mut(&id.0)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if job.is_terminal() {
            return Err(StoreError::TerminalJob(id.clone()));
        }
        patch.apply(job, Utc::now());
        Ok(job.clone())
    }

    async fn get(&self, id: &JobId) -> StoreResult<Option<VideoJob>> {
        Ok(self.jobs.lock().unwrap().get(&id.0).cloned())
    }

    async fn list_by_user(&self, user_id: &str, limit: i64) -> StoreResult<Vec<VideoJob>> {
        let jobs = self.jobs.lock().unwrap();
        let mut owned: Vec<VideoJob> = jobs
            .values()
            .filter(|j| j.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        owned.truncate(limit.max(0) as usize);
        Ok(owned)
    }
}

/// Slot limiter held in a process-local map.
///
/// A single mutex over the bucket map plays the role of the row lock: the
/// whole read-modify-write happens under it.
#[derive(Default)]
pub struct MemorySlotLimiter {
    buckets: Mutex<HashMap<(String, String), RateLimitWindow>>,
}

impl MemorySlotLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or reconfigure a bucket.
    pub fn ensure_bucket(&self, api: &str, caller: &str, max_calls: i32, window_secs: i32) {
        let mut buckets = self.buckets.lock().unwrap();
        buckets
            .entry((api.to_string(), caller.to_string()))
            .and_modify(|w| {
                w.max_calls = max_calls;
                w.window_secs = window_secs;
            })
            .or_insert_with(|| RateLimitWindow {
                window_start: Utc::now(),
                calls_made: 0,
                max_calls,
                window_secs,
            });
    }

    /// Current counter value, for test assertions.
    pub fn calls_made(&self, api: &str, caller: &str) -> Option<i32> {
        self.buckets
            .lock()
            .unwrap()
            .get(&(api.to_string(), caller.to_string()))
            .map(|w| w.calls_made)
    }

    /// Backdate a bucket's window past its length, simulating the next
    /// cron minute in tests.
    pub fn expire_window(&self, api: &str, caller: &str) {
        let mut buckets = self.buckets.lock().unwrap();
        if let Some(window) = buckets.get_mut(&(api.to_string(), caller.to_string())) {
            window.window_start =
                Utc::now() - chrono::Duration::seconds(window.window_secs as i64 + 1);
        }
    }
}

#[async_trait]
impl SlotLimiter for MemorySlotLimiter {
    async fn acquire_slots(&self, api: &str, caller: &str, requested: u32) -> StoreResult<u32> {
        if requested == 0 {
            return Ok(0);
        }
        let mut buckets = self.buckets.lock().unwrap();
        let Some(window) = buckets.get_mut(&(api.to_string(), caller.to_string())) else {
            return Ok(0);
        };
        Ok(window.grant(requested, Utc::now()).granted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adgen_models::{JobStatus, VideoRequest};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_memory_store_pending_ordering() {
        let store = MemoryJobStore::new();
        let mut first = VideoJob::pending("u", VideoRequest::default());
        first.created_at = Utc::now() - chrono::Duration::seconds(30);
        let second = VideoJob::pending("u", VideoRequest::default());
        let first_id = first.id.clone();

        store.seed(second);
        store.seed(first);

        let pending = store.select_pending(10).await.unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].id, first_id);
    }

    #[tokio::test]
    async fn test_memory_store_rejects_terminal_update() {
        let store = MemoryJobStore::new();
        let mut job = VideoJob::pending("u", VideoRequest::default());
        job.status = JobStatus::Failed;
        job.error_message = Some("boom".into());
        let id = job.id.clone();
        store.seed(job);

        let err = store
            .update(&id, JobPatch::default().with_status(JobStatus::Queued))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::TerminalJob(_)));
    }

    #[tokio::test]
    async fn test_limiter_unknown_bucket_grants_zero() {
        let limiter = MemorySlotLimiter::new();
        assert_eq!(limiter.acquire_slots("api", "nobody", 5).await.unwrap(), 0);
    }

    // Invariant: across any interleaving of concurrent acquire_slots calls,
    // grants within one window sum to at most max_calls.
    #[tokio::test]
    async fn test_concurrent_grants_never_exceed_ceiling() {
        let limiter = Arc::new(MemorySlotLimiter::new());
        limiter.ensure_bucket("provider", "submit-worker", 10, 3600);

        let mut handles = Vec::new();
        for _ in 0..32 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::spawn(async move {
                limiter
                    .acquire_slots("provider", "submit-worker", 3)
                    .await
                    .unwrap()
            }));
        }

        let mut total = 0u32;
        for handle in handles {
            total += handle.await.unwrap();
        }

        assert_eq!(total, 10);
        assert_eq!(limiter.calls_made("provider", "submit-worker"), Some(10));
    }
}
