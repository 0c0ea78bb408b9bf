//! Programmable in-process provider.
//!
//! Used by the worker and API test suites, and by local development when no
//! Creatify credentials are configured. Each call pops the next scripted
//! outcome for that operation; an empty script falls back to a benign
//! default so keyless dev keeps working.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use adgen_models::{Avatar, CreditBalance, JobStatus, VideoRequest, VoiceOption};

use crate::error::{ProviderError, ProviderResult};
use crate::types::{ProviderJob, ProviderJobStatus};
use crate::VideoProvider;

/// A scripted failure, cloneable unlike `ProviderError`.
#[derive(Debug, Clone)]
pub enum FakeFailure {
    RateLimited { retry_after_secs: Option<u64> },
    Api { status: u16, message: String },
    Timeout,
}

impl From<FakeFailure> for ProviderError {
    fn from(failure: FakeFailure) -> Self {
        match failure {
            FakeFailure::RateLimited { retry_after_secs } => {
                ProviderError::RateLimited { retry_after_secs }
            }
            FakeFailure::Api { status, message } => ProviderError::Api { status, message },
            FakeFailure::Timeout => ProviderError::Timeout,
        }
    }
}

type Scripted<T> = Mutex<VecDeque<Result<T, FakeFailure>>>;

/// Provider double with per-operation scripts and call counters.
#[derive(Default)]
pub struct FakeProvider {
    create_script: Scripted<ProviderJob>,
    status_script: Scripted<ProviderJobStatus>,
    avatars: Mutex<Vec<Avatar>>,
    voices: Mutex<Vec<VoiceOption>>,
    credits: Mutex<i64>,
    create_calls: AtomicU64,
    status_calls: AtomicU64,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next `create_job` outcome.
    pub fn push_create(&self, result: Result<ProviderJob, FakeFailure>) {
        self.create_script.lock().unwrap().push_back(result);
    }

    /// Script the next `check_job_status` outcome.
    pub fn push_status(&self, result: Result<ProviderJobStatus, FakeFailure>) {
        self.status_script.lock().unwrap().push_back(result);
    }

    pub fn set_avatars(&self, avatars: Vec<Avatar>) {
        *self.avatars.lock().unwrap() = avatars;
    }

    pub fn set_voices(&self, voices: Vec<VoiceOption>) {
        *self.voices.lock().unwrap() = voices;
    }

    pub fn set_credits(&self, remaining: i64) {
        *self.credits.lock().unwrap() = remaining;
    }

    /// Number of `create_job` calls observed.
    pub fn create_calls(&self) -> u64 {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Number of `check_job_status` calls observed.
    pub fn status_calls(&self) -> u64 {
        self.status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoProvider for FakeProvider {
    async fn create_job(&self, _request: &VideoRequest) -> ProviderResult<ProviderJob> {
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
        match self.create_script.lock().unwrap().pop_front() {
            Some(Ok(job)) => Ok(job),
            Some(Err(failure)) => Err(failure.into()),
            None => Ok(ProviderJob {
                provider_job_id: format!("fake-{n}"),
                status: JobStatus::Queued,
            }),
        }
    }

    async fn check_job_status(&self, _provider_job_id: &str) -> ProviderResult<ProviderJobStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        match self.status_script.lock().unwrap().pop_front() {
            Some(Ok(status)) => Ok(status),
            Some(Err(failure)) => Err(failure.into()),
            None => Ok(ProviderJobStatus {
                status: JobStatus::Rendering,
                progress: Some(50),
                ..Default::default()
            }),
        }
    }

    async fn list_avatars(&self) -> ProviderResult<Vec<Avatar>> {
        Ok(self.avatars.lock().unwrap().clone())
    }

    async fn list_voices(&self) -> ProviderResult<Vec<VoiceOption>> {
        Ok(self.voices.lock().unwrap().clone())
    }

    async fn credit_balance(&self) -> ProviderResult<CreditBalance> {
        Ok(CreditBalance {
            remaining_credits: *self.credits.lock().unwrap(),
        })
    }
}
