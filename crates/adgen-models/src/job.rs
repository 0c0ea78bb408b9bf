//! Video job records and their lifecycle.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::request::VideoRequest;

/// Unique identifier for a video job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a video job.
///
/// States advance along `pending → submitted → queued → rendering →
/// completed`; any non-terminal state may drop to `failed`. Terminal states
/// never change again. Some legacy rows carry `created` instead of
/// `pending`; it is accepted on input and treated as awaiting submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Accepted by intake, not yet submitted to the provider
    #[default]
    #[serde(alias = "created")]
    Pending,
    /// Sent to the provider, acknowledgement pending
    Submitted,
    /// Provider has the job queued
    Queued,
    /// Provider is rendering
    Rendering,
    /// Render finished, video available
    Completed,
    /// Submission or render failed
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Submitted => "submitted",
            JobStatus::Queued => "queued",
            JobStatus::Rendering => "rendering",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Terminal states never re-enter the pipeline.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// States the poll worker considers in flight with the provider.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            JobStatus::Submitted | JobStatus::Queued | JobStatus::Rendering
        )
    }

    /// Position along the forward progression, used to keep transitions
    /// monotone. `Failed` sits outside the progression.
    fn rank(&self) -> u8 {
        match self {
            JobStatus::Pending => 0,
            JobStatus::Submitted => 1,
            JobStatus::Queued => 2,
            JobStatus::Rendering => 3,
            JobStatus::Completed => 4,
            JobStatus::Failed => 5,
        }
    }

    /// Whether a transition from `self` to `next` is allowed.
    ///
    /// Forward jumps are legal (a provider may report `completed` while we
    /// still hold `queued`); moving backwards or out of a terminal state is
    /// not. Any non-terminal state may fail.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == JobStatus::Failed {
            return true;
        }
        next.rank() > self.rank()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, thiserror::Error)]
#[error("unknown job status: {0}")]
pub struct StatusParseError(pub String);

impl FromStr for JobStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" | "created" => Ok(JobStatus::Pending),
            "submitted" => Ok(JobStatus::Submitted),
            "queued" => Ok(JobStatus::Queued),
            "rendering" => Ok(JobStatus::Rendering),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            other => Err(StatusParseError(other.to_string())),
        }
    }
}

/// A persistent record of one video-generation request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoJob {
    /// Unique job ID, assigned at intake
    pub id: JobId,

    /// Opaque owner identifier
    pub user_id: String,

    /// Identifier returned by the upstream provider; absent until
    /// successful submission
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_job_id: Option<String>,

    /// Current lifecycle state
    #[serde(default)]
    pub status: JobStatus,

    /// Snapshot of the render specification
    pub request: VideoRequest,

    /// Final video URL, populated on completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,

    /// Thumbnail URL, populated on completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    /// Credits the provider reported for this render
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits_used: Option<i32>,

    /// Failure detail, populated when `status = failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp, non-decreasing
    pub updated_at: DateTime<Utc>,

    /// Set exactly once, when the job completes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl VideoJob {
    /// Create a new job in `pending` state, as intake does.
    pub fn pending(user_id: impl Into<String>, request: VideoRequest) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            user_id: user_id.into(),
            provider_job_id: None,
            status: JobStatus::Pending,
            request,
            video_url: None,
            thumbnail_url: None,
            credits_used: None,
            error_message: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// A partial update to a job row.
///
/// Stores apply patches with last-write-wins semantics: `updated_at` is
/// always bumped, and `completed_at` is stamped exactly when the patch moves
/// the job to `completed`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobPatch {
    pub status: Option<JobStatus>,
    pub provider_job_id: Option<String>,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub credits_used: Option<i32>,
    pub error_message: Option<String>,
}

impl JobPatch {
    /// Patch recording a successful provider submission.
    pub fn submitted(provider_job_id: impl Into<String>, status: JobStatus) -> Self {
        Self {
            status: Some(status),
            provider_job_id: Some(provider_job_id.into()),
            ..Default::default()
        }
    }

    /// Patch marking a job failed with a message.
    pub fn failed(error_message: impl Into<String>) -> Self {
        Self {
            status: Some(JobStatus::Failed),
            error_message: Some(error_message.into()),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_video_url(mut self, url: impl Into<String>) -> Self {
        self.video_url = Some(url.into());
        self
    }

    pub fn with_thumbnail_url(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }

    pub fn with_credits_used(mut self, credits: i32) -> Self {
        self.credits_used = Some(credits);
        self
    }

    pub fn with_error_message(mut self, msg: impl Into<String>) -> Self {
        self.error_message = Some(msg.into());
        self
    }

    /// Apply the patch to an in-memory job, mirroring the store semantics.
    pub fn apply(&self, job: &mut VideoJob, now: DateTime<Utc>) {
        if let Some(status) = self.status {
            if status == JobStatus::Completed && job.status != JobStatus::Completed {
                job.completed_at = Some(now);
            }
            job.status = status;
        }
        if let Some(ref v) = self.provider_job_id {
            job.provider_job_id = Some(v.clone());
        }
        if let Some(ref v) = self.video_url {
            job.video_url = Some(v.clone());
        }
        if let Some(ref v) = self.thumbnail_url {
            job.thumbnail_url = Some(v.clone());
        }
        if let Some(v) = self.credits_used {
            job.credits_used = Some(v);
        }
        if let Some(ref v) = self.error_message {
            job.error_message = Some(v.clone());
        }
        job.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::VideoRequest;

    #[test]
    fn test_status_roundtrip() {
        for s in [
            JobStatus::Pending,
            JobStatus::Submitted,
            JobStatus::Queued,
            JobStatus::Rendering,
            JobStatus::Completed,
            JobStatus::Failed,
        ] {
            assert_eq!(s.as_str().parse::<JobStatus>().unwrap(), s);
        }
    }

    #[test]
    fn test_legacy_created_parses_as_pending() {
        assert_eq!("created".parse::<JobStatus>().unwrap(), JobStatus::Pending);
        let status: JobStatus = serde_json::from_str("\"created\"").unwrap();
        assert_eq!(status, JobStatus::Pending);
    }

    #[test]
    fn test_terminal_states_are_immutable() {
        for terminal in [JobStatus::Completed, JobStatus::Failed] {
            for next in [
                JobStatus::Pending,
                JobStatus::Submitted,
                JobStatus::Queued,
                JobStatus::Rendering,
                JobStatus::Completed,
                JobStatus::Failed,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_forward_jumps_are_allowed() {
        assert!(JobStatus::Queued.can_transition_to(JobStatus::Completed));
        assert!(JobStatus::Pending.can_transition_to(JobStatus::Queued));
        assert!(!JobStatus::Rendering.can_transition_to(JobStatus::Queued));
        assert!(JobStatus::Rendering.can_transition_to(JobStatus::Failed));
    }

    #[test]
    fn test_patch_sets_completed_at_once() {
        let mut job = VideoJob::pending("user-1", VideoRequest::default());
        let t1 = Utc::now();
        JobPatch::default()
            .with_status(JobStatus::Completed)
            .with_video_url("https://cdn.example.com/v.mp4")
            .apply(&mut job, t1);

        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.completed_at, Some(t1));

        // A later patch must not move completed_at
        let t2 = t1 + chrono::Duration::seconds(10);
        JobPatch::default()
            .with_status(JobStatus::Completed)
            .apply(&mut job, t2);
        assert_eq!(job.completed_at, Some(t1));
        assert_eq!(job.updated_at, t2);
    }

    #[test]
    fn test_pending_job_shape() {
        let job = VideoJob::pending("user-1", VideoRequest::default());
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.provider_job_id.is_none());
        assert!(job.completed_at.is_none());
        assert_eq!(job.created_at, job.updated_at);
    }
}
