//! Job status and history handlers.
//!
//! Status reads are pure database lookups; the provider is never consulted
//! here, so user-visible latency is independent of the provider rate
//! budget. Terminal responses are edge-cacheable, non-terminal ones are
//! not, and the Cache-Control header carries that distinction.

use axum::extract::{Path, State};
use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use adgen_models::{JobId, VideoJob};

use crate::error::{ApiError, ApiResult};
use crate::handlers::require_user_id;
use crate::state::AppState;

/// Request body for `POST /job-status`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusRequest {
    pub job_id: Option<String>,
}

/// Job status response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResponse {
    pub job_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits_used: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl From<VideoJob> for JobStatusResponse {
    fn from(job: VideoJob) -> Self {
        Self {
            job_id: job.id.to_string(),
            status: job.status.as_str().to_string(),
            video_url: job.video_url,
            thumbnail_url: job.thumbnail_url,
            credits_used: job.credits_used,
            error_message: job.error_message,
            created_at: job.created_at.to_rfc3339(),
            updated_at: job.updated_at.to_rfc3339(),
            completed_at: job.completed_at.map(|t| t.to_rfc3339()),
        }
    }
}

async fn load_job(state: &AppState, job_id: &str) -> ApiResult<VideoJob> {
    let id = JobId::from_string(job_id);
    state
        .store
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("job {job_id} not found")))
}

/// Terminal reads are safe to cache at the edge for a minute; non-terminal
/// ones must stay fresh for the adaptive poller.
fn cache_headers(job: &VideoJob) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let value = if job.is_terminal() {
        "public, s-maxage=60"
    } else {
        "no-cache"
    };
    headers.insert(CACHE_CONTROL, value.parse().unwrap());
    headers
}

/// POST /job-status
pub async fn job_status(
    State(state): State<AppState>,
    Json(body): Json<JobStatusRequest>,
) -> ApiResult<(HeaderMap, Json<JobStatusResponse>)> {
    let job_id = body
        .job_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("jobId is required"))?;

    let job = load_job(&state, job_id).await?;
    Ok((cache_headers(&job), Json(job.into())))
}

/// GET /jobs/:job_id
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<(HeaderMap, Json<JobStatusResponse>)> {
    let job = load_job(&state, &job_id).await?;
    Ok((cache_headers(&job), Json(job.into())))
}

/// List-jobs response.
#[derive(Debug, Serialize)]
pub struct ListJobsResponse {
    pub jobs: Vec<JobStatusResponse>,
}

/// POST /list-jobs
pub async fn list_jobs(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<ListJobsResponse>> {
    let user_id = require_user_id(&headers)?;

    let jobs = state
        .store
        .list_by_user(&user_id, state.config.list_jobs_limit)
        .await?;

    Ok(Json(ListJobsResponse {
        jobs: jobs.into_iter().map(JobStatusResponse::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use adgen_models::{JobStatus, VideoRequest};
    use chrono::Utc;

    #[test]
    fn test_terminal_jobs_are_cacheable() {
        let mut job = VideoJob::pending("u", VideoRequest::default());
        assert_eq!(cache_headers(&job)[CACHE_CONTROL], "no-cache");

        job.status = JobStatus::Completed;
        job.video_url = Some("https://v/1.mp4".into());
        job.completed_at = Some(Utc::now());
        assert_eq!(cache_headers(&job)[CACHE_CONTROL], "public, s-maxage=60");
    }

    #[test]
    fn test_response_shape_is_camel_case() {
        let mut job = VideoJob::pending("u", VideoRequest::default());
        job.credits_used = Some(5);
        let response = JobStatusResponse::from(job);
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("jobId").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["creditsUsed"], 5);
        assert!(json.get("videoUrl").is_none());
    }
}
