//! Postgres job store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::debug;

use adgen_models::{JobId, JobPatch, JobStatus, VideoJob, VideoRequest};

use crate::error::{StoreError, StoreResult};
use crate::traits::JobStore;

const JOB_COLUMNS: &str = "id, user_id, provider_job_id, status, request, video_url, \
     thumbnail_url, credits_used, error_message, created_at, updated_at, completed_at";

/// Raw `video_jobs` row.
#[derive(Debug, FromRow)]
struct JobRow {
    id: String,
    user_id: String,
    provider_job_id: Option<String>,
    status: String,
    request: serde_json::Value,
    video_url: Option<String>,
    thumbnail_url: Option<String>,
    credits_used: Option<i32>,
    error_message: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<JobRow> for VideoJob {
    type Error = StoreError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        let status: JobStatus = row
            .status
            .parse()
            .map_err(|e| StoreError::invalid_row(format!("job {}: {e}", row.id)))?;
        let request: VideoRequest = serde_json::from_value(row.request)?;

        Ok(VideoJob {
            id: JobId::from_string(row.id),
            user_id: row.user_id,
            provider_job_id: row.provider_job_id,
            status,
            request,
            video_url: row.video_url,
            thumbnail_url: row.thumbnail_url,
            credits_used: row.credits_used,
            error_message: row.error_message,
            created_at: row.created_at,
            updated_at: row.updated_at,
            completed_at: row.completed_at,
        })
    }
}

/// Job store backed by the shared Postgres database.
#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn insert(&self, job: &VideoJob) -> StoreResult<()> {
        sqlx::query(
            r"
            INSERT INTO video_jobs
                (id, user_id, provider_job_id, status, request, video_url,
                 thumbnail_url, credits_used, error_message, created_at,
                 updated_at, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(job.id.as_str())
        .bind(&job.user_id)
        .bind(&job.provider_job_id)
        .bind(job.status.as_str())
        .bind(serde_json::to_value(&job.request)?)
        .bind(&job.video_url)
        .bind(&job.thumbnail_url)
        .bind(job.credits_used)
        .bind(&job.error_message)
        .bind(job.created_at)
        .bind(job.updated_at)
        .bind(job.completed_at)
        .execute(&self.pool)
        .await?;

        debug!(job_id = %job.id, user_id = %job.user_id, "Inserted pending job");
        Ok(())
    }

    async fn select_pending(&self, limit: i64) -> StoreResult<Vec<VideoJob>> {
        // 'created' is a legacy synonym still present in old rows
        let sql = format!(
            r"
            SELECT {JOB_COLUMNS}
            FROM video_jobs
            WHERE status IN ('pending', 'created')
            ORDER BY created_at ASC
            LIMIT $1
            "
        );
        let rows = sqlx::query_as::<_, JobRow>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(VideoJob::try_from).collect()
    }

    async fn select_active(&self, limit: i64) -> StoreResult<Vec<VideoJob>> {
        let sql = format!(
            r"
            SELECT {JOB_COLUMNS}
            FROM video_jobs
            WHERE status IN ('submitted', 'queued', 'rendering')
            ORDER BY updated_at ASC
            LIMIT $1
            "
        );
        let rows = sqlx::query_as::<_, JobRow>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(VideoJob::try_from).collect()
    }

    async fn update(&self, id: &JobId, patch: JobPatch) -> StoreResult<VideoJob> {
        let status = patch.status.map(|s| s.as_str());

        let sql = format!(
            r"
            UPDATE video_jobs SET
                status = COALESCE($2, status),
                provider_job_id = COALESCE($3, provider_job_id),
                video_url = COALESCE($4, video_url),
                thumbnail_url = COALESCE($5, thumbnail_url),
                credits_used = COALESCE($6, credits_used),
                error_message = COALESCE($7, error_message),
                updated_at = now(),
                completed_at = CASE
                    WHEN $2 = 'completed' AND completed_at IS NULL THEN now()
                    ELSE completed_at
                END
            WHERE id = $1 AND status NOT IN ('completed', 'failed')
            RETURNING {JOB_COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(id.as_str())
            .bind(status)
            .bind(&patch.provider_job_id)
            .bind(&patch.video_url)
            .bind(&patch.thumbnail_url)
            .bind(patch.credits_used)
            .bind(&patch.error_message)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => VideoJob::try_from(row),
            None => {
                // Distinguish "gone" from "terminal"
                match self.get(id).await? {
                    Some(_) => Err(StoreError::TerminalJob(id.clone())),
                    None => Err(StoreError::NotFound(id.clone())),
                }
            }
        }
    }

    async fn get(&self, id: &JobId) -> StoreResult<Option<VideoJob>> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM video_jobs WHERE id = $1");
        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(VideoJob::try_from).transpose()
    }

    async fn list_by_user(&self, user_id: &str, limit: i64) -> StoreResult<Vec<VideoJob>> {
        let sql = format!(
            r"
            SELECT {JOB_COLUMNS}
            FROM video_jobs
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "
        );
        let rows = sqlx::query_as::<_, JobRow>(&sql)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(VideoJob::try_from).collect()
    }
}
