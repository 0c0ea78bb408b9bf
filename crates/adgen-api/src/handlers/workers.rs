//! Cron surface: single-shot worker invocations.
//!
//! The external scheduler hits these at >= 1-minute granularity. Each call
//! runs exactly one batch and returns the run diagnostic; a store failure
//! aborts the batch and surfaces as 500 so the scheduler's next tick
//! retries.

use axum::extract::State;
use axum::Json;
use tracing::info;

use adgen_worker::{PollReport, SubmitReport};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// POST /submit-worker
pub async fn run_submit_worker(State(state): State<AppState>) -> ApiResult<Json<SubmitReport>> {
    let report = state
        .submit_worker
        .run_once()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    info!(?report, "Submit worker invocation finished");
    Ok(Json(report))
}

/// POST /poll-worker
pub async fn run_poll_worker(State(state): State<AppState>) -> ApiResult<Json<PollReport>> {
    let report = state
        .poll_worker
        .run_once()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    info!(?report, "Poll worker invocation finished");
    Ok(Json(report))
}
