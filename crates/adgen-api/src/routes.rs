//! API routes.

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;

use crate::handlers::catalog::{credit_balance, list_avatars, list_voices};
use crate::handlers::generate::generate_video;
use crate::handlers::health::{health, ready};
use crate::handlers::jobs::{get_job, job_status, list_jobs};
use crate::handlers::uploads::upload_product_image;
use crate::handlers::workers::{run_poll_worker, run_submit_worker};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, rate_limit_middleware, request_id, request_logging, RateLimiterCache,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let client_routes = Router::new()
        .route("/generate-video", post(generate_video))
        .route("/job-status", post(job_status))
        .route("/jobs/:job_id", get(get_job))
        .route("/list-jobs", post(list_jobs))
        .route("/list-avatars", get(list_avatars))
        .route("/list-voices", get(list_voices))
        .route("/credit-balance", get(credit_balance))
        .route("/upload-product-image", post(upload_product_image));

    // Invoked by the external scheduler, not end users
    let cron_routes = Router::new()
        .route("/submit-worker", post(run_submit_worker))
        .route("/poll-worker", post(run_poll_worker));

    let rate_limiter = Arc::new(RateLimiterCache::new(state.config.rate_limit_rps));
    let client_routes = client_routes.layer(middleware::from_fn_with_state(
        rate_limiter,
        rate_limit_middleware,
    ));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .merge(client_routes)
        .merge(cron_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
