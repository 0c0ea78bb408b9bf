//! API integration tests against the in-memory stores and the fake
//! provider.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use adgen_api::{create_router, ApiConfig, AppState, IntakeDefaults};
use adgen_models::JobStatus;
use adgen_provider::{FakeProvider, ProviderJobStatus};
use adgen_store::{JobStore, MemoryJobStore, MemorySlotLimiter, SlotLimiter};

struct TestApp {
    router: axum::Router,
    store: Arc<MemoryJobStore>,
    provider: Arc<FakeProvider>,
}

fn test_defaults() -> IntakeDefaults {
    IntakeDefaults {
        avatar_id: "default-avatar".to_string(),
        voice_id: "default-voice".to_string(),
        script_text: "Default pitch".to_string(),
        product_image_url: "https://placehold.co/600x600/png".to_string(),
        aspect_ratio: adgen_models::AspectRatio::Portrait,
        captions_enabled: true,
        caption_style: "normal-black".to_string(),
    }
}

fn test_app() -> TestApp {
    let store = Arc::new(MemoryJobStore::new());
    let limiter = Arc::new(MemorySlotLimiter::new());
    limiter.ensure_bucket("creatify", "submit-worker", 5, 60);
    limiter.ensure_bucket("creatify", "poll-worker", 10, 60);
    let provider = Arc::new(FakeProvider::new());

    let config = ApiConfig {
        defaults: test_defaults(),
        rate_limit_rps: 1000,
        ..Default::default()
    };

    let state = AppState::assemble(
        config,
        store.clone() as Arc<dyn JobStore>,
        limiter as Arc<dyn SlotLimiter>,
        provider.clone(),
        None,
    );

    TestApp {
        router: create_router(state, None),
        store,
        provider,
    }
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let addr: SocketAddr = "127.0.0.1:40000".parse().unwrap();
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .extension(ConnectInfo(addr));

    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ============================================================================
// Intake (S5)
// ============================================================================

#[tokio::test]
async fn generate_video_fills_defaults_and_writes_pending_row() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(request(
            "POST",
            "/generate-video",
            Some(json!({"productName": "Lamp"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["status"], "pending");
    let job_id = body["jobId"].as_str().unwrap().to_string();

    // Row persisted before any provider call
    assert_eq!(app.provider.create_calls(), 0);
    let jobs = app.store.all();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].id.to_string(), job_id);
    assert_eq!(jobs[0].status, JobStatus::Pending);
    assert_eq!(jobs[0].request.avatar_id, "default-avatar");
    assert_eq!(jobs[0].request.script_text.as_deref(), Some("Default pitch"));
}

#[tokio::test]
async fn generate_video_rejects_tts_without_script_or_default() {
    let app = {
        // Same app but with an empty script default
        let store = Arc::new(MemoryJobStore::new());
        let limiter = Arc::new(MemorySlotLimiter::new());
        let provider = Arc::new(FakeProvider::new());
        let mut defaults = test_defaults();
        defaults.script_text = String::new();
        let config = ApiConfig {
            defaults,
            rate_limit_rps: 1000,
            ..Default::default()
        };
        create_router(
            AppState::assemble(
                config,
                store as Arc<dyn JobStore>,
                limiter as Arc<dyn SlotLimiter>,
                provider,
                None,
            ),
            None,
        )
    };

    let response = app
        .oneshot(request(
            "POST",
            "/generate-video",
            Some(json!({"voiceMode": "tts"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn generate_video_rejects_user_audio_without_recording() {
    let app = test_app();

    let response = app
        .router
        .oneshot(request(
            "POST",
            "/generate-video",
            Some(json!({"voiceMode": "user_audio", "scriptText": "unused"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.provider.create_calls(), 0);
}

// ============================================================================
// Status reads
// ============================================================================

#[tokio::test]
async fn job_status_requires_an_id_and_knows_404() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(request("POST", "/job-status", Some(json!({}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .router
        .oneshot(request(
            "POST",
            "/job-status",
            Some(json!({"jobId": "no-such-job"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_reads_carry_terminal_aware_cache_headers() {
    let app = test_app();

    let mut job = adgen_models::VideoJob::pending(
        "user-1",
        adgen_models::VideoRequest {
            script_text: Some("hi".into()),
            avatar_id: "a".into(),
            ..Default::default()
        },
    );
    let pending_id = job.id.to_string();
    app.store.seed(job.clone());

    let response = app
        .router
        .clone()
        .oneshot(request("GET", &format!("/jobs/{pending_id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["cache-control"], "no-cache");

    job.id = adgen_models::JobId::new();
    job.status = JobStatus::Completed;
    job.video_url = Some("https://v/1.mp4".into());
    job.completed_at = Some(chrono::Utc::now());
    let done_id = job.id.to_string();
    app.store.seed(job);

    let response = app
        .router
        .oneshot(request("GET", &format!("/jobs/{done_id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["cache-control"], "public, s-maxage=60");
    let body = json_body(response).await;
    assert_eq!(body["status"], "completed");
    assert_eq!(body["videoUrl"], "https://v/1.mp4");
    assert!(body.get("completedAt").is_some());
}

#[tokio::test]
async fn list_jobs_requires_user_header_and_orders_newest_first() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(request("POST", "/list-jobs", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut older = adgen_models::VideoJob::pending("user-7", Default::default());
    older.created_at = chrono::Utc::now() - chrono::Duration::minutes(5);
    let older_id = older.id.to_string();
    let newer = adgen_models::VideoJob::pending("user-7", Default::default());
    let newer_id = newer.id.to_string();
    app.store.seed(older);
    app.store.seed(newer);
    app.store
        .seed(adgen_models::VideoJob::pending("someone-else", Default::default()));

    let addr: SocketAddr = "127.0.0.1:40000".parse().unwrap();
    let response = app
        .router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/list-jobs")
                .header("x-user-id", "user-7")
                .extension(ConnectInfo(addr))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let jobs = body["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0]["jobId"], newer_id);
    assert_eq!(jobs[1]["jobId"], older_id);
}

// ============================================================================
// Cron surface: full pipeline through HTTP
// ============================================================================

#[tokio::test]
async fn cron_endpoints_drive_a_job_to_completion() {
    let app = test_app();

    // Intake
    let response = app
        .router
        .clone()
        .oneshot(request(
            "POST",
            "/generate-video",
            Some(json!({"scriptText": "Buy it"})),
        ))
        .await
        .unwrap();
    let job_id = json_body(response).await["jobId"]
        .as_str()
        .unwrap()
        .to_string();

    // Submit tick
    let response = app
        .router
        .clone()
        .oneshot(request("POST", "/submit-worker", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let report = json_body(response).await;
    assert_eq!(report["submitted"], 1);
    assert_eq!(report["slots"], 1);

    // Poll tick with a scripted completion
    app.provider.push_status(Ok(ProviderJobStatus {
        status: JobStatus::Completed,
        video_url: Some("https://v/done.mp4".to_string()),
        credits_used: Some(4),
        ..Default::default()
    }));

    let response = app
        .router
        .clone()
        .oneshot(request("POST", "/poll-worker", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let report = json_body(response).await;
    assert_eq!(report["polled"], 1);
    assert_eq!(report["completed"], 1);

    // Status read shows the terminal result
    let response = app
        .router
        .oneshot(request("GET", &format!("/jobs/{job_id}"), None))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["status"], "completed");
    assert_eq!(body["videoUrl"], "https://v/done.mp4");
    assert_eq!(body["creditsUsed"], 4);
}

#[tokio::test]
async fn cron_endpoints_report_idle_reasons() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(request("POST", "/submit-worker", None))
        .await
        .unwrap();
    let report = json_body(response).await;
    assert_eq!(report["reason"], "no_pending_jobs");

    let response = app
        .router
        .oneshot(request("POST", "/poll-worker", None))
        .await
        .unwrap();
    let report = json_body(response).await;
    assert_eq!(report["reason"], "no_active_jobs");
}

// ============================================================================
// Catalog pass-throughs
// ============================================================================

#[tokio::test]
async fn catalog_endpoints_cache_and_set_headers() {
    let app = test_app();
    app.provider.set_avatars(vec![adgen_models::Avatar {
        id: "a1".into(),
        name: "Ana".into(),
        gender: Some("female".into()),
        preview_url: None,
    }]);
    app.provider.set_credits(120);

    let response = app
        .router
        .clone()
        .oneshot(request("GET", "/list-avatars", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["cache-control"],
        "public, s-maxage=3600"
    );
    let body = json_body(response).await;
    assert_eq!(body["avatars"][0]["id"], "a1");

    let response = app
        .router
        .oneshot(request("GET", "/credit-balance", None))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["remainingCredits"], 120);
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn health_reports_env_checks() {
    let app = test_app();

    let response = app
        .router
        .oneshot(request("GET", "/health", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body["env"].get("providerConfigured").is_some());
    assert!(body["env"].get("storeConfigured").is_some());
}
