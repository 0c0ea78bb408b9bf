//! Worker scheduler binary.
//!
//! Long-lived equivalent of the two cron entries: both workers run one
//! batch per tick at cron granularity (>= 60s). The batch/slot discipline
//! is identical to the HTTP-triggered runs.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::time::interval;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use adgen_provider::CreatifyProvider;
use adgen_store::{PgJobStore, PgSlotLimiter};
use adgen_worker::{PollWorker, SubmitWorker, WorkerConfig};

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("adgen=info".parse().unwrap())
        .add_directive("sqlx=warn".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(true).with_target(true))
            .with(env_filter)
            .init();
    }

    info!("Starting adgen-worker");

    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            error!("DATABASE_URL must be set");
            std::process::exit(1);
        }
    };

    let pool = match PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = adgen_store::migrate(&pool).await {
        error!("Migration failed: {}", e);
        std::process::exit(1);
    }

    let provider = match CreatifyProvider::from_env() {
        Ok(p) => Arc::new(p),
        Err(e) => {
            error!("Failed to create provider client: {}", e);
            std::process::exit(1);
        }
    };

    let store = Arc::new(PgJobStore::new(pool.clone()));
    let limiter = Arc::new(PgSlotLimiter::new(pool));

    let submit = SubmitWorker::new(
        store.clone(),
        limiter.clone(),
        provider.clone(),
        config.clone(),
    );
    let poll = PollWorker::new(store, limiter, provider, config.clone());

    let mut ticker = interval(config.tick_interval);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
                break;
            }
            _ = ticker.tick() => {
                match submit.run_once().await {
                    Ok(report) => info!(?report, "submit tick"),
                    Err(e) => error!("Submit run aborted: {}", e),
                }
                match poll.run_once().await {
                    Ok(report) => info!(?report, "poll tick"),
                    Err(e) => error!("Poll run aborted: {}", e),
                }
            }
        }
    }

    info!("Worker shutdown complete");
}
