//! Application state.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use adgen_provider::{CreatifyProvider, VideoProvider};
use adgen_storage::R2Client;
use adgen_store::{JobStore, PgJobStore, PgSlotLimiter, SlotLimiter};
use adgen_worker::{PollWorker, SubmitWorker, WorkerConfig};

use crate::cache::CatalogCache;
use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Arc<dyn JobStore>,
    pub limiter: Arc<dyn SlotLimiter>,
    pub provider: Arc<dyn VideoProvider>,
    pub storage: Option<Arc<R2Client>>,
    pub catalog: Arc<CatalogCache>,
    pub submit_worker: Arc<SubmitWorker>,
    pub poll_worker: Arc<PollWorker>,
}

impl AppState {
    /// Create new application state from the environment.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set to reach the job store")?;

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(&database_url)
            .await?;
        adgen_store::migrate(&pool).await?;

        let store: Arc<dyn JobStore> = Arc::new(PgJobStore::new(pool.clone()));
        let limiter: Arc<dyn SlotLimiter> = Arc::new(PgSlotLimiter::new(pool));
        let provider: Arc<dyn VideoProvider> = Arc::new(CreatifyProvider::from_env()?);

        // Product-image uploads are optional in local setups
        let storage = match R2Client::from_env() {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                tracing::warn!("Object storage disabled: {}", e);
                None
            }
        };

        Ok(Self::assemble(config, store, limiter, provider, storage))
    }

    /// Wire the state from already-built components. Tests use this with
    /// in-memory stores and the fake provider.
    pub fn assemble(
        config: ApiConfig,
        store: Arc<dyn JobStore>,
        limiter: Arc<dyn SlotLimiter>,
        provider: Arc<dyn VideoProvider>,
        storage: Option<Arc<R2Client>>,
    ) -> Self {
        let worker_config = WorkerConfig::from_env();
        let submit_worker = Arc::new(SubmitWorker::new(
            store.clone(),
            limiter.clone(),
            provider.clone(),
            worker_config.clone(),
        ));
        let poll_worker = Arc::new(PollWorker::new(
            store.clone(),
            limiter.clone(),
            provider.clone(),
            worker_config,
        ));
        let catalog = Arc::new(CatalogCache::new(config.catalog_cache_ttl));

        Self {
            config,
            store,
            limiter,
            provider,
            storage,
            catalog,
            submit_worker,
            poll_worker,
        }
    }
}
