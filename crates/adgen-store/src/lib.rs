//! Durable state for the adgen backend.
//!
//! Two tables back the whole pipeline:
//! - `video_jobs`: the job records; the pending subset doubles as the
//!   submit queue, the active subset as the poll queue.
//! - `rate_limits`: one windowed counter per `(api, caller)` pair, granted
//!   atomically under a row lock.
//!
//! The Postgres implementations are the system of record; the in-memory
//! implementations mirror their semantics for tests and local development.

pub mod error;
pub mod jobs;
pub mod memory;
pub mod rate_limit;
pub mod traits;
pub mod window;

pub use error::{StoreError, StoreResult};
pub use jobs::PgJobStore;
pub use memory::{MemoryJobStore, MemorySlotLimiter};
pub use rate_limit::PgSlotLimiter;
pub use traits::{JobStore, SlotLimiter};

/// Run the embedded migrations against a pool.
pub async fn migrate(pool: &sqlx::PgPool) -> StoreResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| StoreError::Migration(e.to_string()))
}
