//! Worker error types.
//!
//! Provider failures are handled per job inside a batch and never surface
//! here; only store failures abort a run (the next tick retries the whole
//! batch).

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("store error: {0}")]
    Store(#[from] adgen_store::StoreError),
}
