//! Batch workers that drive jobs through the provider.
//!
//! Two cron-style workers share the provider quota through the atomic slot
//! limiter:
//! - `SubmitWorker` promotes `pending` jobs into provider renders
//! - `PollWorker` advances in-flight renders to terminal states
//!
//! Each `run_once` is one bounded batch; workers keep no state between
//! batches, so a crashed run is simply re-run on the next tick.

pub mod config;
pub mod error;
pub mod metrics;
pub mod poll;
pub mod report;
pub mod submit;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use poll::PollWorker;
pub use report::{PollReport, RunReason, SubmitReport};
pub use submit::SubmitWorker;
