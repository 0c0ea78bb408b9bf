//! Status-polling client for the adgen API.
//!
//! Drives the adaptive poll schedule against the database-backed status
//! endpoint: cheap reads, backing off as renders age, stopping on terminal
//! status.

pub mod error;
pub mod poller;

pub use error::{ClientError, ClientResult};
pub use poller::{JobStatusView, PollSchedule, StatusClient};
