//! HTTP surface for the adgen backend.

pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::{ApiConfig, IntakeDefaults};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
