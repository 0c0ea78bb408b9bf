//! Client error types.

use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("job not found: {0}")]
    NotFound(String),

    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("gave up after {0} polls without a terminal status")]
    Exhausted(u32),
}

impl ClientError {
    /// Transient errors are swallowed by the poll loop and retried on the
    /// next tick.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Network(_) => true,
            ClientError::Api { status, .. } => *status >= 500 || *status == 429,
            ClientError::NotFound(_) => false,
            ClientError::Exhausted(_) => false,
        }
    }
}
