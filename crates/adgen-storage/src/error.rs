//! Storage error types.

use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage configuration error: {0}")]
    Config(String),

    #[error("invalid image payload: {0}")]
    InvalidPayload(String),

    #[error("image exceeds {limit} bytes decoded (got {actual})")]
    TooLarge { limit: usize, actual: usize },

    #[error("upload failed: {0}")]
    Upload(String),
}

impl StorageError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_payload(msg: impl Into<String>) -> Self {
        Self::InvalidPayload(msg.into())
    }
}
