//! Provider error types.

use thiserror::Error;

pub type ProviderResult<T> = Result<T, ProviderError>;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP 429 from the provider. Workers treat this as non-poison: the
    /// batch stops and the affected jobs are retried on a later tick.
    #[error("provider rate limited{}", retry_after_hint(.retry_after_secs))]
    RateLimited { retry_after_secs: Option<u64> },

    /// Non-2xx response other than 429.
    #[error("provider returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The per-request deadline elapsed with no response.
    #[error("provider request timed out")]
    Timeout,

    /// Transport-level failure (connect, TLS, protocol).
    #[error("provider request failed: {0}")]
    Network(reqwest::Error),

    /// 2xx response whose body did not match the expected shape.
    #[error("unexpected provider response: {0}")]
    InvalidResponse(String),

    /// Missing or malformed client configuration.
    #[error("provider configuration error: {0}")]
    Config(String),
}

fn retry_after_hint(retry_after_secs: &Option<u64>) -> String {
    match retry_after_secs {
        Some(secs) => format!(" (retry after {secs}s)"),
        None => String::new(),
    }
}

impl ProviderError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Build from a non-success HTTP status and response body.
    pub fn from_http_status(status: u16, message: String, retry_after_secs: Option<u64>) -> Self {
        if status == 429 {
            Self::RateLimited { retry_after_secs }
        } else {
            Self::Api { status, message }
        }
    }

    /// Classify a transport error, surfacing deadline expiry distinctly.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err)
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ProviderError::RateLimited { .. })
    }

    /// Transient failures leave job state unchanged and are retried on the
    /// next worker tick: 429, transport errors, and server-side 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::RateLimited { .. } => true,
            ProviderError::Timeout => true,
            ProviderError::Network(_) => true,
            ProviderError::Api { status, .. } => *status >= 500,
            ProviderError::InvalidResponse(_) => false,
            ProviderError::Config(_) => false,
        }
    }
}
