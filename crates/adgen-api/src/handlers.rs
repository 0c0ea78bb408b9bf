//! HTTP handlers.

use axum::http::HeaderMap;

use crate::error::{ApiError, ApiResult};

pub mod catalog;
pub mod generate;
pub mod health;
pub mod jobs;
pub mod uploads;
pub mod workers;

/// Owner identity comes from the `x-user-id` header; auth proper is
/// terminated upstream of this service.
pub(crate) const USER_ID_HEADER: &str = "x-user-id";

/// Fallback owner for endpoints where the header is optional.
pub(crate) const ANONYMOUS_USER: &str = "anonymous";

pub(crate) fn user_id_or_anonymous(headers: &HeaderMap) -> String {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| ANONYMOUS_USER.to_string())
}

pub(crate) fn require_user_id(headers: &HeaderMap) -> ApiResult<String> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::bad_request("x-user-id header is required"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(user_id_or_anonymous(&headers), "anonymous");
        assert!(require_user_id(&headers).is_err());

        headers.insert(USER_ID_HEADER, "  user-9 ".parse().unwrap());
        assert_eq!(user_id_or_anonymous(&headers), "user-9");
        assert_eq!(require_user_id(&headers).unwrap(), "user-9");
    }
}
