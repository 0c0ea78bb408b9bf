//! Product image upload handler.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::handlers::user_id_or_anonymous;
use crate::state::AppState;

/// Request body for `POST /upload-product-image`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadProductImageRequest {
    pub base64: Option<String>,
    pub mime_type: Option<String>,
}

/// Response body for `POST /upload-product-image`.
#[derive(Debug, Serialize)]
pub struct UploadProductImageResponse {
    pub url: String,
}

/// POST /upload-product-image
pub async fn upload_product_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<UploadProductImageRequest>,
) -> ApiResult<(StatusCode, Json<UploadProductImageResponse>)> {
    let user_id = user_id_or_anonymous(&headers);

    let base64 = body
        .base64
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("base64 is required"))?;

    let storage = state
        .storage
        .as_ref()
        .ok_or_else(|| ApiError::internal("object storage is not configured"))?;

    let url = storage
        .upload_product_image(&user_id, base64, body.mime_type.as_deref())
        .await?;

    info!(user_id = %user_id, url = %url, "Stored product image");

    Ok((
        StatusCode::CREATED,
        Json(UploadProductImageResponse { url }),
    ))
}
