//! Upload policy: decoding, size limits, key scheme.

use base64::Engine;
use chrono::Utc;
use uuid::Uuid;

use crate::error::{StorageError, StorageResult};

/// Maximum decoded image size: 5 MiB.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Accepted image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// Map a declared MIME type; anything unrecognized falls back to JPEG,
    /// which is what the mobile client sends when it omits the field.
    pub fn from_mime(mime: Option<&str>) -> Self {
        match mime.map(str::trim) {
            Some("image/png") => ImageFormat::Png,
            _ => ImageFormat::Jpeg,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }
}

/// Decode a base64 image body, enforcing the decoded-size cap.
///
/// Data-URL prefixes (`data:image/png;base64,`) are tolerated and stripped.
pub fn decode_image(base64_body: &str) -> StorageResult<Vec<u8>> {
    let trimmed = base64_body.trim();
    if trimmed.is_empty() {
        return Err(StorageError::invalid_payload("empty base64 body"));
    }

    let payload = match trimmed.split_once(";base64,") {
        Some((_, rest)) => rest,
        None => trimmed,
    };

    // Cheap pre-decode bound: 4 base64 chars encode 3 bytes
    let estimated = payload.len() / 4 * 3;
    if estimated > MAX_IMAGE_BYTES + 3 {
        return Err(StorageError::TooLarge {
            limit: MAX_IMAGE_BYTES,
            actual: estimated,
        });
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| StorageError::invalid_payload(format!("base64 decode failed: {e}")))?;

    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(StorageError::TooLarge {
            limit: MAX_IMAGE_BYTES,
            actual: bytes.len(),
        });
    }

    Ok(bytes)
}

/// Build the object key: `{user_id}/{timestamp_ms}-{hex8}.{ext}`.
pub fn object_key(user_id: &str, format: ImageFormat) -> String {
    let timestamp = Utc::now().timestamp_millis();
    let hex8 = &Uuid::new_v4().simple().to_string()[..8];
    format!("{user_id}/{timestamp}-{hex8}.{}", format.extension())
}
