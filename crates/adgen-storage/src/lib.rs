//! Object storage for uploaded product images.
//!
//! S3-compatible client (Cloudflare R2) plus the upload policy: decoded
//! size cap, content-type mapping, and the `{user_id}/{timestamp}-{hex8}`
//! key scheme.

pub mod client;
pub mod error;
pub mod upload;

pub use client::{R2Client, R2Config};
pub use error::{StorageError, StorageResult};
pub use upload::{decode_image, object_key, ImageFormat, MAX_IMAGE_BYTES};
